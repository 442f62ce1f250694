//! Straight-line chains of polarizing elements ending in sensors

mod common;

use approx::assert_relative_eq;
use common::{component, init_logging, lamp, laser, polarizer, scene, sensor, sensor_with};
use optical_bench::{ComponentKind, LightTracer, SegmentEnd, SensorRequirement};
use polar_math::{ClassificationThresholds, Handedness, PolarizationKind, PolarizationState};

#[test]
fn test_three_polarizer_paradox() {
    init_logging();

    let bench = scene(vec![
        lamp(0.0, 0.0),
        polarizer("p0", 2.0, 0.0, 0.0),
        polarizer("p45", 4.0, 0.0, 45.0),
        polarizer("p90", 6.0, 0.0, 90.0),
        sensor("detector", 8.0, 0.0, 12.0),
    ]);
    let result = LightTracer::default().trace(&bench);

    let intensities: Vec<f64> = result.segments.iter().map(|s| s.intensity).collect();
    let expected = [100.0, 50.0, 25.0, 12.5];
    assert_eq!(intensities.len(), expected.len());
    for (got, want) in intensities.iter().zip(expected) {
        assert_relative_eq!(*got, want, epsilon = 1e-9);
    }

    let reading = result.reading("detector").unwrap();
    assert_relative_eq!(reading.intensity, 12.5, epsilon = 1e-9);
    assert!(reading.activated);
    assert!(!result.truncated);
}

#[test]
fn test_crossed_pair_blocks_light() {
    init_logging();

    let bench = scene(vec![
        lamp(0.0, 0.0),
        polarizer("p0", 2.0, 0.0, 0.0),
        polarizer("p90", 4.0, 0.0, 90.0),
        sensor("detector", 6.0, 0.0, 1.0),
    ]);
    let result = LightTracer::default().trace(&bench);

    let reading = result.reading("detector").unwrap();
    assert!(reading.intensity < 1e-9);
    assert!(!reading.activated);

    let last = result.segments.last().unwrap();
    assert_eq!(last.termination, SegmentEnd::Extinguished(Some("detector".to_string())));
}

#[test]
fn test_malus_law_through_scene() {
    for (axis, expected) in [(0.0, 100.0), (30.0, 75.0), (45.0, 50.0), (60.0, 25.0)] {
        let bench = scene(vec![
            laser("laser", 0.0, 0.0, 0.0, 100.0),
            polarizer("analyzer", 3.0, 0.0, axis),
            sensor("detector", 6.0, 0.0, 0.0),
        ]);
        let reading = LightTracer::default().trace(&bench).sensor_readings[0].clone();
        assert_relative_eq!(reading.intensity, expected, epsilon = 1e-9);
    }
}

#[test]
fn test_sensor_threshold_is_exact() {
    let at = scene(vec![laser("laser", 0.0, 0.0, 0.0, 50.0), sensor("s", 4.0, 0.0, 50.0)]);
    assert!(LightTracer::default().trace(&at).sensor_readings[0].activated);

    let below = scene(vec![laser("laser", 0.0, 0.0, 0.0, 49.9999), sensor("s", 4.0, 0.0, 50.0)]);
    let result = LightTracer::default().trace(&below);
    assert!(!result.sensor_readings[0].activated);
    assert!(!result.all_sensors_activated());
}

#[test]
fn test_quarter_wave_plate_makes_circular_light() {
    let target = |handedness| SensorRequirement::Target {
        state: PolarizationState::from_circular(handedness, 1.0),
        min_fidelity: 0.99,
    };
    let bench = scene(vec![
        laser("laser", 0.0, 0.0, 45.0, 80.0),
        component("qwp", 3.0, 0.0, ComponentKind::QuarterWavePlate),
        sensor_with("left", 6.0, 0.0, 10.0, target(Handedness::Left)),
    ]);
    let result = LightTracer::default().trace(&bench);
    let reading = &result.sensor_readings[0];
    assert!(reading.activated);
    assert_relative_eq!(reading.intensity, 80.0, epsilon = 1e-9);
    assert_eq!(
        reading.state.unwrap().classify(&Default::default()),
        PolarizationKind::Circular
    );

    let bench = scene(vec![
        laser("laser", 0.0, 0.0, 45.0, 80.0),
        component("qwp", 3.0, 0.0, ComponentKind::QuarterWavePlate),
        sensor_with("right", 6.0, 0.0, 10.0, target(Handedness::Right)),
    ]);
    let reading = &LightTracer::default().trace(&bench).sensor_readings[0];
    assert!(!reading.activated);
    assert!(reading.fidelity < 0.01);
}

#[test]
fn test_half_wave_plate_reflects_orientation() {
    let bench = scene(vec![
        laser("laser", 0.0, 0.0, 10.0, 100.0),
        component("hwp", 3.0, 0.0, ComponentKind::HalfWavePlate).with_angle(30.0),
        sensor_with(
            "s",
            6.0,
            0.0,
            90.0,
            SensorRequirement::LinearAngle {
                angle: 50.0,
                tolerance: 1.0,
            },
        ),
    ]);
    let reading = &LightTracer::default().trace(&bench).sensor_readings[0];
    assert!(reading.activated);
    assert_relative_eq!(reading.state.unwrap().orientation(), 50.0, epsilon = 1e-9);
}

#[test]
fn test_rotator_attenuator_and_depolarizer() {
    let bench = scene(vec![
        laser("laser", 0.0, 0.0, 0.0, 100.0),
        component("rot", 2.0, 0.0, ComponentKind::Rotator { rotation: 40.0 }),
        component("att", 4.0, 0.0, ComponentKind::Attenuator { transmission: 0.5 }),
        component(
            "dep",
            6.0,
            0.0,
            ComponentKind::Depolarizer {
                depolarization: 0.5,
            },
        ),
        sensor("s", 8.0, 0.0, 0.0),
    ]);
    let state = LightTracer::default().trace(&bench).sensor_readings[0].state.unwrap();
    assert_relative_eq!(state.intensity(), 50.0, epsilon = 1e-9);
    assert_relative_eq!(state.orientation(), 40.0, epsilon = 1e-9);
    assert_relative_eq!(state.degree_of_polarization(), 0.5, epsilon = 1e-9);
}

#[test]
fn test_no_light_reaches_hidden_sensor() {
    let bench = scene(vec![lamp(0.0, 0.0), sensor("off_axis", 4.0, 3.0, 0.5)]);
    let result = LightTracer::default().trace(&bench);
    let reading = result.reading("off_axis").unwrap();
    assert!(reading.state.is_none());
    assert_eq!(reading.intensity, 0.0);
    assert!(!reading.activated);
    assert_eq!(result.segments[0].termination, SegmentEnd::Boundary);
}

#[test]
fn test_linear_angle_sensor_ignores_light_without_axis() {
    let at_zero = || SensorRequirement::LinearAngle {
        angle: 0.0,
        tolerance: 5.0,
    };

    // a bare lamp has no polarization axis
    let bench = scene(vec![lamp(0.0, 0.0), sensor_with("s", 6.0, 0.0, 10.0, at_zero())]);
    let reading = &LightTracer::default().trace(&bench).sensor_readings[0];
    assert_relative_eq!(reading.intensity, 100.0, epsilon = 1e-9);
    assert!(!reading.activated);

    let bench = scene(vec![
        laser("laser", 0.0, 0.0, 45.0, 80.0),
        component("qwp", 3.0, 0.0, ComponentKind::QuarterWavePlate),
        sensor_with("s", 6.0, 0.0, 10.0, at_zero()),
    ]);
    let reading = &LightTracer::default().trace(&bench).sensor_readings[0];
    assert!(!reading.activated);

    // the same lamp through a polarizer does solve it
    let bench = scene(vec![
        lamp(0.0, 0.0),
        polarizer("p", 3.0, 0.0, 0.0),
        sensor_with("s", 6.0, 0.0, 10.0, at_zero()),
    ]);
    assert!(LightTracer::default().trace(&bench).all_sensors_activated());
}

#[test]
fn test_tracer_thresholds_decide_what_is_linear() {
    let bench = scene(vec![
        laser("laser", 0.0, 0.0, 0.0, 100.0),
        component(
            "haze",
            3.0,
            0.0,
            ComponentKind::Depolarizer {
                depolarization: 0.2,
            },
        ),
        sensor_with(
            "s",
            6.0,
            0.0,
            10.0,
            SensorRequirement::LinearAngle {
                angle: 0.0,
                tolerance: 5.0,
            },
        ),
    ]);
    assert!(!LightTracer::default().trace(&bench).all_sensors_activated());

    let lenient = LightTracer::default().with_thresholds(ClassificationThresholds {
        polarized_above: 0.7,
        ..Default::default()
    });
    assert!(lenient.trace(&bench).all_sensors_activated());
}
