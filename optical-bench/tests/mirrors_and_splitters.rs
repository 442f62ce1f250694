//! Beam steering: mirrors, loops, splitting and merging at sensors

mod common;

use approx::assert_relative_eq;
use common::{component, emitter, init_logging, lamp, laser, mirror, scene, sensor, sensor_with};
use nalgebra::Point2;
use optical_bench::{
    direction_vector, ComponentKind, LightTracer, SegmentEnd, SensorRequirement, SourcePolarization, TracerConfig,
};
use polar_math::{brewster_angle, fresnel_coefficients, AIR_INDEX, GLASS_INDEX};

#[test]
fn test_mirror_turns_beam_onto_sensor() {
    let bench = scene(vec![
        laser("laser", 0.0, 0.0, 20.0, 100.0),
        mirror("m", 5.0, 0.0, 45.0),
        sensor("s", 5.0, 5.0, 99.0),
    ]);
    let result = LightTracer::default().trace(&bench);

    assert_eq!(result.segments.len(), 2);
    assert_relative_eq!(result.segments[1].end, Point2::new(5.0, 5.0), epsilon = 1e-9);
    let reading = result.reading("s").unwrap();
    assert!(reading.activated);
    // mirrors leave the polarization alone
    assert_relative_eq!(reading.state.unwrap().orientation(), 20.0, epsilon = 1e-9);
}

#[test]
fn test_mirror_loop_terminates_at_bounce_cap() {
    init_logging();

    // Four mirrors send the beam around a square forever
    let bench = scene(vec![
        emitter("lamp", 2.0, 0.0, 0.0, SourcePolarization::Unpolarized, 100.0),
        mirror("b", 4.0, 0.0, 45.0),
        mirror("c", 4.0, 4.0, 135.0),
        mirror("d", 0.0, 4.0, 45.0),
        mirror("a", 0.0, 0.0, 135.0),
    ]);
    let config = TracerConfig::default();
    let result = LightTracer::new(config).trace(&bench);

    assert!(result.truncated);
    assert_eq!(result.segments.len(), config.max_bounces);
    assert!(matches!(
        result.segments.last().unwrap().termination,
        SegmentEnd::BounceLimit(_)
    ));
    for segment in &result.segments {
        assert_relative_eq!(segment.intensity, 100.0, epsilon = 1e-9);
        assert!(segment.bounce < config.max_bounces);
    }

    let short = LightTracer::new(TracerConfig {
        max_bounces: 5,
        ..config
    })
    .trace(&bench);
    assert_eq!(short.segments.len(), 5);
}

#[test]
fn test_splitter_branches() {
    init_logging();

    let bench = scene(vec![
        laser("laser", 0.0, 0.0, 30.0, 100.0),
        component("calcite", 3.0, 0.0, ComponentKind::Splitter { split_angle: 90.0 }),
        sensor("ordinary", 6.0, 0.0, 0.0),
        sensor("extraordinary", 3.0, 3.0, 0.0),
    ]);
    let result = LightTracer::default().trace(&bench);

    let o = result.reading("ordinary").unwrap();
    let e = result.reading("extraordinary").unwrap();
    assert_relative_eq!(o.intensity, 75.0, epsilon = 1e-9);
    assert_relative_eq!(e.intensity, 25.0, epsilon = 1e-9);
    assert_relative_eq!(o.intensity + e.intensity, 100.0, epsilon = 1e-9);
    assert_relative_eq!(o.state.unwrap().orientation(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(e.state.unwrap().orientation(), 90.0, epsilon = 1e-9);

    // readings follow component order
    let ids: Vec<&str> = result.sensor_readings.iter().map(|r| r.sensor_id.as_str()).collect();
    assert_eq!(ids, vec!["ordinary", "extraordinary"]);

    // both children point back at the incoming ray
    let parent = result.segments[0].ray_id;
    let children: Vec<_> = result.segments[1..].iter().collect();
    assert_eq!(children.len(), 2);
    for child in &children {
        assert_eq!(child.parent_ray_id, Some(parent));
        assert_ne!(child.ray_id, parent);
    }
    assert_ne!(children[0].ray_id, children[1].ray_id);
    assert_eq!(result.segments_for_ray(parent).count(), 1);
}

#[test]
fn test_brewster_window_polarizes_reflection() {
    init_logging();

    let theta_b = brewster_angle(AIR_INDEX, GLASS_INDEX).unwrap();
    let reflected_at = Point2::new(4.0, 0.0) + direction_vector(180.0 - 2.0 * theta_b) * 5.0;
    let bench = scene(vec![
        lamp(0.0, 0.0),
        component(
            "window",
            4.0,
            0.0,
            ComponentKind::DielectricSurface {
                surface_angle: 90.0 - theta_b,
                refractive_index: GLASS_INDEX,
            },
        ),
        sensor("through", 9.0, 0.0, 0.0),
        sensor_with(
            "glare",
            reflected_at.x,
            reflected_at.y,
            1.0,
            SensorRequirement::LinearAngle {
                angle: 90.0,
                tolerance: 1.0,
            },
        ),
    ]);
    let result = LightTracer::default().trace(&bench);

    let reflectance_s = fresnel_coefficients(theta_b, AIR_INDEX, GLASS_INDEX)
        .unwrap()
        .reflectance_s;
    let glare = result.reading("glare").unwrap();
    assert!(glare.activated, "reading: {glare:?}");
    assert_relative_eq!(glare.intensity, 50.0 * reflectance_s, epsilon = 1e-9);

    let through = result.reading("through").unwrap();
    assert_relative_eq!(through.intensity + glare.intensity, 100.0, epsilon = 1e-9);
    assert!(through.state.unwrap().degree_of_polarization() < 0.1);

    // both branches hang off the incoming ray
    let parent = result.segments[0].ray_id;
    assert_eq!(result.segments[1..].iter().filter(|s| s.parent_ray_id == Some(parent)).count(), 2);
}

#[test]
fn test_beams_add_incoherently_at_sensor() {
    let bench = scene(vec![
        laser("horizontal", 0.0, 0.0, 0.0, 30.0),
        emitter("vertical", 5.0, -5.0, 90.0, SourcePolarization::Linear, 30.0).with_angle(90.0),
        sensor("s", 5.0, 0.0, 60.0),
    ]);
    let result = LightTracer::default().trace(&bench);
    let reading = result.reading("s").unwrap();
    assert!(reading.activated);
    assert_relative_eq!(reading.intensity, 60.0, epsilon = 1e-9);
    // orthogonal polarizations sum to natural light
    assert_relative_eq!(reading.state.unwrap().degree_of_polarization(), 0.0, epsilon = 1e-9);
}

#[test]
fn test_emitters_are_transparent() {
    let bench = scene(vec![
        laser("laser", 0.0, 0.0, 0.0, 100.0),
        laser("other", 3.0, 0.0, 90.0, 10.0),
        sensor("s", 6.0, 0.0, 0.0),
    ]);
    let result = LightTracer::default().trace(&bench);
    // first beam passes "other" and both land on the sensor
    assert_relative_eq!(result.reading("s").unwrap().intensity, 110.0, epsilon = 1e-9);
    assert!(result
        .segments
        .iter()
        .all(|s| s.termination == SegmentEnd::Component("s".to_string())));
}
