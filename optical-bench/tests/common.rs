//! Common builders for optical bench tests
#![allow(dead_code)]

use nalgebra::Point2;
use optical_bench::{ComponentKind, OpticalComponent, Scene, SceneBounds, SensorRequirement, SourcePolarization};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Emitter firing along `direction` degrees
pub fn emitter(id: &str, x: f64, y: f64, direction: f64, source: SourcePolarization, intensity: f64) -> OpticalComponent {
    OpticalComponent::new(
        id,
        Point2::new(x, y),
        ComponentKind::Emitter {
            direction,
            source,
            intensity,
        },
    )
}

/// Unpolarized 100-unit emitter firing along +x
pub fn lamp(x: f64, y: f64) -> OpticalComponent {
    emitter("lamp", x, y, 0.0, SourcePolarization::Unpolarized, 100.0)
}

/// Linearly polarized emitter firing along +x
pub fn laser(id: &str, x: f64, y: f64, angle: f64, intensity: f64) -> OpticalComponent {
    emitter(id, x, y, 0.0, SourcePolarization::Linear, intensity).with_angle(angle)
}

pub fn component(id: &str, x: f64, y: f64, kind: ComponentKind) -> OpticalComponent {
    OpticalComponent::new(id, Point2::new(x, y), kind)
}

pub fn polarizer(id: &str, x: f64, y: f64, axis: f64) -> OpticalComponent {
    component(id, x, y, ComponentKind::Polarizer).with_angle(axis)
}

pub fn sensor(id: &str, x: f64, y: f64, required_intensity: f64) -> OpticalComponent {
    component(
        id,
        x,
        y,
        ComponentKind::Sensor {
            required_intensity,
            requirement: None,
        },
    )
}

pub fn sensor_with(id: &str, x: f64, y: f64, required_intensity: f64, requirement: SensorRequirement) -> OpticalComponent {
    component(
        id,
        x,
        y,
        ComponentKind::Sensor {
            required_intensity,
            requirement: Some(requirement),
        },
    )
}

pub fn mirror(id: &str, x: f64, y: f64, surface_angle: f64) -> OpticalComponent {
    component(id, x, y, ComponentKind::Mirror { surface_angle })
}

/// Scene with the default bounds
pub fn scene(components: Vec<OpticalComponent>) -> Scene {
    Scene::new(components, SceneBounds::default()).expect("valid test scene")
}
