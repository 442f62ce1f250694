//! Two-dimensional light tracer
//!
//! Rays leave every emitter in component order and are followed through the
//! scene breadth-first. At each step the nearest component in front of the
//! ray is found by projecting component centres onto the ray; the component
//! then transmits, redirects, splits or absorbs the beam.
//!
//! Termination is guaranteed by two limits from [`TracerConfig`]:
//! `max_bounces` segments per branch and `max_segments` segments per
//! trace. Hitting either marks the result as truncated, it is never an error.

use std::collections::VecDeque;

use log::{debug, warn};
use nalgebra::{Point2, Vector2};
use polar_math::{ClassificationThresholds, PolarizationState};
use serde::{Deserialize, Serialize};

use crate::components::{ComponentKind, Interaction};
use crate::config::TracerConfig;
use crate::scene::{Scene, SceneBounds};
use crate::sensor::{evaluate, SensorReading};

/// How a segment ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum SegmentEnd {
    /// Reached a component which acted on the beam
    Component(String),
    /// Left the scene
    Boundary,
    /// Too weak to continue, optionally at the component it reached
    Extinguished(Option<String>),
    /// Reached a component with no bounces left
    BounceLimit(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaySegment {
    pub ray_id: usize,
    /// Ray this one was split from
    pub parent_ray_id: Option<usize>,
    /// Emitter the light came from
    pub source_id: String,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    /// State travelling along the segment, before the component at `end` acts
    pub state: PolarizationState,
    pub intensity: f64,
    /// Accumulated carrier phase in degrees
    pub phase: f64,
    /// Interactions before this segment
    pub bounce: usize,
    pub termination: SegmentEnd,
}

impl RaySegment {
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    pub segments: Vec<RaySegment>,
    /// One reading per sensor, in component order
    pub sensor_readings: Vec<SensorReading>,
    /// A bounce or segment limit cut the trace short
    pub truncated: bool,
}

impl TraceResult {
    pub fn reading(&self, sensor_id: &str) -> Option<&SensorReading> {
        self.sensor_readings.iter().find(|r| r.sensor_id == sensor_id)
    }

    pub fn all_sensors_activated(&self) -> bool {
        !self.sensor_readings.is_empty() && self.sensor_readings.iter().all(|r| r.activated)
    }

    pub fn segments_for_ray(&self, ray_id: usize) -> impl Iterator<Item = &RaySegment> {
        self.segments.iter().filter(move |s| s.ray_id == ray_id)
    }
}

/// A branch waiting to be propagated
struct PendingRay {
    ray_id: usize,
    parent_ray_id: Option<usize>,
    source_id: String,
    origin: Point2<f64>,
    direction: Vector2<f64>,
    state: PolarizationState,
    phase: f64,
    bounce: usize,
    /// Component the ray is leaving, excluded from the next hit search
    leaving: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct LightTracer {
    config: TracerConfig,
    /// Used by sensors to decide whether received light is linear
    thresholds: ClassificationThresholds,
}

impl LightTracer {
    pub fn new(config: TracerConfig) -> Self {
        Self {
            config,
            thresholds: ClassificationThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: ClassificationThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &ClassificationThresholds {
        &self.thresholds
    }

    /// Trace every emitter of `scene` and evaluate its sensors
    pub fn trace(&self, scene: &Scene) -> TraceResult {
        let components = scene.components();
        let mut queue = VecDeque::new();
        let mut next_ray_id = 0;

        for emitter in scene.emitters() {
            let Some((direction, state)) = emitter.emission() else {
                continue;
            };
            queue.push_back(PendingRay {
                ray_id: next_ray_id,
                parent_ray_id: None,
                source_id: emitter.id.clone(),
                origin: emitter.position,
                direction,
                state,
                phase: 0.0,
                bounce: 0,
                leaving: None,
            });
            next_ray_id += 1;
        }

        let mut segments = Vec::new();
        let mut arrivals: Vec<Option<PolarizationState>> = vec![None; components.len()];
        let mut truncated = false;

        while let Some(ray) = queue.pop_front() {
            if segments.len() >= self.config.max_segments {
                warn!(
                    "Segment limit {} reached, dropping {} pending rays",
                    self.config.max_segments,
                    queue.len() + 1
                );
                truncated = true;
                break;
            }

            let intensity = ray.state.intensity();
            let extinguished = intensity <= self.config.min_intensity;

            let Some((index, t)) = self.nearest_hit(scene, &ray) else {
                match boundary_exit(scene.bounds(), &ray.origin, &ray.direction, self.config.epsilon) {
                    Some(exit) => {
                        debug!("Ray {} leaves the scene at ({:.3}, {:.3})", ray.ray_id, exit.x, exit.y);
                        let termination = if extinguished {
                            SegmentEnd::Extinguished(None)
                        } else {
                            SegmentEnd::Boundary
                        };
                        segments.push(segment(&ray, exit, termination));
                    }
                    None => debug!("Ray {} starts on or outside the boundary, no segment", ray.ray_id),
                }
                continue;
            };

            let component = &components[index];
            let hit = ray.origin + ray.direction * t;
            debug!(
                "Ray {} hits '{}' ({}) at t={:.3}, I={:.4}",
                ray.ray_id,
                component.id,
                component.kind.type_name(),
                t,
                intensity
            );

            if extinguished {
                if component.is_sensor() {
                    accumulate(&mut arrivals[index], ray.state);
                }
                segments.push(segment(&ray, hit, SegmentEnd::Extinguished(Some(component.id.clone()))));
                continue;
            }

            if ray.bounce + 1 >= self.config.max_bounces && !component.is_sensor() {
                warn!(
                    "Ray {} from '{}' reached the bounce limit of {} at '{}'",
                    ray.ray_id, ray.source_id, self.config.max_bounces, component.id
                );
                truncated = true;
                segments.push(segment(&ray, hit, SegmentEnd::BounceLimit(component.id.clone())));
                continue;
            }

            segments.push(segment(&ray, hit, SegmentEnd::Component(component.id.clone())));

            let continued = |state: PolarizationState,
                             direction: Vector2<f64>,
                             phase: f64,
                             ray_id: usize,
                             parent_ray_id: Option<usize>| PendingRay {
                ray_id,
                parent_ray_id,
                source_id: ray.source_id.clone(),
                origin: hit,
                direction,
                state,
                phase,
                bounce: ray.bounce + 1,
                leaving: Some(index),
            };

            match component.interact(&ray.state, &ray.direction) {
                Interaction::Transmit { state, phase_shift } => {
                    let phase = (ray.phase + phase_shift).rem_euclid(360.0);
                    queue.push_back(continued(state, ray.direction, phase, ray.ray_id, ray.parent_ray_id));
                }
                Interaction::Redirect { state, direction } => {
                    queue.push_back(continued(state, direction, ray.phase, ray.ray_id, ray.parent_ray_id));
                }
                Interaction::Split {
                    ordinary,
                    extraordinary,
                    extraordinary_direction,
                } => {
                    let parent = Some(ray.ray_id);
                    queue.push_back(continued(ordinary, ray.direction, ray.phase, next_ray_id, parent));
                    queue.push_back(continued(
                        extraordinary,
                        extraordinary_direction,
                        ray.phase,
                        next_ray_id + 1,
                        parent,
                    ));
                    next_ray_id += 2;
                }
                Interaction::Absorb => accumulate(&mut arrivals[index], ray.state),
            }
        }

        let sensor_readings = components
            .iter()
            .zip(arrivals)
            .filter_map(|(component, received)| match &component.kind {
                ComponentKind::Sensor {
                    required_intensity,
                    requirement,
                } => Some(evaluate(
                    &component.id,
                    *required_intensity,
                    requirement.as_ref(),
                    received,
                    &self.thresholds,
                )),
                _ => None,
            })
            .collect();

        TraceResult {
            segments,
            sensor_readings,
            truncated,
        }
    }

    /// Nearest component in front of the ray as `(index, distance)`
    ///
    /// Emitters never interact with rays. Equal distances within `epsilon`
    /// resolve to the earlier component.
    fn nearest_hit(&self, scene: &Scene, ray: &PendingRay) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, component) in scene.components().iter().enumerate() {
            if component.is_emitter() || ray.leaving == Some(index) {
                continue;
            }
            let rel = component.position - ray.origin;
            let t = rel.dot(&ray.direction);
            if t <= self.config.epsilon {
                continue;
            }
            let miss = (rel - ray.direction * t).norm();
            if miss > self.config.hit_radius {
                continue;
            }
            match best {
                Some((_, best_t)) if t >= best_t - self.config.epsilon => {}
                _ => best = Some((index, t)),
            }
        }
        best
    }
}

fn accumulate(slot: &mut Option<PolarizationState>, state: PolarizationState) {
    *slot = Some(match slot.take() {
        Some(existing) => existing + state,
        None => state,
    });
}

fn segment(ray: &PendingRay, end: Point2<f64>, termination: SegmentEnd) -> RaySegment {
    RaySegment {
        ray_id: ray.ray_id,
        parent_ray_id: ray.parent_ray_id,
        source_id: ray.source_id.clone(),
        start: ray.origin,
        end,
        state: ray.state,
        intensity: ray.state.intensity(),
        phase: ray.phase,
        bounce: ray.bounce,
        termination,
    }
}

/// Where a ray from `origin` leaves `bounds`, `None` for a zero-length exit
fn boundary_exit(bounds: &SceneBounds, origin: &Point2<f64>, direction: &Vector2<f64>, epsilon: f64) -> Option<Point2<f64>> {
    let axis_exit = |o: f64, d: f64, min: f64, max: f64| {
        if d > epsilon {
            (max - o) / d
        } else if d < -epsilon {
            (min - o) / d
        } else {
            f64::INFINITY
        }
    };
    let t = axis_exit(origin.x, direction.x, bounds.min.x, bounds.max.x)
        .min(axis_exit(origin.y, direction.y, bounds.min.y, bounds.max.y));

    if t.is_finite() && t > epsilon {
        Some(origin + direction * t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{OpticalComponent, SourcePolarization};
    use approx::assert_relative_eq;

    fn emitter(x: f64, y: f64, direction: f64) -> OpticalComponent {
        OpticalComponent::new(
            "laser",
            Point2::new(x, y),
            ComponentKind::Emitter {
                direction,
                source: SourcePolarization::Unpolarized,
                intensity: 100.0,
            },
        )
    }

    fn scene(components: Vec<OpticalComponent>) -> Scene {
        Scene::new(
            components,
            SceneBounds::new(Point2::new(-10.0, -10.0), Point2::new(10.0, 10.0)),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_scene_runs_to_boundary() {
        let result = LightTracer::default().trace(&scene(vec![emitter(0.0, 0.0, 0.0)]));
        assert_eq!(result.segments.len(), 1);
        let seg = &result.segments[0];
        assert_eq!(seg.termination, SegmentEnd::Boundary);
        assert_relative_eq!(seg.end, Point2::new(10.0, 0.0), epsilon = 1e-12);
        assert!(!result.truncated);
    }

    #[test]
    fn test_emitter_on_boundary_has_no_segment() {
        let result = LightTracer::default().trace(&scene(vec![emitter(10.0, 0.0, 0.0)]));
        assert!(result.segments.is_empty());
    }

    #[test]
    fn test_components_behind_are_ignored() {
        let result = LightTracer::default().trace(&scene(vec![
            emitter(0.0, 0.0, 0.0),
            OpticalComponent::new("behind", Point2::new(-3.0, 0.0), ComponentKind::Polarizer),
            OpticalComponent::new("aside", Point2::new(3.0, 2.0), ComponentKind::Polarizer),
        ]));
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].termination, SegmentEnd::Boundary);
    }

    #[test]
    fn test_component_on_emitter_is_skipped() {
        let result = LightTracer::default().trace(&scene(vec![
            emitter(0.0, 0.0, 0.0),
            OpticalComponent::new("stacked", Point2::new(0.0, 0.0), ComponentKind::Polarizer),
            OpticalComponent::new(
                "s",
                Point2::new(5.0, 0.0),
                ComponentKind::Sensor {
                    required_intensity: 100.0,
                    requirement: None,
                },
            ),
        ]));
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].termination, SegmentEnd::Component("s".to_string()));
        assert!(result
            .segments
            .iter()
            .all(|s| s.termination != SegmentEnd::Component("stacked".to_string())));
        let reading = result.reading("s").unwrap();
        assert_relative_eq!(reading.intensity, 100.0, epsilon = 1e-9);
        assert!(reading.activated);
        assert_relative_eq!(reading.state.unwrap().degree_of_polarization(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_equal_distance_prefers_array_order() {
        let result = LightTracer::default().trace(&scene(vec![
            emitter(0.0, 0.0, 0.0),
            OpticalComponent::new("first", Point2::new(3.0, 0.2), ComponentKind::Polarizer),
            OpticalComponent::new("second", Point2::new(3.0, -0.2), ComponentKind::Polarizer),
        ]));
        assert_eq!(
            result.segments[0].termination,
            SegmentEnd::Component("first".to_string())
        );
    }

    #[test]
    fn test_phase_shifter_accumulates_phase() {
        let result = LightTracer::default().trace(&scene(vec![
            emitter(0.0, 0.0, 0.0),
            OpticalComponent::new("ps1", Point2::new(2.0, 0.0), ComponentKind::PhaseShifter { phase: 270.0 }),
            OpticalComponent::new("ps2", Point2::new(4.0, 0.0), ComponentKind::PhaseShifter { phase: 180.0 }),
        ]));
        let phases: Vec<f64> = result.segments.iter().map(|s| s.phase).collect();
        assert_eq!(phases, vec![0.0, 270.0, 90.0]);
    }

    #[test]
    fn test_segment_limit_truncates() {
        let tracer = LightTracer::new(TracerConfig {
            max_segments: 2,
            ..Default::default()
        });
        let result = tracer.trace(&scene(vec![
            emitter(0.0, 0.0, 0.0),
            OpticalComponent::new("a", Point2::new(2.0, 0.0), ComponentKind::Polarizer),
            OpticalComponent::new("b", Point2::new(4.0, 0.0), ComponentKind::Polarizer),
            OpticalComponent::new("c", Point2::new(6.0, 0.0), ComponentKind::Polarizer),
        ]));
        assert_eq!(result.segments.len(), 2);
        assert!(result.truncated);
    }

    #[test]
    fn test_boundary_exit() {
        let bounds = SceneBounds::new(Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0));
        let diag = Vector2::new(1.0, 1.0).normalize();
        let exit = boundary_exit(&bounds, &Point2::new(0.0, 0.5), &diag, 1e-9).unwrap();
        assert_relative_eq!(exit, Point2::new(0.5, 1.0), epsilon = 1e-12);
        assert!(boundary_exit(&bounds, &Point2::new(2.0, 0.0), &Vector2::x(), 1e-9).is_none());
    }
}
