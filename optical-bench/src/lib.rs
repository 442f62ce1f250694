//! Polarization optics bench
//!
//! This crate places optical components on a 2D bench, traces light from
//! emitters through them and turns the result into data a front end can
//! draw, including:
//!
//! - **Scene** - ordered components, bounds, locked pieces and JSON files
//! - **Tracer** - nearest-hit ray propagation with splitting and termination limits
//! - **Sensors** - intensity thresholds and polarization requirements
//! - **Mystery boxes** - checking hypotheses about hidden elements
//! - **Render** - projection, palettes and wave overlays per segment

pub mod components;
pub mod config;
pub mod mystery;
pub mod render;
pub mod scene;
pub mod sensor;
pub mod shared_args;
pub mod tracer;

// Re-exports for easier access
pub use components::{direction_vector, ComponentKind, HiddenElement, Interaction, OpticalComponent, SourcePolarization};
pub use config::{BenchConfig, ConfigError, RenderConfig, TracerConfig};
pub use mystery::{consistent_hypotheses, test_hypotheses, Hypothesis, HypothesisCheck, MatchTolerance};
pub use render::{RayRenderAdapter, RenderHints};
pub use scene::{Scene, SceneBounds, SceneError};
pub use sensor::{SensorReading, SensorRequirement};
pub use tracer::{LightTracer, RaySegment, SegmentEnd, TraceResult};
