//! Rendering support for traced beams
//!
//! Nothing here draws; the module turns [`crate::tracer::RaySegment`]s into
//! plain data (screen coordinates, colours, wave overlays) for a front end.

pub mod adapter;
pub mod palette;
pub mod projection;
pub mod wave;

pub use adapter::{RayRenderAdapter, RenderHints};
pub use palette::{HuePalette, Palette, PaletteChoice, QuadrantPalette, Rgb};
pub use projection::{AffineProjection, Projection};
pub use wave::{wave_visualization, SecondaryWave, WaveConfig, WaveVisualization};
