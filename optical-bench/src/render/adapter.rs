//! Mapping traced segments to render hints
//!
//! The adapter is the only piece a front end needs: it classifies the beam on
//! each segment, picks its colour and opacity, projects its end points and
//! builds the wave overlay. Rendering is a pure function of the segment.

use std::fmt;

use nalgebra::Point2;
use polar_math::{ClassificationThresholds, PolarizationAnalysis, PolarizationKind, PolarizationState};
use serde::{Deserialize, Serialize};

use super::palette::{Palette, Rgb};
use super::projection::Projection;
use super::wave::{wave_visualization, WaveConfig, WaveVisualization};
use crate::config::RenderConfig;
use crate::tracer::RaySegment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderHints {
    pub ray_id: usize,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub kind: PolarizationKind,
    pub color: Rgb,
    /// Intensity relative to the wave reference intensity, in [0, 1]
    pub opacity: f64,
    pub analysis: PolarizationAnalysis,
    pub wave: Option<WaveVisualization>,
}

pub struct RayRenderAdapter {
    projection: Projection,
    thresholds: ClassificationThresholds,
    palette: Box<dyn Palette>,
    wave: WaveConfig,
}

impl fmt::Debug for RayRenderAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayRenderAdapter")
            .field("projection", &self.projection)
            .field("thresholds", &self.thresholds)
            .field("palette", &self.palette.name())
            .field("wave", &self.wave)
            .finish()
    }
}

impl RayRenderAdapter {
    pub fn new(
        projection: Projection,
        thresholds: ClassificationThresholds,
        palette: Box<dyn Palette>,
        wave: WaveConfig,
    ) -> Self {
        Self {
            projection,
            thresholds,
            palette,
            wave,
        }
    }

    pub fn from_config(config: &RenderConfig, thresholds: ClassificationThresholds) -> Self {
        Self::new(config.projection, thresholds, config.palette.build(), config.wave)
    }

    pub fn with_palette(mut self, palette: Box<dyn Palette>) -> Self {
        self.palette = palette;
        self
    }

    pub fn classify(&self, state: &PolarizationState) -> PolarizationKind {
        state.classify(&self.thresholds)
    }

    pub fn render(&self, segment: &RaySegment) -> RenderHints {
        let analysis = segment.state.analyze(&self.thresholds);
        let color = self
            .palette
            .color_for(analysis.kind, analysis.orientation, analysis.handedness);
        let wave = wave_visualization(
            analysis.kind,
            analysis.orientation,
            analysis.ellipticity,
            analysis.handedness,
            analysis.intensity,
            &self.wave,
        )
        .map(|w| w.shifted(segment.phase));
        let opacity = if self.wave.reference_intensity > 0.0 {
            (analysis.intensity / self.wave.reference_intensity).clamp(0.0, 1.0)
        } else {
            0.0
        };

        RenderHints {
            ray_id: segment.ray_id,
            start: self.projection.project_bench(&segment.start),
            end: self.projection.project_bench(&segment.end),
            kind: analysis.kind,
            color,
            opacity,
            analysis,
            wave,
        }
    }

    pub fn render_all(&self, segments: &[RaySegment]) -> Vec<RenderHints> {
        segments.iter().map(|s| self.render(s)).collect()
    }
}

impl Default for RayRenderAdapter {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default(), ClassificationThresholds::default())
    }
}
