//! Classification of polarization states
//!
//! Thresholds are gathered in [`ClassificationThresholds`] so callers can
//! inspect or tune the boundaries between classes instead of relying on
//! constants buried in the classifier.

use serde::{Deserialize, Serialize};

use crate::state::PolarizationState;

/// Rotation sense of circular or elliptical light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Right,
    Left,
}

impl Handedness {
    pub fn opposite(self) -> Self {
        match self {
            Handedness::Right => Handedness::Left,
            Handedness::Left => Handedness::Right,
        }
    }
}

/// Coarse polarization class used for sensor matching and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarizationKind {
    Linear,
    Circular,
    Elliptical,
    Unpolarized,
    Partial,
}

/// Boundaries between polarization classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    /// Degree of polarization strictly below this is unpolarized
    pub unpolarized_below: f64,
    /// Degree of polarization strictly above this is fully polarized
    pub polarized_above: f64,
    /// `|ellipticity| / 45°` at or above this is circular
    pub circular_closeness: f64,
    /// `|ellipticity| / 45°` at or below this is linear
    pub linear_closeness: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            unpolarized_below: 0.1,
            polarized_above: 0.9,
            circular_closeness: 0.95,
            linear_closeness: 0.05,
        }
    }
}

/// Derived description of a polarization state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarizationAnalysis {
    pub kind: PolarizationKind,
    /// Orientation of the ellipse major axis, degrees in [0, 180)
    pub orientation: f64,
    /// Ellipticity angle, degrees in [-45, 45]
    pub ellipticity: f64,
    /// `None` for linear and unpolarized light
    pub handedness: Option<Handedness>,
    pub degree_of_polarization: f64,
    pub intensity: f64,
}

/// Classify a state into a [`PolarizationKind`]
pub fn classify(state: &PolarizationState, thresholds: &ClassificationThresholds) -> PolarizationKind {
    let dop = state.degree_of_polarization();
    if dop < thresholds.unpolarized_below {
        return PolarizationKind::Unpolarized;
    }
    if dop <= thresholds.polarized_above {
        return PolarizationKind::Partial;
    }

    let closeness = state.ellipticity().abs() / 45.0;
    if closeness >= thresholds.circular_closeness {
        PolarizationKind::Circular
    } else if closeness <= thresholds.linear_closeness {
        PolarizationKind::Linear
    } else {
        PolarizationKind::Elliptical
    }
}

/// Full analysis of a state: class, ellipse geometry and handedness
pub fn analyze(state: &PolarizationState, thresholds: &ClassificationThresholds) -> PolarizationAnalysis {
    let kind = classify(state, thresholds);
    let handedness = match kind {
        PolarizationKind::Linear | PolarizationKind::Unpolarized => None,
        _ => state.handedness(),
    };

    PolarizationAnalysis {
        kind,
        orientation: state.orientation(),
        ellipticity: state.ellipticity(),
        handedness,
        degree_of_polarization: state.degree_of_polarization(),
        intensity: state.intensity(),
    }
}
