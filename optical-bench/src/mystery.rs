//! Deducing the contents of a mystery box
//!
//! A hypothesis names an element and orientation that might be hidden in a
//! box. It is checked by tracing a copy of the scene with the box refilled
//! and comparing every sensor reading with the real scene's readings.

use log::debug;
use polar_math::PolarizationState;
use serde::{Deserialize, Serialize};

use crate::components::HiddenElement;
use crate::scene::{Scene, SceneError};
use crate::tracer::{LightTracer, TraceResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub label: String,
    pub hidden: HiddenElement,
    #[serde(default)]
    pub angle: f64,
}

impl Hypothesis {
    pub fn new(label: impl Into<String>, hidden: HiddenElement, angle: f64) -> Self {
        Self {
            label: label.into(),
            hidden,
            angle,
        }
    }
}

/// How closely hypothetical readings must match the real ones
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchTolerance {
    /// Largest allowed intensity difference per sensor
    pub intensity: f64,
    /// Smallest allowed fidelity between received states
    pub fidelity: f64,
}

impl Default for MatchTolerance {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            fidelity: 0.99,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisCheck {
    pub label: String,
    pub consistent: bool,
    pub max_intensity_error: f64,
    /// Worst state agreement across sensors that received light
    pub min_fidelity: f64,
}

fn compare(actual: &TraceResult, predicted: &TraceResult, min_intensity: f64) -> (f64, f64) {
    let mut max_error: f64 = 0.0;
    let mut min_fidelity: f64 = 1.0;
    for (a, p) in actual.sensor_readings.iter().zip(&predicted.sensor_readings) {
        max_error = max_error.max((a.intensity - p.intensity).abs());
        if a.intensity > min_intensity && p.intensity > min_intensity {
            let a_state = a.state.unwrap_or_else(PolarizationState::dark);
            let p_state = p.state.unwrap_or_else(PolarizationState::dark);
            min_fidelity = min_fidelity.min(a_state.fidelity(&p_state));
        }
    }
    (max_error, min_fidelity)
}

/// Check each hypothesis for the box `box_id` against the real scene
pub fn test_hypotheses(
    tracer: &LightTracer,
    scene: &Scene,
    box_id: &str,
    hypotheses: &[Hypothesis],
    tolerance: &MatchTolerance,
) -> Result<Vec<HypothesisCheck>, SceneError> {
    let actual = tracer.trace(scene);
    let min_intensity = tracer.config().min_intensity;

    hypotheses
        .iter()
        .map(|hypothesis| {
            let candidate = scene.with_hidden(box_id, hypothesis.hidden, hypothesis.angle)?;
            let predicted = tracer.trace(&candidate);
            let (max_intensity_error, min_fidelity) = compare(&actual, &predicted, min_intensity);
            let consistent = max_intensity_error <= tolerance.intensity && min_fidelity >= tolerance.fidelity;
            debug!(
                "Hypothesis '{}': dI={:.4}, F={:.4}, consistent={}",
                hypothesis.label, max_intensity_error, min_fidelity, consistent
            );
            Ok(HypothesisCheck {
                label: hypothesis.label.clone(),
                consistent,
                max_intensity_error,
                min_fidelity,
            })
        })
        .collect()
}

/// Labels of the hypotheses consistent with the observations
pub fn consistent_hypotheses(
    tracer: &LightTracer,
    scene: &Scene,
    box_id: &str,
    hypotheses: &[Hypothesis],
    tolerance: &MatchTolerance,
) -> Result<Vec<String>, SceneError> {
    Ok(test_hypotheses(tracer, scene, box_id, hypotheses, tolerance)?
        .into_iter()
        .filter(|check| check.consistent)
        .map(|check| check.label)
        .collect())
}
