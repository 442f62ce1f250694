//! Sensor requirements and readings

use polar_math::{axis_difference, ClassificationThresholds, PolarizationKind, PolarizationState};
use serde::{Deserialize, Serialize};

fn default_angle_tolerance() -> f64 {
    5.0
}

/// Polarization a sensor must see, on top of its intensity threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SensorRequirement {
    /// Linear light oriented within `tolerance` degrees of `angle`, modulo 180
    LinearAngle {
        angle: f64,
        #[serde(default = "default_angle_tolerance")]
        tolerance: f64,
    },
    /// Fidelity with `state` of at least `min_fidelity`
    Target {
        state: PolarizationState,
        min_fidelity: f64,
    },
}

impl SensorRequirement {
    /// Reference state used for the reading's fidelity
    pub fn target(&self) -> PolarizationState {
        match self {
            SensorRequirement::LinearAngle { angle, .. } => PolarizationState::from_linear(*angle, 1.0),
            SensorRequirement::Target { state, .. } => *state,
        }
    }

    /// Unpolarized, circular and elliptical light never meet a `LinearAngle`
    /// requirement, whatever orientation they report.
    pub fn is_met(&self, received: &PolarizationState, thresholds: &ClassificationThresholds) -> bool {
        match self {
            SensorRequirement::LinearAngle { angle, tolerance } => {
                received.classify(thresholds) == PolarizationKind::Linear
                    && axis_difference(received.orientation(), *angle) <= *tolerance
            }
            SensorRequirement::Target { state, min_fidelity } => received.fidelity(state) >= *min_fidelity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_id: String,
    pub activated: bool,
    /// Total received intensity
    pub intensity: f64,
    /// Incoherent sum of every beam that reached the sensor
    pub state: Option<PolarizationState>,
    pub fidelity: f64,
}

/// Evaluate a sensor against the light it received
///
/// `received` is `None` when no beam reached the sensor. The intensity
/// comparison is exact: a threshold of 50.0 is met by 50.0 but not 49.9999.
/// `thresholds` decide what counts as linear light.
pub fn evaluate(
    sensor_id: &str,
    required_intensity: f64,
    requirement: Option<&SensorRequirement>,
    received: Option<PolarizationState>,
    thresholds: &ClassificationThresholds,
) -> SensorReading {
    let intensity = received.as_ref().map_or(0.0, PolarizationState::intensity);

    let (fidelity, requirement_met) = match (requirement, &received) {
        (Some(req), Some(state)) => (state.fidelity(&req.target()), req.is_met(state, thresholds)),
        (Some(_), None) => (0.0, false),
        (None, Some(state)) if state.intensity() > 0.0 => (1.0, true),
        (None, _) => (0.0, true),
    };

    SensorReading {
        sensor_id: sensor_id.to_string(),
        activated: intensity >= required_intensity && requirement_met,
        intensity,
        state: received,
        fidelity,
    }
}
