//! Birefringent crystals and optically active solutions
//!
//! Closed-form helpers behind the bench's splitter, crystal plate and chiral
//! cell elements: the ordinary/extraordinary intensity split, retardation
//! accumulated in a crystal plate, and rotation of the polarization plane by
//! a chiral solution.

use serde::{Deserialize, Serialize};

use crate::angle::normalize_360;
use crate::state::PolarizationState;

/// Ordinary refractive index of calcite at 589 nm
pub const CALCITE_N_O: f64 = 1.658;

/// Extraordinary refractive index of calcite at 589 nm
pub const CALCITE_N_E: f64 = 1.486;

/// Intensities of the two rays leaving a birefringent crystal
///
/// `theta_deg` is the angle between the input polarization and the optic
/// axis. Energy is conserved: `ordinary + extraordinary == intensity`.
/// For linear input these are the intensities [`split_state`] produces.
pub fn birefringent_split(theta_deg: f64, intensity: f64) -> (f64, f64) {
    let cos2 = theta_deg.to_radians().cos().powi(2);
    let intensity = intensity.max(0.0);
    let ordinary = intensity * cos2;
    (ordinary, intensity - ordinary)
}

/// Split a state into its components along and across `optic_axis_deg`
///
/// Works for any input: unpolarized light divides evenly, circular light
/// divides evenly, linear light follows `cos²`/`sin²`.
pub fn split_state(state: &PolarizationState, optic_axis_deg: f64) -> (PolarizationState, PolarizationState) {
    (
        state.apply_polarizer(optic_axis_deg),
        state.apply_polarizer(optic_axis_deg + 90.0),
    )
}

/// Phase difference between o- and e-rays after a plate, degrees in [0, 360)
///
/// `Δφ = (2π/λ)·Δn·d`
pub fn phase_retardation(thickness_mm: f64, wavelength_nm: f64, delta_n: f64) -> f64 {
    if wavelength_nm <= 0.0 {
        return 0.0;
    }
    let thickness_m = thickness_mm * 1e-3;
    let wavelength_m = wavelength_nm * 1e-9;
    let phase_rad = 2.0 * std::f64::consts::PI / wavelength_m * delta_n * thickness_m;
    normalize_360(phase_rad.to_degrees())
}

/// Rotation of the polarization plane by an optically active solution
///
/// `α = [α]·l·c` with specific rotation in deg·mL/(g·dm), path length in dm
/// and concentration in g/mL. Positive is dextrorotatory.
pub fn optical_rotation(specific_rotation: f64, path_length_dm: f64, concentration_g_ml: f64) -> f64 {
    specific_rotation * path_length_dm * concentration_g_ml
}

/// Common sugars with tabulated specific rotation at 589 nm, 20 °C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChiralSubstance {
    Sucrose,
    Glucose,
    Fructose,
    Lactose,
}

impl ChiralSubstance {
    pub fn specific_rotation(&self) -> f64 {
        match self {
            ChiralSubstance::Sucrose => 66.5,
            ChiralSubstance::Glucose => 52.7,
            ChiralSubstance::Fructose => -92.4,
            ChiralSubstance::Lactose => 52.3,
        }
    }

    pub fn rotation(&self, path_length_dm: f64, concentration_g_ml: f64) -> f64 {
        optical_rotation(self.specific_rotation(), path_length_dm, concentration_g_ml)
    }
}
