//! Reflection and refraction at a dielectric interface
//!
//! Angles are measured from the surface normal, in degrees. Amplitude
//! coefficients use the convention
//!
//! ```text
//! rs = (n1·cosθi - n2·cosθt) / (n1·cosθi + n2·cosθt)
//! rp = (n2·cosθi - n1·cosθt) / (n2·cosθi + n1·cosθt)
//! ts = 2·n1·cosθi / (n1·cosθi + n2·cosθt)
//! tp = 2·n1·cosθi / (n2·cosθi + n1·cosθt)
//! ```
//!
//! so `rp` changes sign at Brewster's angle. Intensity transmittances are
//! `1 - R`; a dielectric interface does not absorb.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const AIR_INDEX: f64 = 1.0;
pub const WATER_INDEX: f64 = 1.333;
pub const GLASS_INDEX: f64 = 1.5;
pub const DIAMOND_INDEX: f64 = 2.417;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FresnelError {
    #[error("refractive index must be positive and finite, got {0}")]
    InvalidIndex(f64),
}

fn check_index(n: f64) -> Result<f64, FresnelError> {
    if n.is_finite() && n > 0.0 {
        Ok(n)
    } else {
        Err(FresnelError::InvalidIndex(n))
    }
}

/// Refraction angle from `n1·sinθi = n2·sinθt`
///
/// `Ok(None)` means total internal reflection.
pub fn snells_law(theta_i_deg: f64, n1: f64, n2: f64) -> Result<Option<f64>, FresnelError> {
    let (n1, n2) = (check_index(n1)?, check_index(n2)?);
    let sin_t = n1 / n2 * theta_i_deg.to_radians().sin();
    if sin_t.abs() > 1.0 {
        return Ok(None);
    }
    Ok(Some(sin_t.asin().to_degrees()))
}

/// Amplitude and intensity coefficients for one angle of incidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FresnelCoefficients {
    pub rs: f64,
    pub rp: f64,
    pub ts: f64,
    pub tp: f64,
    /// Refraction angle in degrees, `None` under total internal reflection
    pub theta_t: Option<f64>,
    pub reflectance_s: f64,
    pub reflectance_p: f64,
    pub transmittance_s: f64,
    pub transmittance_p: f64,
}

impl FresnelCoefficients {
    fn total_reflection() -> Self {
        Self {
            rs: 1.0,
            rp: 1.0,
            ts: 0.0,
            tp: 0.0,
            theta_t: None,
            reflectance_s: 1.0,
            reflectance_p: 1.0,
            transmittance_s: 0.0,
            transmittance_p: 0.0,
        }
    }

    pub fn is_total_internal_reflection(&self) -> bool {
        self.theta_t.is_none()
    }

    /// Reflectance seen by unpolarized light
    pub fn reflectance(&self) -> f64 {
        (self.reflectance_s + self.reflectance_p) / 2.0
    }
}

pub fn fresnel_coefficients(theta_i_deg: f64, n1: f64, n2: f64) -> Result<FresnelCoefficients, FresnelError> {
    let Some(theta_t) = snells_law(theta_i_deg, n1, n2)? else {
        return Ok(FresnelCoefficients::total_reflection());
    };

    let cos_i = theta_i_deg.to_radians().cos().abs();
    let cos_t = theta_t.to_radians().cos();

    let rs = (n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t);
    let rp = (n2 * cos_i - n1 * cos_t) / (n2 * cos_i + n1 * cos_t);
    let ts = 2.0 * n1 * cos_i / (n1 * cos_i + n2 * cos_t);
    let tp = 2.0 * n1 * cos_i / (n2 * cos_i + n1 * cos_t);

    let reflectance_s = rs * rs;
    let reflectance_p = rp * rp;

    Ok(FresnelCoefficients {
        rs,
        rp,
        ts,
        tp,
        theta_t: Some(theta_t),
        reflectance_s,
        reflectance_p,
        transmittance_s: 1.0 - reflectance_s,
        transmittance_p: 1.0 - reflectance_p,
    })
}

/// Incidence angle at which p-polarized light is not reflected: `atan(n2/n1)`
pub fn brewster_angle(n1: f64, n2: f64) -> Result<f64, FresnelError> {
    let (n1, n2) = (check_index(n1)?, check_index(n2)?);
    Ok((n2 / n1).atan().to_degrees())
}

/// Onset of total internal reflection, `None` unless going into a rarer medium
pub fn critical_angle(n1: f64, n2: f64) -> Result<Option<f64>, FresnelError> {
    let (n1, n2) = (check_index(n1)?, check_index(n2)?);
    if n1 <= n2 {
        return Ok(None);
    }
    Ok(Some((n2 / n1).asin().to_degrees()))
}
