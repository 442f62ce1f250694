//! Stokes parameters for partially polarized light
//!
//! Sign convention, shared with [`crate::jones`]:
//!
//! ```text
//! S0 = |Ex|² + |Ey|²
//! S1 = |Ex|² - |Ey|²
//! S2 = 2·Re(Ex·Ey*)
//! S3 = 2·Im(Ex·Ey*)
//! ```
//!
//! Positive S3 is left-handed, negative S3 right-handed.

use std::ops::{Add, Mul};

use nalgebra::{Complex, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::Handedness;
use crate::jones::JonesVector;

/// Relative slack allowed when checking `S1² + S2² + S3² <= S0²`
const REALIZABILITY_TOLERANCE: f64 = 1e-3;

/// Below this DoP a Stokes vector has no meaningful Jones equivalent
const JONES_MIN_DOP: f64 = 0.99;

/// Ellipticity (degrees) below which the ellipse is reported without handedness
const LINEAR_ELLIPTICITY_DEG: f64 = 0.1;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StokesError {
    #[error("S0 must be non-negative, got {0}")]
    NegativeIntensity(f64),

    #[error("unphysical Stokes vector: polarized power {polarized:.4} exceeds total {total:.4}")]
    Unphysical { polarized: f64, total: f64 },

    #[error("cannot convert to a Jones vector: DoP = {dop:.3} < 1")]
    NotFullyPolarized { dop: f64 },
}

/// Four real Stokes parameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StokesVector {
    pub s0: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

/// Geometry of the polarization ellipse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipseParameters {
    pub semi_major: f64,
    pub semi_minor: f64,
    /// Degrees in [0, 180)
    pub orientation: f64,
    /// Degrees in [-45, 45], of the polarized part only
    pub ellipticity: f64,
    pub handedness: Option<Handedness>,
}

impl StokesVector {
    pub fn new(s0: f64, s1: f64, s2: f64, s3: f64) -> Self {
        Self { s0, s1, s2, s3 }
    }

    pub fn unpolarized(intensity: f64) -> Self {
        Self::new(intensity.max(0.0), 0.0, 0.0, 0.0)
    }

    pub fn from_jones(jones: &JonesVector) -> Self {
        let cross = jones.ex * jones.ey.conj();
        Self::new(
            jones.ex.norm_sqr() + jones.ey.norm_sqr(),
            jones.ex.norm_sqr() - jones.ey.norm_sqr(),
            2.0 * cross.re,
            2.0 * cross.im,
        )
    }

    /// Build from six analyzer measurements (H, V, +45, -45, R, L)
    ///
    /// S0 is the mean of the three complementary pairs.
    pub fn from_intensities(h: f64, v: f64, p45: f64, m45: f64, right: f64, left: f64) -> Self {
        Self::new(
            (h + v + p45 + m45 + right + left) / 3.0,
            h - v,
            p45 - m45,
            left - right,
        )
    }

    /// Check physical realizability: non-negative S0 and `|S⃗| <= S0`
    pub fn validate(&self) -> Result<(), StokesError> {
        if self.s0 < 0.0 {
            return Err(StokesError::NegativeIntensity(self.s0));
        }
        let polarized = self.polarized_intensity();
        if polarized > self.s0 * (1.0 + REALIZABILITY_TOLERANCE) {
            return Err(StokesError::Unphysical {
                polarized,
                total: self.s0,
            });
        }
        Ok(())
    }

    /// Length of the (S1, S2, S3) vector
    pub fn polarized_intensity(&self) -> f64 {
        (self.s1 * self.s1 + self.s2 * self.s2 + self.s3 * self.s3).sqrt()
    }

    /// Degree of polarization, clamped to [0, 1]; 0 for a dark beam
    pub fn dop(&self) -> f64 {
        if self.s0 <= 0.0 {
            return 0.0;
        }
        (self.polarized_intensity() / self.s0).clamp(0.0, 1.0)
    }

    /// Normalized Poincaré sphere coordinates; distance from origin is the DoP
    pub fn poincare(&self) -> Vector3<f64> {
        if self.s0 <= 0.0 {
            return Vector3::zeros();
        }
        Vector3::new(self.s1, self.s2, self.s3) / self.s0
    }

    /// Ellipticity angle `½·asin(S3 / |S⃗|)` in degrees
    ///
    /// Normalized by the polarized intensity so a partially polarized beam
    /// reports the shape of its polarized part. 0 when nothing is polarized.
    pub fn ellipticity(&self) -> f64 {
        let polarized = self.polarized_intensity();
        if polarized <= f64::MIN_POSITIVE {
            return 0.0;
        }
        0.5 * (self.s3 / polarized).clamp(-1.0, 1.0).asin().to_degrees()
    }

    pub fn ellipse(&self) -> EllipseParameters {
        if self.s0 <= 0.0 {
            return EllipseParameters {
                semi_major: 0.0,
                semi_minor: 0.0,
                orientation: 0.0,
                ellipticity: 0.0,
                handedness: None,
            };
        }

        let p = self.poincare();
        let orientation = if p.x.abs() < 1e-10 && p.y.abs() < 1e-10 {
            0.0
        } else {
            crate::angle::normalize_180(0.5 * p.y.atan2(p.x).to_degrees())
        };
        let ellipticity = self.ellipticity();

        let dop = self.dop();
        let handedness = if ellipticity.abs() < LINEAR_ELLIPTICITY_DEG {
            None
        } else if ellipticity > 0.0 {
            Some(Handedness::Left)
        } else {
            Some(Handedness::Right)
        };

        EllipseParameters {
            semi_major: (self.s0 * (1.0 + dop)).sqrt(),
            semi_minor: (self.s0 * (1.0 - dop)).sqrt(),
            orientation,
            ellipticity,
            handedness,
        }
    }

    /// Split into fully polarized and fully unpolarized parts that sum to `self`
    pub fn decompose(&self) -> (StokesVector, StokesVector) {
        if self.s0 <= 0.0 {
            return (StokesVector::default(), StokesVector::default());
        }
        let polarized = StokesVector::new(self.polarized_intensity(), self.s1, self.s2, self.s3);
        let unpolarized = StokesVector::unpolarized(self.s0 - polarized.s0);
        (polarized, unpolarized)
    }

    /// Jones equivalent of a (nearly) fully polarized vector
    pub fn to_jones(&self) -> Result<JonesVector, StokesError> {
        let dop = self.dop();
        if dop < JONES_MIN_DOP {
            return Err(StokesError::NotFullyPolarized { dop });
        }

        let ex = ((self.s0 + self.s1) / 2.0).max(0.0).sqrt();
        let ey = ((self.s0 - self.s1) / 2.0).max(0.0).sqrt();
        let phase = if ex < 1e-10 || ey < 1e-10 {
            0.0
        } else {
            self.s3.atan2(self.s2)
        };

        // Ex·Ey* must carry the phase `atan2(S3, S2)`, so Ey lags by it
        Ok(JonesVector::new(
            Complex::new(ex, 0.0),
            Complex::from_polar(ey, -phase),
        ))
    }

    pub fn as_vector(&self) -> Vector4<f64> {
        Vector4::new(self.s0, self.s1, self.s2, self.s3)
    }

    pub fn from_vector(v: &Vector4<f64>) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl Add for StokesVector {
    type Output = StokesVector;

    /// Incoherent superposition of two beams
    fn add(self, rhs: StokesVector) -> StokesVector {
        StokesVector::from_vector(&(self.as_vector() + rhs.as_vector()))
    }
}

impl Mul<f64> for StokesVector {
    type Output = StokesVector;

    fn mul(self, rhs: f64) -> StokesVector {
        StokesVector::from_vector(&(self.as_vector() * rhs))
    }
}
