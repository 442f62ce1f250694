//! Jones calculus: 2-component complex field amplitudes and 2x2 element matrices
//!
//! Vectors describe fully polarized light. Matrices describe non-depolarizing
//! elements (polarizers, retarders, rotators, attenuators) and cascade by
//! multiplication, with the element the light meets first on the right.

use std::ops::Mul;

use nalgebra::{Complex, Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::analysis::Handedness;

/// Complex field amplitude of a fully polarized beam
///
/// Intensity is `|Ex|² + |Ey|²`, on the same 0-100 scale as
/// [`crate::PolarizationState`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "JonesComponents", into = "JonesComponents")]
pub struct JonesVector {
    /// Horizontal (x) amplitude
    pub ex: Complex<f64>,
    /// Vertical (y) amplitude
    pub ey: Complex<f64>,
}

/// Serialized form: each amplitude as `[re, im]`
#[derive(Serialize, Deserialize)]
struct JonesComponents {
    ex: [f64; 2],
    ey: [f64; 2],
}

impl From<JonesComponents> for JonesVector {
    fn from(c: JonesComponents) -> Self {
        Self::new(
            Complex::new(c.ex[0], c.ex[1]),
            Complex::new(c.ey[0], c.ey[1]),
        )
    }
}

impl From<JonesVector> for JonesComponents {
    fn from(v: JonesVector) -> Self {
        Self {
            ex: [v.ex.re, v.ex.im],
            ey: [v.ey.re, v.ey.im],
        }
    }
}

impl JonesVector {
    pub fn new(ex: Complex<f64>, ey: Complex<f64>) -> Self {
        Self { ex, ey }
    }

    /// Linear polarization at `angle_deg` carrying `intensity`
    pub fn linear(angle_deg: f64, intensity: f64) -> Self {
        let amplitude = intensity.max(0.0).sqrt();
        let theta = angle_deg.to_radians();
        Self::new(
            Complex::new(amplitude * theta.cos(), 0.0),
            Complex::new(amplitude * theta.sin(), 0.0),
        )
    }

    /// Circular polarization carrying `intensity`
    ///
    /// Right-handed light has `Ey` leading `Ex` by 90°, which makes
    /// `S3 = 2·Im(Ex·Ey*)` negative.
    pub fn circular(handedness: Handedness, intensity: f64) -> Self {
        let amplitude = (intensity.max(0.0) / 2.0).sqrt();
        let quadrature = match handedness {
            Handedness::Right => Complex::new(0.0, amplitude),
            Handedness::Left => Complex::new(0.0, -amplitude),
        };
        Self::new(Complex::new(amplitude, 0.0), quadrature)
    }

    pub fn intensity(&self) -> f64 {
        self.ex.norm_sqr() + self.ey.norm_sqr()
    }

    /// Hermitian inner product ⟨self|other⟩
    pub fn inner(&self, other: &JonesVector) -> Complex<f64> {
        self.ex.conj() * other.ex + self.ey.conj() * other.ey
    }

    /// Normalized overlap `|⟨a|b⟩|² / (|a|²·|b|²)`, 0 if either beam is dark
    pub fn overlap(&self, other: &JonesVector) -> f64 {
        let norm = self.intensity() * other.intensity();
        if norm <= f64::EPSILON {
            return 0.0;
        }
        (self.inner(other).norm_sqr() / norm).clamp(0.0, 1.0)
    }

    pub(crate) fn as_vector(&self) -> Vector2<Complex<f64>> {
        Vector2::new(self.ex, self.ey)
    }
}

/// 2x2 complex Jones matrix of an optical element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JonesMatrix {
    pub matrix: Matrix2<Complex<f64>>,
}

fn real(x: f64) -> Complex<f64> {
    Complex::new(x, 0.0)
}

impl JonesMatrix {
    pub fn new(matrix: Matrix2<Complex<f64>>) -> Self {
        Self { matrix }
    }

    pub fn identity() -> Self {
        Self::new(Matrix2::identity())
    }

    /// Counter-clockwise rotation of the field by `angle_deg`
    pub fn rotation(angle_deg: f64) -> Self {
        let (s, c) = angle_deg.to_radians().sin_cos();
        Self::new(Matrix2::new(real(c), real(-s), real(s), real(c)))
    }

    /// Ideal linear polarizer with transmission axis at `axis_deg`
    pub fn linear_polarizer(axis_deg: f64) -> Self {
        let (s, c) = axis_deg.to_radians().sin_cos();
        Self::new(Matrix2::new(
            real(c * c),
            real(c * s),
            real(c * s),
            real(s * s),
        ))
    }

    /// Linear retarder: the slow-axis component lags by `retardation_deg`
    ///
    /// Built as `R(θ)·diag(1, e^{-iδ})·R(−θ)` with θ the fast axis.
    pub fn retarder(fast_axis_deg: f64, retardation_deg: f64) -> Self {
        let delay = Complex::from_polar(1.0, -retardation_deg.to_radians());
        let plate = Matrix2::new(real(1.0), real(0.0), real(0.0), delay);
        let to_lab = Self::rotation(fast_axis_deg).matrix;
        let to_plate = Self::rotation(-fast_axis_deg).matrix;
        Self::new(to_lab * plate * to_plate)
    }

    pub fn quarter_wave_plate(fast_axis_deg: f64) -> Self {
        Self::retarder(fast_axis_deg, 90.0)
    }

    pub fn half_wave_plate(fast_axis_deg: f64) -> Self {
        Self::retarder(fast_axis_deg, 180.0)
    }

    /// Optical rotator (circular birefringence); same matrix as a frame rotation
    pub fn rotator(rotation_deg: f64) -> Self {
        Self::rotation(rotation_deg)
    }

    /// Neutral density element passing `transmission` of the intensity
    pub fn attenuator(transmission: f64) -> Self {
        let t = transmission.clamp(0.0, 1.0).sqrt();
        Self::new(Matrix2::from_diagonal_element(real(t)))
    }

    pub fn apply(&self, vector: &JonesVector) -> JonesVector {
        let out = self.matrix * vector.as_vector();
        JonesVector::new(out[0], out[1])
    }
}

impl Mul for JonesMatrix {
    type Output = JonesMatrix;

    /// `second * first`: light passes through `first`, then `second`
    fn mul(self, rhs: JonesMatrix) -> JonesMatrix {
        JonesMatrix::new(self.matrix * rhs.matrix)
    }
}

impl Mul<JonesVector> for JonesMatrix {
    type Output = JonesVector;

    fn mul(self, rhs: JonesVector) -> JonesVector {
        self.apply(&rhs)
    }
}
