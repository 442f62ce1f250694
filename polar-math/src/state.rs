//! Polarization state of a light beam as a 2x2 coherency matrix
//!
//! `J = <E·E†>` covers fully polarized, partially polarized and unpolarized
//! light with one representation. Non-depolarizing elements act as
//! `J' = M·J·M†` for their Jones matrix `M`; depolarizing ones go through
//! the Stokes/Mueller path. Every operation returns a new state.

use std::ops::{Add, Mul};

use nalgebra::{Complex, Matrix2};
use serde::{Deserialize, Serialize};

use crate::analysis::{analyze, classify, ClassificationThresholds, Handedness, PolarizationAnalysis, PolarizationKind};
use crate::angle::normalize_180;
use crate::jones::{JonesMatrix, JonesVector};
use crate::mueller::MuellerMatrix;
use crate::stokes::{StokesError, StokesVector};

/// Relative size of S3 below which a state carries no handedness
const HANDEDNESS_EPSILON: f64 = 1e-9;

/// Relative size of (S1, S2) below which the orientation is undefined and reported as 0
const ORIENTATION_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StokesVector", into = "StokesVector")]
pub struct PolarizationState {
    coherency: Matrix2<Complex<f64>>,
}

fn real(x: f64) -> Complex<f64> {
    Complex::new(x, 0.0)
}

impl PolarizationState {
    /// A beam with no light at all
    pub fn dark() -> Self {
        Self {
            coherency: Matrix2::zeros(),
        }
    }

    /// Natural light: no preferred axis, DoP 0
    pub fn unpolarized(intensity: f64) -> Self {
        let half = intensity.max(0.0) / 2.0;
        Self {
            coherency: Matrix2::from_diagonal_element(real(half)),
        }
    }

    /// Linear polarization along `angle_deg` (orientation, ellipticity 0, DoP 1)
    pub fn from_linear(angle_deg: f64, intensity: f64) -> Self {
        let i = intensity.max(0.0);
        let (s, c) = angle_deg.to_radians().sin_cos();
        Self {
            coherency: Matrix2::new(
                real(i * c * c),
                real(i * c * s),
                real(i * c * s),
                real(i * s * s),
            ),
        }
    }

    /// Circular polarization (ellipticity ±45°, DoP 1)
    pub fn from_circular(handedness: Handedness, intensity: f64) -> Self {
        let half = intensity.max(0.0) / 2.0;
        // Ex·Ey* is -i·I/2 for right-handed light, +i·I/2 for left-handed
        let cross = match handedness {
            Handedness::Right => Complex::new(0.0, -half),
            Handedness::Left => Complex::new(0.0, half),
        };
        Self {
            coherency: Matrix2::new(real(half), cross, cross.conj(), real(half)),
        }
    }

    pub fn from_jones(jones: &JonesVector) -> Self {
        let cross = jones.ex * jones.ey.conj();
        Self {
            coherency: Matrix2::new(
                real(jones.ex.norm_sqr()),
                cross,
                cross.conj(),
                real(jones.ey.norm_sqr()),
            ),
        }
    }

    /// Build from Stokes parameters; a negative S0 is clamped to a dark beam
    pub fn from_stokes(stokes: &StokesVector) -> Self {
        if stokes.s0 <= 0.0 {
            return Self::dark();
        }
        // Shrink an over-polarized vector back onto the Poincaré sphere
        let polarized = stokes.polarized_intensity();
        let scale = if polarized > stokes.s0 { stokes.s0 / polarized } else { 1.0 };
        let (s1, s2, s3) = (stokes.s1 * scale, stokes.s2 * scale, stokes.s3 * scale);
        let cross = Complex::new(s2 / 2.0, s3 / 2.0);
        Self {
            coherency: Matrix2::new(
                real((stokes.s0 + s1) / 2.0),
                cross,
                cross.conj(),
                real((stokes.s0 - s1) / 2.0),
            ),
        }
    }

    pub fn coherency(&self) -> &Matrix2<Complex<f64>> {
        &self.coherency
    }

    pub fn stokes(&self) -> StokesVector {
        let jxx = self.coherency[(0, 0)].re;
        let jyy = self.coherency[(1, 1)].re;
        let jxy = self.coherency[(0, 1)];
        StokesVector::new(jxx + jyy, jxx - jyy, 2.0 * jxy.re, 2.0 * jxy.im)
    }

    /// Jones equivalent when the state is (nearly) fully polarized
    pub fn jones(&self) -> Result<JonesVector, StokesError> {
        self.stokes().to_jones()
    }

    /// Total intensity, never negative
    pub fn intensity(&self) -> f64 {
        (self.coherency[(0, 0)].re + self.coherency[(1, 1)].re).max(0.0)
    }

    /// Intensity of the polarized part
    pub fn polarized_intensity(&self) -> f64 {
        self.stokes().polarized_intensity().min(self.intensity())
    }

    /// Degree of polarization in [0, 1]; 0 for a dark beam
    pub fn degree_of_polarization(&self) -> f64 {
        self.stokes().dop()
    }

    /// Orientation of the polarization axis in degrees, [0, 180)
    pub fn orientation(&self) -> f64 {
        let s = self.stokes();
        let scale = s.s0.max(f64::MIN_POSITIVE);
        if s.s1.abs() / scale < ORIENTATION_EPSILON && s.s2.abs() / scale < ORIENTATION_EPSILON {
            return 0.0;
        }
        normalize_180(0.5 * s.s2.atan2(s.s1).to_degrees())
    }

    /// Ellipticity angle of the polarized part in degrees, [-45, 45]
    ///
    /// Positive values are left-handed. 0 when nothing is polarized.
    pub fn ellipticity(&self) -> f64 {
        self.stokes().ellipticity()
    }

    /// Rotation sense, `None` when the polarized part is linear or absent
    pub fn handedness(&self) -> Option<Handedness> {
        let s = self.stokes();
        if s.s0 <= 0.0 || s.s3.abs() <= HANDEDNESS_EPSILON * s.s0 {
            None
        } else if s.s3 > 0.0 {
            Some(Handedness::Left)
        } else {
            Some(Handedness::Right)
        }
    }

    /// Pass through a non-depolarizing element: `M·J·M†`
    pub fn apply_jones(&self, element: &JonesMatrix) -> Self {
        let m = element.matrix;
        let mut coherency = m * self.coherency * m.adjoint();
        // Keep the diagonal exactly real so intensities stay clean
        coherency[(0, 0)].im = 0.0;
        coherency[(1, 1)].im = 0.0;
        Self { coherency }
    }

    /// Pass through any element described by a Mueller matrix
    pub fn apply_mueller(&self, element: &MuellerMatrix) -> Self {
        Self::from_stokes(&element.apply(&self.stokes()))
    }

    /// Ideal linear polarizer: Malus's law for polarized light, half of unpolarized light
    pub fn apply_polarizer(&self, axis_deg: f64) -> Self {
        self.apply_jones(&JonesMatrix::linear_polarizer(axis_deg))
    }

    /// Linear retarder; 90° is a quarter-wave plate, 180° a half-wave plate
    pub fn apply_wave_plate(&self, fast_axis_deg: f64, retardation_deg: f64) -> Self {
        self.apply_jones(&JonesMatrix::retarder(fast_axis_deg, retardation_deg))
    }

    /// Turn the polarization ellipse by `rotation_deg`
    pub fn apply_rotator(&self, rotation_deg: f64) -> Self {
        self.apply_jones(&JonesMatrix::rotator(rotation_deg))
    }

    /// Scale the intensity by `transmission`, clamped to [0, 1]
    pub fn attenuate(&self, transmission: f64) -> Self {
        *self * transmission.clamp(0.0, 1.0)
    }

    /// Scale the polarized part by `1 - depolarization`
    pub fn depolarize(&self, depolarization: f64) -> Self {
        let keep = 1.0 - depolarization.clamp(0.0, 1.0);
        let s = self.stokes();
        Self::from_stokes(&StokesVector::new(s.s0, s.s1 * keep, s.s2 * keep, s.s3 * keep))
    }

    /// Normalized overlap with another state, in [0, 1]
    pub fn fidelity(&self, other: &PolarizationState) -> f64 {
        fidelity(self, other)
    }

    pub fn classify(&self, thresholds: &ClassificationThresholds) -> PolarizationKind {
        classify(self, thresholds)
    }

    pub fn analyze(&self, thresholds: &ClassificationThresholds) -> PolarizationAnalysis {
        analyze(self, thresholds)
    }
}

/// Similarity of two states: `tr(Ja·Jb) / (Ia·Ib)`
///
/// For fully polarized states this is the normalized Jones overlap
/// `|⟨a|b⟩|² / (|a|²·|b|²)`: 1 for identical polarizations, 0 for orthogonal
/// ones. Unpolarized light scores 0.5 against anything. A dark beam scores 0.
pub fn fidelity(a: &PolarizationState, b: &PolarizationState) -> f64 {
    let (sa, sb) = (a.stokes(), b.stokes());
    let norm = sa.s0 * sb.s0;
    if norm <= f64::MIN_POSITIVE {
        return 0.0;
    }
    let dot = sa.s0 * sb.s0 + sa.s1 * sb.s1 + sa.s2 * sb.s2 + sa.s3 * sb.s3;
    (dot / (2.0 * norm)).clamp(0.0, 1.0)
}

impl Default for PolarizationState {
    fn default() -> Self {
        Self::dark()
    }
}

impl Add for PolarizationState {
    type Output = PolarizationState;

    /// Incoherent superposition
    fn add(self, rhs: PolarizationState) -> PolarizationState {
        PolarizationState {
            coherency: self.coherency + rhs.coherency,
        }
    }
}

impl Mul<f64> for PolarizationState {
    type Output = PolarizationState;

    fn mul(self, rhs: f64) -> PolarizationState {
        PolarizationState {
            coherency: self.coherency * real(rhs.max(0.0)),
        }
    }
}

impl From<StokesVector> for PolarizationState {
    fn from(stokes: StokesVector) -> Self {
        Self::from_stokes(&stokes)
    }
}

impl From<PolarizationState> for StokesVector {
    fn from(state: PolarizationState) -> Self {
        state.stokes()
    }
}

impl From<JonesVector> for PolarizationState {
    fn from(jones: JonesVector) -> Self {
        Self::from_jones(&jones)
    }
}
