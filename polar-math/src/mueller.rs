//! 4x4 Mueller matrices acting on Stokes vectors
//!
//! Unlike Jones matrices these also describe depolarizing and partially
//! polarizing elements. Rotation and retardance signs match
//! [`crate::jones::JonesMatrix`], so both calculi agree on fully polarized light.

use std::ops::Mul;

use nalgebra::Matrix4;
use thiserror::Error;

use crate::fresnel::FresnelCoefficients;
use crate::stokes::StokesVector;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MuellerError {
    #[error("{name} must be in [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f64 },
}

fn check_unit_range(name: &'static str, value: f64) -> Result<f64, MuellerError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(MuellerError::OutOfRange { name, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuellerMatrix {
    pub matrix: Matrix4<f64>,
}

/// cos(2θ), sin(2θ) for an angle in degrees
fn double_angle(angle_deg: f64) -> (f64, f64) {
    let (s, c) = (2.0 * angle_deg.to_radians()).sin_cos();
    (c, s)
}

impl MuellerMatrix {
    pub fn new(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    /// Ideal linear polarizer with transmission axis at `axis_deg`
    pub fn linear_polarizer(axis_deg: f64) -> Self {
        let (c, s) = double_angle(axis_deg);
        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0, c,     s,     0.0,
            c,   c * c, c * s, 0.0,
            s,   c * s, s * s, 0.0,
            0.0, 0.0,   0.0,   0.0,
        );
        Self::new(m * 0.5)
    }

    /// Linear retarder with fast axis at `fast_axis_deg`
    pub fn retarder(fast_axis_deg: f64, retardation_deg: f64) -> Self {
        let (c, s) = double_angle(fast_axis_deg);
        let (sd, cd) = retardation_deg.to_radians().sin_cos();
        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0, 0.0,                  0.0,                  0.0,
            0.0, c * c + s * s * cd,   c * s * (1.0 - cd),   s * sd,
            0.0, c * s * (1.0 - cd),   s * s + c * c * cd,   -c * sd,
            0.0, -s * sd,              c * sd,               cd,
        );
        Self::new(m)
    }

    pub fn quarter_wave_plate(fast_axis_deg: f64) -> Self {
        Self::retarder(fast_axis_deg, 90.0)
    }

    pub fn half_wave_plate(fast_axis_deg: f64) -> Self {
        Self::retarder(fast_axis_deg, 180.0)
    }

    /// Optical rotator turning the polarization plane by `rotation_deg`
    pub fn rotator(rotation_deg: f64) -> Self {
        let (c, s) = double_angle(rotation_deg);
        #[rustfmt::skip]
        let m = Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,   -s,  0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Self::new(m)
    }

    /// Imperfect polarizer: full transmission along the axis, `1 - loss` across it
    pub fn partial_polarizer(perpendicular_loss: f64, axis_deg: f64) -> Result<Self, MuellerError> {
        let loss = check_unit_range("perpendicular loss", perpendicular_loss)?;
        let q = 1.0;
        let r = 1.0 - loss;
        let mean = (q + r) / 2.0;
        let half_diff = (q - r) / 2.0;
        let geo = (q * r).sqrt();

        let (c, s) = double_angle(axis_deg);
        #[rustfmt::skip]
        let m = Matrix4::new(
            mean,          half_diff * c,            half_diff * s,            0.0,
            half_diff * c, mean * c * c + geo * s * s, (mean - geo) * c * s,   0.0,
            half_diff * s, (mean - geo) * c * s,     mean * s * s + geo * c * c, 0.0,
            0.0,           0.0,                      0.0,                      geo,
        );
        Ok(Self::new(m))
    }

    /// Ideal depolarizer scaling the polarized part by `1 - depolarization`
    pub fn depolarizer(depolarization: f64) -> Result<Self, MuellerError> {
        let d = check_unit_range("depolarization", depolarization)?;
        let keep = 1.0 - d;
        Ok(Self::new(Matrix4::from_diagonal(&nalgebra::Vector4::new(
            1.0, keep, keep, keep,
        ))))
    }

    /// Element with real field transmissions `tx` along 0° and `ty` along 90°
    ///
    /// Opposite signs put a half-wave phase between the two axes.
    fn axial_amplitudes(tx: f64, ty: f64) -> Self {
        let mean = (tx * tx + ty * ty) / 2.0;
        let half_diff = (tx * tx - ty * ty) / 2.0;
        let cross = tx * ty;
        #[rustfmt::skip]
        let m = Matrix4::new(
            mean,      half_diff, 0.0,   0.0,
            half_diff, mean,      0.0,   0.0,
            0.0,       0.0,       cross, 0.0,
            0.0,       0.0,       0.0,   cross,
        );
        Self::new(m)
    }

    /// Reflection off a dielectric interface, p along 0° and s along 90°
    pub fn fresnel_reflection(coefficients: &FresnelCoefficients) -> Self {
        Self::axial_amplitudes(coefficients.rp, coefficients.rs)
    }

    /// Transmission through a dielectric interface, p along 0° and s along 90°
    pub fn fresnel_transmission(coefficients: &FresnelCoefficients) -> Self {
        Self::axial_amplitudes(
            coefficients.transmittance_p.max(0.0).sqrt(),
            coefficients.transmittance_s.max(0.0).sqrt(),
        )
    }

    /// Single Rayleigh scattering through `scattering_angle_deg`
    ///
    /// 0° lies in the scattering plane, where the field is scaled by `cosθ`.
    pub fn rayleigh(scattering_angle_deg: f64) -> Self {
        Self::axial_amplitudes(scattering_angle_deg.to_radians().cos(), 1.0)
    }

    /// The same element physically turned by `angle_deg`
    pub fn rotated(&self, angle_deg: f64) -> Self {
        let forward = Self::rotator(angle_deg).matrix;
        let back = Self::rotator(-angle_deg).matrix;
        Self::new(forward * self.matrix * back)
    }

    pub fn apply(&self, stokes: &StokesVector) -> StokesVector {
        StokesVector::from_vector(&(self.matrix * stokes.as_vector()))
    }

    /// `D = |(M01, M02, M03)| / M00`
    pub fn diattenuation(&self) -> f64 {
        let m = &self.matrix;
        if m[(0, 0)] == 0.0 {
            return 0.0;
        }
        let d = (m[(0, 1)].powi(2) + m[(0, 2)].powi(2) + m[(0, 3)].powi(2)).sqrt() / m[(0, 0)];
        d.min(1.0)
    }

    /// `P = |(M10, M20, M30)| / M00`
    pub fn polarizance(&self) -> f64 {
        let m = &self.matrix;
        if m[(0, 0)] == 0.0 {
            return 0.0;
        }
        let p = (m[(1, 0)].powi(2) + m[(2, 0)].powi(2) + m[(3, 0)].powi(2)).sqrt() / m[(0, 0)];
        p.min(1.0)
    }

    /// `Δ = 1 - sqrt(tr(MᵀM) - M00²) / (√3·M00)`; 0 for non-depolarizing elements
    pub fn depolarization_index(&self) -> f64 {
        let m00 = self.matrix[(0, 0)];
        if m00 == 0.0 {
            return 1.0;
        }
        let trace = (self.matrix.transpose() * self.matrix).trace();
        let numerator = (trace - m00 * m00).max(0.0).sqrt();
        (1.0 - numerator / (3.0_f64.sqrt() * m00)).clamp(0.0, 1.0)
    }
}

impl Mul for MuellerMatrix {
    type Output = MuellerMatrix;

    /// `second * first`: light passes through `first`, then `second`
    fn mul(self, rhs: MuellerMatrix) -> MuellerMatrix {
        MuellerMatrix::new(self.matrix * rhs.matrix)
    }
}
