//! Rayleigh scattering by particles much smaller than the wavelength
//!
//! The matching element is [`crate::mueller::MuellerMatrix::rayleigh`].

/// Wavelength the intensity is normalized to, nm
pub const REFERENCE_WAVELENGTH_NM: f64 = 450.0;

/// Relative scattered intensity for unpolarized light, `(450/λ)⁴·(1 + cos²θ)`
///
/// 0 for a non-positive wavelength.
pub fn rayleigh_intensity(wavelength_nm: f64, scattering_angle_deg: f64) -> f64 {
    if wavelength_nm <= 0.0 {
        return 0.0;
    }
    let cos = scattering_angle_deg.to_radians().cos();
    (REFERENCE_WAVELENGTH_NM / wavelength_nm).powi(4) * (1.0 + cos * cos)
}

/// Degree of polarization of scattered sunlight, `sin²θ / (1 + cos²θ)`
///
/// Fully polarized at 90°, unpolarized straight ahead and straight back.
pub fn rayleigh_degree_of_polarization(scattering_angle_deg: f64) -> f64 {
    let (sin, cos) = scattering_angle_deg.to_radians().sin_cos();
    sin * sin / (1.0 + cos * cos)
}
