//! polar-math - Polarization optics for interactive optical benches
//!
//! This crate provides the physics of polarized light used by the light
//! tracer, including:
//!
//! - **PolarizationState** - coherency-matrix beam state with pure transforms
//! - **Jones** - field amplitudes and element matrices
//! - **Stokes / Mueller** - partially polarized light and depolarizing elements
//! - **Analysis** - classification into linear/circular/elliptical/unpolarized/partial
//! - **Birefringence** - o/e-ray splitting, retardation, optical rotation
//! - **Fresnel** - Snell's law, reflection/transmission coefficients, Brewster and critical angles
//! - **Scattering** - Rayleigh intensity and polarization
//!
//! # Example
//!
//! ```
//! use polar_math::PolarizationState;
//!
//! // Three-polarizer paradox
//! let light = PolarizationState::unpolarized(100.0)
//!     .apply_polarizer(0.0)
//!     .apply_polarizer(45.0)
//!     .apply_polarizer(90.0);
//! assert!((light.intensity() - 12.5).abs() < 1e-9);
//! ```

pub mod analysis;
pub mod angle;
pub mod birefringence;
pub mod fresnel;
pub mod jones;
pub mod mueller;
pub mod scattering;
pub mod state;
pub mod stokes;

// Re-export commonly used types
pub use analysis::{
    analyze, classify, ClassificationThresholds, Handedness, PolarizationAnalysis, PolarizationKind,
};
pub use angle::{axis_difference, normalize_180, normalize_360};
pub use birefringence::{
    birefringent_split, optical_rotation, phase_retardation, split_state, ChiralSubstance, CALCITE_N_E, CALCITE_N_O,
};
pub use fresnel::{
    brewster_angle, critical_angle, fresnel_coefficients, snells_law, FresnelCoefficients, FresnelError, AIR_INDEX,
    DIAMOND_INDEX, GLASS_INDEX, WATER_INDEX,
};
pub use jones::{JonesMatrix, JonesVector};
pub use mueller::{MuellerError, MuellerMatrix};
pub use scattering::{rayleigh_degree_of_polarization, rayleigh_intensity};
pub use state::{fidelity, PolarizationState};
pub use stokes::{EllipseParameters, StokesError, StokesVector};
