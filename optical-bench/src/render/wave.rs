//! Oscillation data for drawing the electric field along a beam
//!
//! Linear light is a single sinusoid in its plane of oscillation. Circular,
//! elliptical and partially polarized light is drawn as two orthogonal
//! sinusoids along the ellipse axes, a quarter period apart. Unpolarized
//! light has no stable waveform and produces nothing.

use polar_math::{normalize_180, Handedness, PolarizationKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Drawn wavelength in screen units
    pub wavelength: f64,
    /// Amplitude drawn for a beam at `reference_intensity`
    pub max_amplitude: f64,
    /// Intensity mapped to full amplitude and full opacity
    pub reference_intensity: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            wavelength: 40.0,
            max_amplitude: 12.0,
            reference_intensity: 100.0,
        }
    }
}

impl WaveConfig {
    /// Field amplitude for an intensity, `∝ sqrt(I)`
    pub fn amplitude_for(&self, intensity: f64) -> f64 {
        if self.reference_intensity <= 0.0 {
            return 0.0;
        }
        self.max_amplitude * (intensity.max(0.0) / self.reference_intensity).sqrt()
    }
}

/// Second oscillation, orthogonal to the primary one
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondaryWave {
    pub angle: f64,
    pub amplitude: f64,
    /// Degrees relative to the primary: -90 right-handed, +90 left-handed
    pub phase: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveVisualization {
    /// Plane of the primary oscillation, degrees in [0, 180)
    pub oscillation_angle: f64,
    pub amplitude: f64,
    /// Carrier phase in degrees
    pub phase: f64,
    pub wavelength: f64,
    pub secondary: Option<SecondaryWave>,
}

impl WaveVisualization {
    /// Same waveform advanced by `phase_deg`
    pub fn shifted(mut self, phase_deg: f64) -> Self {
        self.phase = (self.phase + phase_deg).rem_euclid(360.0);
        self
    }
}

pub fn wave_visualization(
    kind: PolarizationKind,
    orientation: f64,
    ellipticity: f64,
    handedness: Option<Handedness>,
    intensity: f64,
    config: &WaveConfig,
) -> Option<WaveVisualization> {
    let amplitude = config.amplitude_for(intensity);
    let oscillation_angle = normalize_180(orientation);
    let linear = WaveVisualization {
        oscillation_angle,
        amplitude,
        phase: 0.0,
        wavelength: config.wavelength,
        secondary: None,
    };

    match kind {
        PolarizationKind::Unpolarized => None,
        PolarizationKind::Linear => Some(linear),
        PolarizationKind::Circular | PolarizationKind::Elliptical | PolarizationKind::Partial => {
            let Some(handedness) = handedness else {
                return Some(linear);
            };
            let chi = if kind == PolarizationKind::Circular {
                45.0
            } else {
                ellipticity.abs().min(45.0)
            };
            let (minor, major) = chi.to_radians().sin_cos();
            let phase = match handedness {
                Handedness::Right => -90.0,
                Handedness::Left => 90.0,
            };
            Some(WaveVisualization {
                amplitude: amplitude * major,
                secondary: Some(SecondaryWave {
                    angle: normalize_180(oscillation_angle + 90.0),
                    amplitude: amplitude * minor,
                    phase,
                }),
                ..linear
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unpolarized_has_no_wave() {
        let config = WaveConfig::default();
        assert!(wave_visualization(PolarizationKind::Unpolarized, 0.0, 0.0, None, 100.0, &config).is_none());
    }

    #[test]
    fn test_linear_single_sinusoid() {
        let config = WaveConfig::default();
        let wave = wave_visualization(PolarizationKind::Linear, 30.0, 0.0, None, 25.0, &config).unwrap();
        assert!(wave.secondary.is_none());
        assert_relative_eq!(wave.oscillation_angle, 30.0);
        assert_relative_eq!(wave.amplitude, config.max_amplitude * 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_circular_two_sinusoids() {
        let config = WaveConfig::default();
        let right = wave_visualization(
            PolarizationKind::Circular,
            0.0,
            -45.0,
            Some(Handedness::Right),
            100.0,
            &config,
        )
        .unwrap();
        let secondary = right.secondary.unwrap();
        assert_relative_eq!(secondary.angle, 90.0);
        assert_relative_eq!(secondary.phase, -90.0);
        assert_relative_eq!(secondary.amplitude, right.amplitude, epsilon = 1e-12);

        let left = wave_visualization(
            PolarizationKind::Circular,
            0.0,
            45.0,
            Some(Handedness::Left),
            100.0,
            &config,
        )
        .unwrap();
        assert_relative_eq!(left.secondary.unwrap().phase, 90.0);
    }

    #[test]
    fn test_elliptical_axes() {
        let config = WaveConfig::default();
        let wave = wave_visualization(
            PolarizationKind::Elliptical,
            120.0,
            20.0,
            Some(Handedness::Left),
            100.0,
            &config,
        )
        .unwrap();
        let secondary = wave.secondary.unwrap();
        assert_relative_eq!(secondary.angle, 30.0, epsilon = 1e-12);
        assert!(secondary.amplitude < wave.amplitude);
        assert_relative_eq!(
            secondary.amplitude / wave.amplitude,
            20.0_f64.to_radians().tan(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_shifted_wraps() {
        let config = WaveConfig::default();
        let wave = wave_visualization(PolarizationKind::Linear, 0.0, 0.0, None, 100.0, &config)
            .unwrap()
            .shifted(-90.0);
        assert_relative_eq!(wave.phase, 270.0);
    }
}
