//! Colour strategies for polarized beams
//!
//! A palette turns a beam's class, orientation and handedness into a colour.
//! Both strategies share the same colours for unpolarized and circular
//! light; they differ in how orientation is shown.

use std::fmt;

use polar_math::{normalize_180, Handedness, PolarizationKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From HSV with hue in degrees and saturation/value in [0, 1]
    pub fn from_hsv(hue_deg: f64, saturation: f64, value: f64) -> Self {
        let h = hue_deg.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);

        let chroma = v * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = v - chroma;
        let channel = |c: f64| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const UNPOLARIZED_COLOR: Rgb = Rgb::new(0xfe, 0xf3, 0xc7);
pub const RIGHT_CIRCULAR_COLOR: Rgb = Rgb::new(0x22, 0xd3, 0xee);
pub const LEFT_CIRCULAR_COLOR: Rgb = Rgb::new(0xa7, 0x8b, 0xfa);

fn circular_color(handedness: Option<Handedness>) -> Rgb {
    match handedness {
        Some(Handedness::Left) => LEFT_CIRCULAR_COLOR,
        _ => RIGHT_CIRCULAR_COLOR,
    }
}

pub trait Palette: Send + Sync {
    fn name(&self) -> &'static str;

    fn color_for(&self, kind: PolarizationKind, orientation: f64, handedness: Option<Handedness>) -> Rgb;
}

/// Four 45° orientation buckets: 0° red, 45° orange, 90° blue, 135° violet
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadrantPalette;

impl QuadrantPalette {
    pub const BUCKETS: [Rgb; 4] = [
        Rgb::new(0xef, 0x44, 0x44),
        Rgb::new(0xf5, 0x9e, 0x0b),
        Rgb::new(0x3b, 0x82, 0xf6),
        Rgb::new(0x8b, 0x5c, 0xf6),
    ];

    /// Nearest bucket, wrapping 180° back to 0°
    pub fn bucket(orientation: f64) -> usize {
        (normalize_180(orientation) / 45.0).round() as usize % 4
    }
}

impl Palette for QuadrantPalette {
    fn name(&self) -> &'static str {
        "quadrant"
    }

    fn color_for(&self, kind: PolarizationKind, orientation: f64, handedness: Option<Handedness>) -> Rgb {
        match kind {
            PolarizationKind::Unpolarized => UNPOLARIZED_COLOR,
            PolarizationKind::Circular => circular_color(handedness),
            PolarizationKind::Linear | PolarizationKind::Elliptical | PolarizationKind::Partial => {
                Self::BUCKETS[Self::bucket(orientation)]
            }
        }
    }
}

/// Continuous hue wheel, `hue = 2 * orientation`
///
/// Elliptical and partially polarized beams are drawn less saturated.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuePalette;

impl Palette for HuePalette {
    fn name(&self) -> &'static str {
        "hue"
    }

    fn color_for(&self, kind: PolarizationKind, orientation: f64, handedness: Option<Handedness>) -> Rgb {
        let hue = 2.0 * normalize_180(orientation);
        match kind {
            PolarizationKind::Unpolarized => UNPOLARIZED_COLOR,
            PolarizationKind::Circular => circular_color(handedness),
            PolarizationKind::Linear => Rgb::from_hsv(hue, 0.85, 0.95),
            PolarizationKind::Elliptical => Rgb::from_hsv(hue, 0.6, 0.95),
            PolarizationKind::Partial => Rgb::from_hsv(hue, 0.35, 0.95),
        }
    }
}

/// Palette selection for configs and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PaletteChoice {
    #[default]
    Quadrant,
    Hue,
}

impl PaletteChoice {
    pub fn build(self) -> Box<dyn Palette> {
        match self {
            PaletteChoice::Quadrant => Box::new(QuadrantPalette),
            PaletteChoice::Hue => Box::new(HuePalette),
        }
    }
}
