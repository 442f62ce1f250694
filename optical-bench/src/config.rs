//! Tracer and bench configuration
//!
//! All structs deserialize with `#[serde(default)]`, so a config file only
//! needs the values it changes.

use std::path::Path;

use polar_math::ClassificationThresholds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{PaletteChoice, Projection, WaveConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Limits and tolerances of the light tracer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    /// Segments one branch may emit before it is cut off
    pub max_bounces: usize,
    /// Segments allowed in one trace across all branches
    pub max_segments: usize,
    /// Largest perpendicular miss distance that still counts as a hit (grid units)
    pub hit_radius: f64,
    /// Branches arriving at or below this intensity stop
    pub min_intensity: f64,
    /// Geometric tolerance for distances along a ray
    pub epsilon: f64,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_bounces: 50,
            max_segments: 2048,
            hit_radius: 0.5,
            min_intensity: 1e-6,
            epsilon: 1e-9,
        }
    }
}

impl TracerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bounces == 0 {
            return Err(ConfigError::Invalid {
                field: "max_bounces",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_segments == 0 {
            return Err(ConfigError::Invalid {
                field: "max_segments",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.hit_radius.is_nan() || self.hit_radius <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "hit_radius",
                reason: format!("must be positive, got {}", self.hit_radius),
            });
        }
        if [self.epsilon, self.min_intensity].iter().any(|v| v.is_nan() || *v < 0.0) {
            return Err(ConfigError::Invalid {
                field: "epsilon/min_intensity",
                reason: "must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub projection: Projection,
    pub palette: PaletteChoice,
    pub wave: WaveConfig,
}

/// Everything a bench run can be tuned with, stored as one JSON file
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub tracer: TracerConfig,
    pub thresholds: ClassificationThresholds,
    pub render: RenderConfig,
}

impl BenchConfig {
    /// Save to a pretty-printed JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.tracer.validate()?;
        Ok(config)
    }
}
