//! Optical bench scene: the ordered component list and its bounds.
//!
//! A `Scene` is the input of every trace. Component order matters:
//! emitters fire in array order, equal-distance hits resolve to the earlier
//! component and sensor readings are reported in this order.
//!
//! # Mutation
//!
//! The tracer only ever borrows a scene. Interactive editing goes through the
//! setters on [`Scene`], which normalize angles and refuse to touch locked
//! components (fixed puzzle pieces, mystery boxes).
//!
//! # Persistence
//!
//! Scenes are stored as pretty-printed JSON:
//!
//! ```json
//! {
//!   "bounds": { "min": [-10.0, -10.0], "max": [10.0, 10.0] },
//!   "components": [
//!     { "id": "laser", "position": [0.0, 0.0], "type": "emitter",
//!       "direction": 0.0, "source": { "type": "unpolarized" } },
//!     { "id": "p1", "position": [2.0, 0.0], "angle": 0.0, "type": "polarizer" }
//!   ]
//! }
//! ```
//!
//! Loading validates the document the same way [`Scene::new`] does.

use std::collections::HashSet;
use std::path::Path;

use nalgebra::Point2;
use polar_math::normalize_360;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{ComponentKind, HiddenElement, OpticalComponent};

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("no component with id '{0}'")]
    UnknownComponent(String),

    #[error("component '{0}' is locked")]
    Locked(String),

    #[error("duplicate component id '{0}'")]
    DuplicateId(String),

    #[error("component '{id}': {reason}")]
    InvalidComponent { id: String, reason: String },

    #[error("component '{0}' is not a mystery box")]
    NotMysteryBox(String),

    #[error("scene bounds are empty: min {min:?} must be below max {max:?}")]
    InvalidBounds { min: Point2<f64>, max: Point2<f64> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Axis-aligned rectangle beyond which rays are dropped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneBounds {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Default for SceneBounds {
    /// 100 x 100 grid units centred on the origin
    fn default() -> Self {
        Self {
            min: Point2::new(-50.0, -50.0),
            max: Point2::new(50.0, 50.0),
        }
    }
}

impl SceneBounds {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    fn is_valid(&self) -> bool {
        self.min.x < self.max.x && self.min.y < self.max.y
    }
}

/// Reject physical parameters no element can work with
fn check_parameters(component: &OpticalComponent) -> Result<(), SceneError> {
    let invalid = |reason: &str| -> Result<(), SceneError> {
        Err(SceneError::InvalidComponent {
            id: component.id.clone(),
            reason: reason.to_string(),
        })
    };
    match &component.kind {
        ComponentKind::DielectricSurface { refractive_index, .. }
            if !(refractive_index.is_finite() && *refractive_index > 0.0) =>
        {
            invalid("refractive index must be positive")
        }
        ComponentKind::CrystalPlate {
            thickness, wavelength, ..
        } if !(wavelength.is_finite() && *wavelength > 0.0) || !(thickness.is_finite() && *thickness >= 0.0) => {
            invalid("crystal plate needs a positive wavelength and a non-negative thickness")
        }
        ComponentKind::ChiralCell {
            path_length,
            concentration,
            ..
        } if !(path_length.is_finite() && concentration.is_finite()) => invalid("chiral cell parameters must be finite"),
        _ => Ok(()),
    }
}

/// On-disk shape of a scene, validated into [`Scene`]
#[derive(Deserialize)]
struct SceneDocument {
    components: Vec<OpticalComponent>,
    #[serde(default)]
    bounds: SceneBounds,
}

impl TryFrom<SceneDocument> for Scene {
    type Error = SceneError;

    fn try_from(doc: SceneDocument) -> Result<Self, Self::Error> {
        Scene::new(doc.components, doc.bounds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SceneDocument")]
pub struct Scene {
    /// Components in firing / tie-break / reporting order
    components: Vec<OpticalComponent>,

    /// Rays leaving this rectangle stop
    bounds: SceneBounds,
}

impl Scene {
    /// Build a scene, normalizing angles and rejecting duplicate ids
    pub fn new(components: Vec<OpticalComponent>, bounds: SceneBounds) -> Result<Self, SceneError> {
        if !bounds.is_valid() {
            return Err(SceneError::InvalidBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }

        let mut seen = HashSet::new();
        for component in &components {
            if !seen.insert(component.id.as_str()) {
                return Err(SceneError::DuplicateId(component.id.clone()));
            }
            check_parameters(component)?;
        }

        let components = components
            .into_iter()
            .map(|mut c| {
                c.angle = normalize_360(c.angle);
                c
            })
            .collect();

        Ok(Self { components, bounds })
    }

    pub fn components(&self) -> &[OpticalComponent] {
        &self.components
    }

    pub fn bounds(&self) -> &SceneBounds {
        &self.bounds
    }

    pub fn get(&self, id: &str) -> Option<&OpticalComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn emitters(&self) -> impl Iterator<Item = &OpticalComponent> {
        self.components.iter().filter(|c| c.is_emitter())
    }

    pub fn sensors(&self) -> impl Iterator<Item = &OpticalComponent> {
        self.components.iter().filter(|c| c.is_sensor())
    }

    fn unlocked_mut(&mut self, id: &str) -> Result<&mut OpticalComponent, SceneError> {
        let component = self
            .components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| SceneError::UnknownComponent(id.to_string()))?;
        if component.locked {
            return Err(SceneError::Locked(id.to_string()));
        }
        Ok(component)
    }

    /// Set a component's angle (degrees, stored modulo 360)
    pub fn set_angle(&mut self, id: &str, angle_deg: f64) -> Result<(), SceneError> {
        self.unlocked_mut(id)?.angle = normalize_360(angle_deg);
        Ok(())
    }

    /// Turn a component by `delta_deg`
    pub fn rotate_by(&mut self, id: &str, delta_deg: f64) -> Result<(), SceneError> {
        let component = self.unlocked_mut(id)?;
        component.angle = normalize_360(component.angle + delta_deg);
        Ok(())
    }

    pub fn set_position(&mut self, id: &str, position: Point2<f64>) -> Result<(), SceneError> {
        self.unlocked_mut(id)?.position = position;
        Ok(())
    }

    pub fn add(&mut self, component: OpticalComponent) -> Result<(), SceneError> {
        if self.get(&component.id).is_some() {
            return Err(SceneError::DuplicateId(component.id));
        }
        check_parameters(&component)?;
        let angle = component.angle;
        self.components.push(component.with_angle(angle));
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<OpticalComponent, SceneError> {
        self.unlocked_mut(id)?;
        let index = self
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SceneError::UnknownComponent(id.to_string()))?;
        Ok(self.components.remove(index))
    }

    pub fn with_bounds(mut self, bounds: SceneBounds) -> Result<Self, SceneError> {
        if !bounds.is_valid() {
            return Err(SceneError::InvalidBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }
        self.bounds = bounds;
        Ok(self)
    }

    /// Copy of this scene with a different element inside a mystery box
    ///
    /// Ignores the box's lock; `self` is left untouched.
    pub fn with_hidden(&self, box_id: &str, hidden: HiddenElement, angle_deg: f64) -> Result<Self, SceneError> {
        let mut scene = self.clone();
        let component = scene
            .components
            .iter_mut()
            .find(|c| c.id == box_id)
            .ok_or_else(|| SceneError::UnknownComponent(box_id.to_string()))?;
        match &mut component.kind {
            ComponentKind::MysteryBox { hidden: slot } => *slot = hidden,
            _ => return Err(SceneError::NotMysteryBox(box_id.to_string())),
        }
        component.angle = normalize_360(angle_deg);
        Ok(scene)
    }

    /// Save to a pretty-printed JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SceneError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a JSON scene file
    pub fn load_from_file(path: &Path) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
