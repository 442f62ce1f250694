//! Optical components placed on the bench
//!
//! Every element type is a variant of the closed [`ComponentKind`] enum and
//! carries only the parameters meaningful for it. [`OpticalComponent::interact`]
//! is the single place where an element acts on light arriving at it; the
//! tracer only handles geometry.

use log::warn;
use nalgebra::{Point2, Rotation2, Vector2};
use polar_math::{
    fresnel_coefficients, normalize_360, phase_retardation, split_state, ChiralSubstance, Handedness, JonesVector,
    MuellerMatrix, PolarizationState, AIR_INDEX, CALCITE_N_E, CALCITE_N_O, GLASS_INDEX,
};
use serde::{Deserialize, Serialize};

use crate::sensor::SensorRequirement;

/// Initial polarization of an emitter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourcePolarization {
    /// Natural light
    Unpolarized,
    /// Linear along the emitter's `angle`
    Linear,
    Circular { handedness: Handedness },
    /// Arbitrary fully polarized state, rescaled to the emitter intensity
    Jones { vector: JonesVector },
}

/// Element concealed inside a mystery box, oriented by the box's `angle`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HiddenElement {
    Empty,
    Polarizer,
    Rotator { rotation: f64 },
    WavePlate { retardation: f64 },
    Attenuator { transmission: f64 },
    Depolarizer { depolarization: f64 },
}

impl HiddenElement {
    pub fn apply(&self, state: &PolarizationState, angle: f64) -> PolarizationState {
        match *self {
            HiddenElement::Empty => *state,
            HiddenElement::Polarizer => state.apply_polarizer(angle),
            HiddenElement::Rotator { rotation } => state.apply_rotator(rotation),
            HiddenElement::WavePlate { retardation } => state.apply_wave_plate(angle, retardation),
            HiddenElement::Attenuator { transmission } => state.attenuate(transmission),
            HiddenElement::Depolarizer { depolarization } => state.depolarize(depolarization),
        }
    }
}

fn default_intensity() -> f64 {
    100.0
}

fn default_split_angle() -> f64 {
    90.0
}

fn default_refractive_index() -> f64 {
    GLASS_INDEX
}

fn default_wavelength() -> f64 {
    550.0
}

fn default_birefringence() -> f64 {
    CALCITE_N_O - CALCITE_N_E
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentKind {
    Emitter {
        /// Direction of travel in degrees, 0 = +x, counter-clockwise
        direction: f64,
        source: SourcePolarization,
        #[serde(default = "default_intensity")]
        intensity: f64,
    },
    Polarizer,
    Mirror {
        /// Orientation of the reflecting surface in degrees
        surface_angle: f64,
    },
    /// Birefringent crystal: ordinary ray straight on, extraordinary ray deflected
    Splitter {
        #[serde(default = "default_split_angle")]
        split_angle: f64,
    },
    /// Uncoated glass surface in air: Fresnel-reflected beam off the surface,
    /// the rest straight through
    DielectricSurface {
        /// Orientation of the surface in degrees
        surface_angle: f64,
        #[serde(default = "default_refractive_index")]
        refractive_index: f64,
    },
    Rotator {
        rotation: f64,
    },
    /// Cuvette of sugar solution rotating the polarization plane
    ChiralCell {
        substance: ChiralSubstance,
        /// dm
        path_length: f64,
        /// g/mL
        concentration: f64,
    },
    QuarterWavePlate,
    HalfWavePlate,
    WavePlate {
        retardation: f64,
    },
    /// Birefringent plate whose retardation follows from its thickness
    CrystalPlate {
        /// mm
        thickness: f64,
        /// nm
        #[serde(default = "default_wavelength")]
        wavelength: f64,
        /// `n_o - n_e`
        #[serde(default = "default_birefringence")]
        birefringence: f64,
    },
    PhaseShifter {
        phase: f64,
    },
    Depolarizer {
        depolarization: f64,
    },
    Attenuator {
        transmission: f64,
    },
    MysteryBox {
        hidden: HiddenElement,
    },
    Sensor {
        #[serde(default)]
        required_intensity: f64,
        #[serde(default)]
        requirement: Option<SensorRequirement>,
    },
}

impl ComponentKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentKind::Emitter { .. } => "emitter",
            ComponentKind::Polarizer => "polarizer",
            ComponentKind::Mirror { .. } => "mirror",
            ComponentKind::Splitter { .. } => "splitter",
            ComponentKind::DielectricSurface { .. } => "dielectric_surface",
            ComponentKind::Rotator { .. } => "rotator",
            ComponentKind::ChiralCell { .. } => "chiral_cell",
            ComponentKind::QuarterWavePlate => "quarter_wave_plate",
            ComponentKind::HalfWavePlate => "half_wave_plate",
            ComponentKind::WavePlate { .. } => "wave_plate",
            ComponentKind::CrystalPlate { .. } => "crystal_plate",
            ComponentKind::PhaseShifter { .. } => "phase_shifter",
            ComponentKind::Depolarizer { .. } => "depolarizer",
            ComponentKind::Attenuator { .. } => "attenuator",
            ComponentKind::MysteryBox { .. } => "mystery_box",
            ComponentKind::Sensor { .. } => "sensor",
        }
    }
}

/// What an element does to a beam arriving at it
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Continue in the same direction
    Transmit {
        state: PolarizationState,
        phase_shift: f64,
    },
    /// Continue in a new direction
    Redirect {
        state: PolarizationState,
        direction: Vector2<f64>,
    },
    /// Two beams: `ordinary` straight on, `extraordinary` turned
    Split {
        ordinary: PolarizationState,
        extraordinary: PolarizationState,
        extraordinary_direction: Vector2<f64>,
    },
    /// Beam ends here (sensors)
    Absorb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalComponent {
    pub id: String,
    pub position: Point2<f64>,
    /// Transmission / fast / optic axis or source polarization, degrees in [0, 360)
    ///
    /// Polarization angles are measured from the bench plane, so at a
    /// dielectric surface 0° is p-polarized and 90° is s-polarized.
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

/// Unit vector for a direction given in degrees
pub fn direction_vector(direction_deg: f64) -> Vector2<f64> {
    let (s, c) = direction_deg.to_radians().sin_cos();
    Vector2::new(c, s)
}

impl OpticalComponent {
    pub fn new(id: impl Into<String>, position: Point2<f64>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            position,
            angle: 0.0,
            locked: false,
            kind,
        }
    }

    pub fn with_angle(mut self, angle_deg: f64) -> Self {
        self.angle = normalize_360(angle_deg);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn is_emitter(&self) -> bool {
        matches!(self.kind, ComponentKind::Emitter { .. })
    }

    pub fn is_sensor(&self) -> bool {
        matches!(self.kind, ComponentKind::Sensor { .. })
    }

    /// Starting direction and state of an emitter, `None` for other components
    pub fn emission(&self) -> Option<(Vector2<f64>, PolarizationState)> {
        let ComponentKind::Emitter {
            direction,
            source,
            intensity,
        } = &self.kind
        else {
            return None;
        };

        let state = match source {
            SourcePolarization::Unpolarized => PolarizationState::unpolarized(*intensity),
            SourcePolarization::Linear => PolarizationState::from_linear(self.angle, *intensity),
            SourcePolarization::Circular { handedness } => {
                PolarizationState::from_circular(*handedness, *intensity)
            }
            SourcePolarization::Jones { vector } => {
                let raw = PolarizationState::from_jones(vector);
                let norm = raw.intensity();
                if norm > 0.0 {
                    raw * (intensity.max(0.0) / norm)
                } else {
                    PolarizationState::dark()
                }
            }
        };
        Some((direction_vector(*direction), state))
    }

    /// Apply this element to a beam travelling along `direction`
    pub fn interact(&self, state: &PolarizationState, direction: &Vector2<f64>) -> Interaction {
        let transmit = |state: PolarizationState| Interaction::Transmit {
            state,
            phase_shift: 0.0,
        };

        match &self.kind {
            // Emitters are transparent to beams from other sources
            ComponentKind::Emitter { .. } => transmit(*state),
            ComponentKind::Polarizer => transmit(state.apply_polarizer(self.angle)),
            ComponentKind::Mirror { surface_angle } => Interaction::Redirect {
                state: *state,
                direction: reflect(direction, *surface_angle),
            },
            ComponentKind::Splitter { split_angle } => {
                let (ordinary, extraordinary) = split_state(state, self.angle);
                Interaction::Split {
                    ordinary,
                    extraordinary,
                    extraordinary_direction: Rotation2::new(split_angle.to_radians()) * direction,
                }
            }
            ComponentKind::DielectricSurface {
                surface_angle,
                refractive_index,
            } => {
                let normal = direction_vector(surface_angle + 90.0);
                let incidence = direction.dot(&normal).abs().min(1.0).acos().to_degrees();
                match fresnel_coefficients(incidence, AIR_INDEX, *refractive_index) {
                    Ok(coefficients) => Interaction::Split {
                        ordinary: state.apply_mueller(&MuellerMatrix::fresnel_transmission(&coefficients)),
                        extraordinary: state.apply_mueller(&MuellerMatrix::fresnel_reflection(&coefficients)),
                        extraordinary_direction: reflect(direction, *surface_angle),
                    },
                    Err(e) => {
                        warn!("Dielectric surface '{}' absorbs the beam: {}", self.id, e);
                        Interaction::Absorb
                    }
                }
            }
            ComponentKind::Rotator { rotation } => transmit(state.apply_rotator(*rotation)),
            ComponentKind::ChiralCell {
                substance,
                path_length,
                concentration,
            } => transmit(state.apply_rotator(substance.rotation(*path_length, *concentration))),
            ComponentKind::QuarterWavePlate => transmit(state.apply_wave_plate(self.angle, 90.0)),
            ComponentKind::HalfWavePlate => transmit(state.apply_wave_plate(self.angle, 180.0)),
            ComponentKind::WavePlate { retardation } => {
                transmit(state.apply_wave_plate(self.angle, *retardation))
            }
            ComponentKind::CrystalPlate {
                thickness,
                wavelength,
                birefringence,
            } => transmit(state.apply_wave_plate(
                self.angle,
                phase_retardation(*thickness, *wavelength, *birefringence),
            )),
            ComponentKind::PhaseShifter { phase } => Interaction::Transmit {
                state: *state,
                phase_shift: *phase,
            },
            ComponentKind::Depolarizer { depolarization } => {
                transmit(state.depolarize(*depolarization))
            }
            ComponentKind::Attenuator { transmission } => transmit(state.attenuate(*transmission)),
            ComponentKind::MysteryBox { hidden } => transmit(hidden.apply(state, self.angle)),
            ComponentKind::Sensor { .. } => Interaction::Absorb,
        }
    }
}

/// Mirror `direction` about a surface line at `surface_angle_deg`: `d' = 2(d·t)t - d`
fn reflect(direction: &Vector2<f64>, surface_angle_deg: f64) -> Vector2<f64> {
    let tangent = direction_vector(surface_angle_deg);
    let reflected = tangent * (2.0 * direction.dot(&tangent)) - direction;
    reflected.normalize()
}
