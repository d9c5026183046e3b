//! Tagged engine variant and its snapshots.

use crate::motor::{MotorSnapshot, MotorStepper};
use crate::stepper::{PistonSnapshot, PistonStepper, RotarySnapshot, RotaryStepper, Stepper};
use crate::v8::{V8Snapshot, V8Stepper};
use cs_core::angle::FrameInput;
use cs_core::numeric::Real;
use cs_core::units::{Temperature, degc, k};
use cs_cycle::{
    EngineSpec, GasProperties, MotorModel, MotorSpec, OttoModel, StrokePhase, WankelModel,
    WankelSpec,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uom::si::thermodynamic_temperature::kelvin;

/// Engine selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Piston,
    Rotary,
    Electric,
    V8,
}

impl EngineKind {
    pub const ALL: [EngineKind; 4] = [
        EngineKind::Piston,
        EngineKind::Rotary,
        EngineKind::Electric,
        EngineKind::V8,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Piston => "piston",
            EngineKind::Rotary => "rotary",
            EngineKind::Electric => "electric",
            EngineKind::V8 => "v8",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown engine type: {s}"))
    }
}

/// Immutable configuration every engine can be built from.
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    pub piston: EngineSpec,
    pub wankel: WankelSpec,
    pub motor: MotorSpec,
    pub gas: GasProperties,
}

/// One frame of whichever engine is active.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum Snapshot {
    Piston(PistonSnapshot),
    Rotary(RotarySnapshot),
    Electric(MotorSnapshot),
    V8(V8Snapshot),
}

impl Snapshot {
    pub fn kind(&self) -> EngineKind {
        match self {
            Snapshot::Piston(_) => EngineKind::Piston,
            Snapshot::Rotary(_) => EngineKind::Rotary,
            Snapshot::Electric(_) => EngineKind::Electric,
            Snapshot::V8(_) => EngineKind::V8,
        }
    }

    /// Normalized shaft angle (rad) in the engine's own window.
    pub fn angle(&self) -> Real {
        match self {
            Snapshot::Piston(s) => s.angle,
            Snapshot::Rotary(s) => s.angle,
            Snapshot::Electric(s) => s.angle,
            Snapshot::V8(s) => s.angle,
        }
    }

    /// Stroke phase; the electric motor has none.
    pub fn phase(&self) -> Option<StrokePhase> {
        match self {
            Snapshot::Piston(s) => Some(s.state.phase),
            Snapshot::Rotary(s) => Some(s.state.phase),
            Snapshot::Electric(_) => None,
            Snapshot::V8(s) => Some(s.lead().state.phase),
        }
    }

    /// Gas temperature, or stator temperature for the motor.
    pub fn temperature(&self) -> Temperature {
        match self {
            Snapshot::Piston(s) => k(s.state.temperature_k),
            Snapshot::Rotary(s) => k(s.state.temperature_k),
            Snapshot::Electric(s) => degc(s.state.temperature_c),
            Snapshot::V8(s) => k(s.lead().state.temperature_k),
        }
    }

    pub fn temperature_k(&self) -> Real {
        self.temperature().get::<kelvin>()
    }

    /// Shaft torque (N·m); net crank torque for the V8.
    pub fn torque(&self) -> Real {
        match self {
            Snapshot::Piston(s) => s.state.torque_nm,
            Snapshot::Rotary(s) => s.state.torque_nm,
            Snapshot::Electric(s) => s.state.torque_nm,
            Snapshot::V8(s) => s.net_torque_nm,
        }
    }

    /// First non-finite reported quantity, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        let checks: Vec<(&'static str, Real)> = match self {
            Snapshot::Piston(s) => vec![
                ("pressure", s.state.pressure_bar),
                ("volume", s.state.volume_cc),
                ("piston_y", s.state.piston_y),
            ],
            Snapshot::Rotary(s) => vec![
                ("pressure", s.state.pressure_bar),
                ("volume", s.state.volume_cc),
                ("rotor_angle", s.state.rotor_angle),
            ],
            Snapshot::Electric(s) => {
                let mut v = vec![
                    ("back_emf", s.state.back_emf_v),
                    ("power", s.state.power_w),
                    ("efficiency", s.state.efficiency_pct),
                    ("field_angle", s.state.field_angle),
                ];
                v.extend(s.state.currents.iter().map(|i| ("phase_current", *i)));
                v
            }
            Snapshot::V8(s) => s
                .cylinders
                .iter()
                .flat_map(|c| {
                    [
                        ("cylinder_pressure", c.state.pressure_bar),
                        ("cylinder_volume", c.state.volume_cc),
                        ("cylinder_torque", c.state.torque_nm),
                    ]
                })
                .collect(),
        };
        [
            ("angle", self.angle()),
            ("temperature", self.temperature_k()),
            ("torque", self.torque()),
        ]
        .into_iter()
        .chain(checks)
        .find(|(_, v)| !v.is_finite())
        .map(|(what, _)| what)
    }
}

/// Active stepper of one engine type.
#[derive(Clone, Debug)]
pub enum Engine {
    Piston(PistonStepper),
    Rotary(RotaryStepper),
    Electric(MotorStepper),
    V8(V8Stepper),
}

impl Engine {
    /// Fresh stepper with zeroed accumulators.
    pub fn build(kind: EngineKind, config: &EngineConfig) -> Self {
        match kind {
            EngineKind::Piston => Engine::Piston(PistonStepper::new(
                OttoModel::new(config.piston.clone()).with_gas(config.gas.clone()),
            )),
            EngineKind::Rotary => Engine::Rotary(RotaryStepper::new(
                WankelModel::new(config.wankel.clone()).with_gas(config.gas.clone()),
            )),
            EngineKind::Electric => {
                Engine::Electric(MotorStepper::new(MotorModel::new(config.motor.clone())))
            }
            EngineKind::V8 => Engine::V8(V8Stepper::new(
                OttoModel::new(config.piston.clone()).with_gas(config.gas.clone()),
            )),
        }
    }

    pub fn kind(&self) -> EngineKind {
        match self {
            Engine::Piston(_) => EngineKind::Piston,
            Engine::Rotary(_) => EngineKind::Rotary,
            Engine::Electric(_) => EngineKind::Electric,
            Engine::V8(_) => EngineKind::V8,
        }
    }

    /// Advance one frame. Negative or non-finite speeds are treated as zero.
    pub fn advance(&mut self, input: &FrameInput) -> Snapshot {
        let input = input.clamped();
        match self {
            Engine::Piston(s) => Snapshot::Piston(s.advance(&input)),
            Engine::Rotary(s) => Snapshot::Rotary(s.advance(&input)),
            Engine::Electric(s) => Snapshot::Electric(s.advance(&input)),
            Engine::V8(s) => Snapshot::V8(s.advance(&input)),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Engine::Piston(s) => s.reset(),
            Engine::Rotary(s) => s.reset(),
            Engine::Electric(s) => s.reset(),
            Engine::V8(s) => s.reset(),
        }
    }

    pub fn raw_angle(&self) -> Real {
        match self {
            Engine::Piston(s) => s.raw_angle(),
            Engine::Rotary(s) => s.raw_angle(),
            Engine::Electric(s) => s.raw_angle(),
            Engine::V8(s) => s.raw_angle(),
        }
    }
}
