//! Wankel rotary: one rotor face tracked through its 6π cycle.
//!
//! The chamber volume is a raised-cosine approximation of the trochoid
//! between `V_min` and `V_min + V_disp`; combustion is modelled as
//! constant-volume heat addition at minimum volume followed by polytropic
//! expansion.

use crate::common::{CC_PER_M3, PA_PER_BAR, check_positive};
use crate::error::{CycleError, CycleResult};
use crate::gas::GasProperties;
use crate::phase::{PhasePosition, StrokePhase, locate};
use crate::traits::CycleModel;
use cs_core::angle::CycleWindow;
use cs_core::numeric::Real;
use cs_core::units::{Length, TempInterval, Volume, cc, dk, m};
use serde::Serialize;
use std::f64::consts::PI;

/// Eccentric shaft turns per rotor turn.
pub const GEAR_RATIO: Real = 3.0;
/// Rotor flanks sharing the housing.
pub const ROTOR_FACES: Real = 3.0;
/// Exhaust port back-pressure relative to ambient.
pub const EXHAUST_PRESSURE_RATIO: Real = 1.1;
/// Gas temperature while the exhaust port is open (K).
pub const EXHAUST_TEMPERATURE_K: Real = 900.0;

/// Rotor and housing dimensions.
#[derive(Clone, Debug)]
pub struct WankelSpec {
    /// Swept volume of one rotor face
    pub displacement: Volume,
    pub compression_ratio: Real,
    /// Trochoid generating radius
    pub generating_radius: Length,
    pub eccentricity: Length,
    /// Housing (rotor) width
    pub width: Length,
    /// Temperature rise of the constant-volume burn
    pub heat_addition: TempInterval,
}

impl Default for WankelSpec {
    /// One face of a 13B-class rotor.
    fn default() -> Self {
        Self {
            displacement: cc(654.0),
            compression_ratio: 9.0,
            generating_radius: m(0.10),
            eccentricity: m(0.015),
            width: m(0.07),
            heat_addition: dk(1800.0),
        }
    }
}

impl WankelSpec {
    /// Create a validated rotor specification.
    ///
    /// # Errors
    /// Returns error on non-positive dimensions, a compression ratio at or
    /// below one, or an eccentricity the rotor cannot clear.
    pub fn new(
        displacement: Volume,
        compression_ratio: Real,
        generating_radius: Length,
        eccentricity: Length,
        width: Length,
        heat_addition: TempInterval,
    ) -> CycleResult<Self> {
        check_positive(displacement.value, "rotor displacement must be positive")?;
        check_positive(generating_radius.value, "generating radius must be positive")?;
        check_positive(eccentricity.value, "eccentricity must be positive")?;
        check_positive(width.value, "housing width must be positive")?;
        check_positive(heat_addition.value, "heat addition must be positive")?;
        if !(compression_ratio > 1.0) {
            return Err(CycleError::InvalidArg {
                what: "rotor compression ratio must exceed 1",
            });
        }
        if eccentricity.value >= generating_radius.value {
            return Err(CycleError::NonPhysical {
                what: "eccentricity must be smaller than generating radius",
            });
        }
        Ok(Self {
            displacement,
            compression_ratio,
            generating_radius,
            eccentricity,
            width,
            heat_addition,
        })
    }

    /// Minimum chamber volume `V_disp / CR` (m³).
    pub fn min_volume(&self) -> Real {
        self.displacement.value / self.compression_ratio
    }

    /// Maximum chamber volume `V_min + V_disp` (m³).
    pub fn max_volume(&self) -> Real {
        self.min_volume() + self.displacement.value
    }

    /// Torque lever `width·R·e` (m³).
    pub fn lever(&self) -> Real {
        self.width.value * self.generating_radius.value * self.eccentricity.value
    }
}

/// Gas state of the tracked rotor face.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WankelState {
    pub phase: StrokePhase,
    /// Fraction of the current phase already travelled
    pub progress: Real,
    /// Rotor angle (rad), one third of the eccentric shaft angle
    pub rotor_angle: Real,
    pub pressure_bar: Real,
    pub temperature_k: Real,
    pub volume_cc: Real,
    pub torque_nm: Real,
}

/// Rotary engine model.
#[derive(Clone, Debug, Default)]
pub struct WankelModel {
    spec: WankelSpec,
    gas: GasProperties,
}

impl WankelModel {
    pub fn new(spec: WankelSpec) -> Self {
        Self {
            spec,
            gas: GasProperties::default(),
        }
    }

    pub fn with_gas(mut self, gas: GasProperties) -> Self {
        self.gas = gas;
        self
    }

    pub fn spec(&self) -> &WankelSpec {
        &self.spec
    }

    /// Chamber volume (m³) for a phase position.
    pub fn chamber_volume(&self, pos: PhasePosition) -> Real {
        let swing = 0.5 * (PI * pos.progress).cos();
        let fill = if pos.phase.is_expanding() {
            0.5 - swing
        } else {
            0.5 + swing
        };
        self.spec.min_volume() + self.spec.displacement.value * fill
    }

    /// Pressure (Pa) and temperature (K) for a phase and chamber volume.
    fn gas_state(&self, phase: StrokePhase, volume: Real) -> (Real, Real) {
        let p_atm = self.gas.p_atm.value;
        let t_amb = self.gas.t_ambient.value;
        let gamma = self.gas.gamma;
        match phase {
            StrokePhase::Intake => (p_atm, t_amb),
            StrokePhase::Compression => {
                let ratio = self.spec.max_volume() / volume;
                (
                    self.gas.polytropic_pressure(p_atm, ratio),
                    self.gas.polytropic_temperature(t_amb, ratio),
                )
            }
            StrokePhase::Power => {
                let cr = self.spec.compression_ratio;
                let t2 = t_amb * cr.powf(gamma - 1.0);
                let t3 = t2 + self.spec.heat_addition.value;
                let p3 = p_atm * cr.powf(gamma) * t3 / t2;
                let expansion = volume / self.spec.min_volume();
                (
                    p3 * expansion.powf(-gamma),
                    t3 * expansion.powf(-(gamma - 1.0)),
                )
            }
            StrokePhase::Exhaust => (EXHAUST_PRESSURE_RATIO * p_atm, EXHAUST_TEMPERATURE_K),
        }
    }

    /// Shaft torque contributed by the working faces (N·m).
    fn torque(&self, pos: PhasePosition, pressure: Real) -> Real {
        let factor = match pos.phase {
            StrokePhase::Power => (PI * pos.progress).sin(),
            StrokePhase::Compression => -0.5 * (PI * pos.progress).sin(),
            StrokePhase::Intake | StrokePhase::Exhaust => 0.0,
        };
        (pressure - self.gas.p_atm.value) * self.spec.lever() * factor * ROTOR_FACES
    }
}

impl CycleModel for WankelModel {
    type State = WankelState;

    fn window(&self) -> CycleWindow {
        CycleWindow::Rotary
    }

    fn evaluate(&self, cycle_angle: Real, _rpm: Real) -> WankelState {
        let pos = locate(cycle_angle, CycleWindow::Rotary.length());
        let volume = self.chamber_volume(pos);
        let (pressure, temperature) = self.gas_state(pos.phase, volume);

        WankelState {
            phase: pos.phase,
            progress: pos.progress,
            rotor_angle: cycle_angle / GEAR_RATIO,
            pressure_bar: pressure / PA_PER_BAR,
            temperature_k: temperature,
            volume_cc: volume * CC_PER_M3,
            torque_nm: self.torque(pos, pressure),
        }
    }
}
