//! Permanent-magnet synchronous motor under field-oriented control.
//!
//! The electrical model is quasi-static: the current controller is assumed
//! to track its command perfectly, so the phase currents follow directly
//! from the commanded `(i_d, i_q)` and the rotor angle. Only the stator
//! temperature has memory; [`MotorModel::evaluate`] takes the current
//! temperature and reports the next one.

use crate::common::check_positive;
use crate::error::{CycleError, CycleResult};
use crate::foc::{AlphaBeta, DirectQuadrature, PhaseCurrents, inverse_clarke, inverse_park};
use cs_core::numeric::{Real, rpm_to_rad_per_s};
use cs_core::units::{
    Current, Inductance, MagneticFlux, Resistance, Voltage, amp, henry, ohm, volt, weber,
};
use serde::Serialize;

/// Upper bound on reported efficiency (%).
pub const MAX_EFFICIENCY_PCT: Real = 99.9;
/// Electrical input below which efficiency is reported as zero (W).
pub const MIN_ELECTRICAL_POWER_W: Real = 1.0;
/// Share of the current limit diverted into negative `i_d` when weakening.
pub const FIELD_WEAKENING_GAIN: Real = 0.5;
/// Largest thermal substep as a fraction of the stator time constant.
pub const THERMAL_SUBSTEP_FRACTION: Real = 0.5;
/// Upper bound on thermal substeps per frame.
pub const MAX_THERMAL_SUBSTEPS: usize = 1000;

/// Lumped stator thermal network.
#[derive(Clone, Debug, PartialEq)]
pub struct StatorThermal {
    /// Heat capacity of the winding and core (J/K)
    pub thermal_mass: Real,
    /// Conductance to coolant at standstill (W/K)
    pub cooling_base: Real,
    /// Added conductance per RPM (W/K/RPM)
    pub cooling_per_rpm: Real,
    /// Coolant temperature (°C)
    pub ambient_c: Real,
    /// Copper resistance temperature coefficient (1/°C)
    pub copper_coefficient: Real,
    /// Temperature at which the stator resistance is specified (°C)
    pub reference_c: Real,
}

impl Default for StatorThermal {
    fn default() -> Self {
        Self {
            thermal_mass: 5000.0,
            cooling_base: 5.0,
            cooling_per_rpm: 0.01,
            ambient_c: 25.0,
            copper_coefficient: 0.00393,
            reference_c: 20.0,
        }
    }
}

impl StatorThermal {
    /// Winding resistance at temperature `temp_c`.
    pub fn hot_resistance(&self, cold: Real, temp_c: Real) -> Real {
        cold * (1.0 + self.copper_coefficient * (temp_c - self.reference_c))
    }

    /// Heat rejected to the coolant (W).
    pub fn cooling(&self, temp_c: Real, rpm: Real) -> Real {
        (temp_c - self.ambient_c) * (self.cooling_base + self.cooling_per_rpm * rpm)
    }

    /// Explicit Euler step of `C·dT/dt = loss − cooling`.
    pub fn step(&self, temp_c: Real, loss_w: Real, rpm: Real, dt: Real) -> Real {
        temp_c + (loss_w - self.cooling(temp_c, rpm)) * dt / self.thermal_mass
    }

    /// `C / G` at this speed (s); infinite when there is no cooling path.
    pub fn time_constant(&self, rpm: Real) -> Real {
        let conductance = self.cooling_base + self.cooling_per_rpm * rpm;
        if conductance > 0.0 {
            self.thermal_mass / conductance
        } else {
            Real::INFINITY
        }
    }

    /// Integrate one frame of `dt` with a fixed loss.
    ///
    /// Frames longer than half the time constant are split into equal Euler
    /// substeps so the temperature approaches `ambient + loss/G` without
    /// overshoot. Past [`MAX_THERMAL_SUBSTEPS`] the remaining time is dropped;
    /// by then the stator has settled.
    pub fn advance(&self, temp_c: Real, loss_w: Real, rpm: Real, dt: Real) -> Real {
        let max_step = THERMAL_SUBSTEP_FRACTION * self.time_constant(rpm);
        if !(dt > max_step) {
            return self.step(temp_c, loss_w, rpm, dt);
        }
        let substeps = (dt / max_step).ceil().min(MAX_THERMAL_SUBSTEPS as Real);
        let h = (dt / substeps).min(max_step);
        (0..substeps as usize).fold(temp_c, |t, _| self.step(t, loss_w, rpm, h))
    }
}

/// Motor nameplate and controller limits.
#[derive(Clone, Debug)]
pub struct MotorSpec {
    pub pole_pairs: u32,
    /// Permanent-magnet flux linkage
    pub flux_linkage: MagneticFlux,
    pub stator_resistance: Resistance,
    pub ld: Inductance,
    pub lq: Inductance,
    /// FOC current command magnitude
    pub current_limit: Current,
    /// DC bus voltage
    pub bus_voltage: Voltage,
    /// Speed above which the controller weakens the field (RPM)
    pub base_speed_rpm: Real,
    pub thermal: StatorThermal,
}

impl Default for MotorSpec {
    /// Interior-magnet traction motor, 3 pole pairs on a 400 V bus.
    fn default() -> Self {
        Self {
            pole_pairs: 3,
            flux_linkage: weber(0.05),
            stator_resistance: ohm(0.007),
            ld: henry(150e-6),
            lq: henry(350e-6),
            current_limit: amp(200.0),
            bus_voltage: volt(400.0),
            base_speed_rpm: 3000.0,
            thermal: StatorThermal::default(),
        }
    }
}

impl MotorSpec {
    /// Create a validated motor specification.
    ///
    /// # Errors
    /// Returns error on non-positive parameters or when the back-EMF at base
    /// speed already exceeds the bus voltage.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pole_pairs: u32,
        flux_linkage: MagneticFlux,
        stator_resistance: Resistance,
        ld: Inductance,
        lq: Inductance,
        current_limit: Current,
        bus_voltage: Voltage,
        base_speed_rpm: Real,
        thermal: StatorThermal,
    ) -> CycleResult<Self> {
        if pole_pairs == 0 {
            return Err(CycleError::InvalidArg {
                what: "pole pairs must be at least 1",
            });
        }
        check_positive(flux_linkage.value, "flux linkage must be positive")?;
        check_positive(stator_resistance.value, "stator resistance must be positive")?;
        check_positive(ld.value, "d-axis inductance must be positive")?;
        check_positive(lq.value, "q-axis inductance must be positive")?;
        check_positive(current_limit.value, "current limit must be positive")?;
        check_positive(bus_voltage.value, "bus voltage must be positive")?;
        check_positive(base_speed_rpm, "base speed must be positive")?;
        check_positive(thermal.thermal_mass, "thermal mass must be positive")?;
        if thermal.cooling_base < 0.0 || thermal.cooling_per_rpm < 0.0 {
            return Err(CycleError::InvalidArg {
                what: "cooling coefficients cannot be negative",
            });
        }

        let spec = Self {
            pole_pairs,
            flux_linkage,
            stator_resistance,
            ld,
            lq,
            current_limit,
            bus_voltage,
            base_speed_rpm,
            thermal,
        };
        if spec.back_emf(spec.base_speed_rpm) > spec.bus_voltage.value {
            return Err(CycleError::NonPhysical {
                what: "back-EMF at base speed exceeds bus voltage",
            });
        }
        Ok(spec)
    }

    pub fn pole_pairs_real(&self) -> Real {
        Real::from(self.pole_pairs)
    }

    /// Back-EMF `ω·ψ·p` (V).
    pub fn back_emf(&self, rpm: Real) -> Real {
        rpm_to_rad_per_s(rpm) * self.flux_linkage.value * self.pole_pairs_real()
    }

    /// Electromagnetic torque `1.5·p·(ψ·i_q + (L_d − L_q)·i_d·i_q)` (N·m).
    pub fn torque(&self, dq: DirectQuadrature) -> Real {
        let reluctance = (self.ld.value - self.lq.value) * dq.d * dq.q;
        1.5 * self.pole_pairs_real() * (self.flux_linkage.value * dq.q + reluctance)
    }

    /// Current command: full `i_q` up to base speed, then `i_q` scaled by
    /// `base/rpm` with negative `i_d` to weaken the magnet field.
    pub fn current_command(&self, rpm: Real) -> DirectQuadrature {
        let i_max = self.current_limit.value;
        if rpm <= self.base_speed_rpm {
            return DirectQuadrature { d: 0.0, q: i_max };
        }
        let k = self.base_speed_rpm / rpm;
        DirectQuadrature {
            d: -FIELD_WEAKENING_GAIN * i_max * (1.0 - k),
            q: i_max * k,
        }
    }
}

/// Electrical, mechanical and thermal state for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MotorState {
    /// Mechanical rotor angle (rad)
    pub mechanical_angle: Real,
    pub electrical_angle: Real,
    /// Phase currents `[u, v, w]` (A)
    pub currents: [Real; 3],
    pub i_d: Real,
    pub i_q: Real,
    /// Stator current vector angle in mechanical radians
    pub field_angle: Real,
    /// `[i_α, i_β, 0]`
    pub flux_vector: [Real; 3],
    pub back_emf_v: Real,
    pub torque_nm: Real,
    pub power_w: Real,
    pub loss_w: Real,
    /// Efficiency (%), within `[0, 99.9]`
    pub efficiency_pct: Real,
    /// Winding resistance at the start-of-frame temperature
    pub stator_resistance_ohm: Real,
    /// Stator temperature after this frame (°C)
    pub temperature_c: Real,
}

/// FOC motor model; holds configuration only.
#[derive(Clone, Debug, Default)]
pub struct MotorModel {
    spec: MotorSpec,
}

impl MotorModel {
    pub fn new(spec: MotorSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &MotorSpec {
        &self.spec
    }

    /// Temperature the stator starts from after (re)initialization.
    pub fn ambient_c(&self) -> Real {
        self.spec.thermal.ambient_c
    }

    /// Evaluate one frame.
    ///
    /// `temperature_c` is the stator temperature carried from the previous
    /// frame; the returned state holds the updated value.
    pub fn evaluate(
        &self,
        mechanical_angle: Real,
        rpm: Real,
        temperature_c: Real,
        dt: Real,
    ) -> MotorState {
        let spec = &self.spec;
        let p = spec.pole_pairs_real();
        let theta_e = mechanical_angle * p;

        let dq = spec.current_command(rpm);
        let AlphaBeta { alpha, beta } = inverse_park(dq, theta_e);
        let phases: PhaseCurrents = inverse_clarke(AlphaBeta { alpha, beta });

        let omega = rpm_to_rad_per_s(rpm);
        let torque = spec.torque(dq);
        let power = torque * omega;

        let resistance = spec
            .thermal
            .hot_resistance(spec.stator_resistance.value, temperature_c);
        let loss = 1.5 * (dq.d * dq.d + dq.q * dq.q) * resistance;
        let electrical = power + loss;
        let efficiency = if electrical > MIN_ELECTRICAL_POWER_W {
            (power / electrical * 100.0).clamp(0.0, MAX_EFFICIENCY_PCT)
        } else {
            0.0
        };
        let next_temperature = spec.thermal.advance(temperature_c, loss, rpm, dt);

        MotorState {
            mechanical_angle,
            electrical_angle: theta_e,
            currents: phases.as_array(),
            i_d: dq.d,
            i_q: dq.q,
            field_angle: beta.atan2(alpha) / p,
            flux_vector: [alpha, beta, 0.0],
            back_emf_v: spec.back_emf(rpm),
            torque_nm: torque,
            power_w: power,
            loss_w: loss,
            efficiency_pct: efficiency,
            stator_resistance_ohm: resistance,
            temperature_c: next_temperature,
        }
    }
}
