//! Single-zone Otto cycle.
//!
//! Every quantity is derived from the normalized crank angle and the speed;
//! nothing is carried between frames.

use crate::combustion::Wiebe;
use crate::common::{CC_PER_M3, PA_PER_BAR};
use crate::gas::GasProperties;
use crate::kinematics::{cylinder_volume, visual_piston_y};
use crate::phase::{StrokePhase, classify};
use crate::spec::EngineSpec;
use crate::torque::crank_torque;
use crate::traits::CycleModel;
use crate::volumetric::{OttoMetrics, trapped_mass};
use cs_core::angle::CycleWindow;
use cs_core::numeric::Real;
use serde::Serialize;

/// Intake manifold depression coefficient, `ΔP = k·rpm²` (Pa).
pub const INTAKE_DEPRESSION: Real = 5e-5;
/// Exhaust back-pressure slope (Pa per RPM).
pub const EXHAUST_BACK_PRESSURE: Real = 2.0;
/// Gas temperature while the exhaust valve is open (K).
pub const EXHAUST_TEMPERATURE_K: Real = 800.0;

/// Gas state of one cylinder at one crank angle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OttoState {
    pub phase: StrokePhase,
    /// Rendered piston height (scene units)
    pub piston_y: Real,
    pub pressure_bar: Real,
    pub temperature_k: Real,
    pub volume_cc: Real,
    pub torque_nm: Real,
    /// Wiebe burned fraction, zero outside the power stroke
    pub burn_fraction: Real,
    pub metrics: OttoMetrics,
}

/// Four-stroke spark-ignition cylinder.
#[derive(Clone, Debug, Default)]
pub struct OttoModel {
    spec: EngineSpec,
    gas: GasProperties,
    wiebe: Wiebe,
}

impl OttoModel {
    pub fn new(spec: EngineSpec) -> Self {
        Self {
            spec,
            gas: GasProperties::default(),
            wiebe: Wiebe::default(),
        }
    }

    pub fn with_gas(mut self, gas: GasProperties) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_wiebe(mut self, wiebe: Wiebe) -> Self {
        self.wiebe = wiebe;
        self
    }

    pub fn spec(&self) -> &EngineSpec {
        &self.spec
    }

    pub fn gas(&self) -> &GasProperties {
        &self.gas
    }

    /// Cylinder pressure (Pa), temperature (K) and burned fraction.
    fn gas_state(
        &self,
        phase: StrokePhase,
        theta: Real,
        volume: Real,
        ve: Real,
        rpm: Real,
    ) -> (Real, Real, Real) {
        let p_atm = self.gas.p_atm.value;
        let t_amb = self.gas.t_ambient.value;
        let gamma = self.gas.gamma;
        match phase {
            StrokePhase::Intake => (p_atm - INTAKE_DEPRESSION * rpm * rpm, t_amb, 0.0),
            StrokePhase::Compression => {
                let ratio = self.spec.total_volume() / volume;
                (
                    self.gas.polytropic_pressure(p_atm, ratio),
                    self.gas.polytropic_temperature(t_amb, ratio),
                    0.0,
                )
            }
            StrokePhase::Power => {
                let ratio = self.spec.total_volume() / volume;
                let t_motoring = t_amb * ratio.powf(gamma - 1.0);
                let mass = trapped_mass(&self.spec, &self.gas, ve);
                let fuel = &self.spec.fuel;
                let heat = mass / fuel.air_fuel_ratio
                    * fuel.heating_value.value
                    * fuel.combustion_efficiency;
                let x_b = self.wiebe.burned_fraction(theta);
                let temperature = t_motoring + x_b * heat / (mass * self.gas.cv.value);
                (
                    self.gas.ideal_gas_pressure(mass, temperature, volume),
                    temperature,
                    x_b,
                )
            }
            StrokePhase::Exhaust => (
                p_atm + EXHAUST_BACK_PRESSURE * rpm,
                EXHAUST_TEMPERATURE_K,
                0.0,
            ),
        }
    }
}

impl CycleModel for OttoModel {
    type State = OttoState;

    fn window(&self) -> CycleWindow {
        CycleWindow::FourStroke
    }

    fn evaluate(&self, cycle_angle: Real, rpm: Real) -> OttoState {
        let phase = classify(cycle_angle, CycleWindow::FourStroke.length());
        let volume = cylinder_volume(&self.spec, cycle_angle);
        let metrics = OttoMetrics::compute(&self.spec, &self.gas, rpm);
        let (pressure, temperature, burn_fraction) =
            self.gas_state(phase, cycle_angle, volume, metrics.volumetric_efficiency, rpm);
        let torque = crank_torque(
            &self.spec,
            phase,
            cycle_angle,
            rpm,
            pressure,
            self.gas.p_atm.value,
        );

        OttoState {
            phase,
            piston_y: visual_piston_y(&self.spec, cycle_angle),
            pressure_bar: pressure / PA_PER_BAR,
            temperature_k: temperature,
            volume_cc: volume * CC_PER_M3,
            torque_nm: torque,
            burn_fraction,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn model() -> OttoModel {
        OttoModel::new(EngineSpec::default())
    }

    #[test]
    fn intake_depression_grows_with_speed() {
        let m = model();
        let idle = m.evaluate(0.5 * PI, 0.0);
        let fast = m.evaluate(0.5 * PI, 6000.0);
        assert_eq!(idle.phase, StrokePhase::Intake);
        assert!((idle.pressure_bar - 1.01325).abs() < 1e-12);
        // 5e-5 · 6000² = 1800 Pa
        assert!((fast.pressure_bar - (101_325.0 - 1800.0) / 1e5).abs() < 1e-12);
        assert_eq!(fast.temperature_k, 300.0);
    }

    #[test]
    fn bottom_dead_centre_compression_is_ambient() {
        let m = model();
        let s = m.evaluate(PI, 3000.0);
        assert_eq!(s.phase, StrokePhase::Compression);
        // Bore/stroke swept volume runs a hair over the nominal displacement
        assert!((s.pressure_bar - 1.01325).abs() < 1e-3);
        assert!((s.temperature_k - 300.0).abs() < 0.05);
    }

    #[test]
    fn compression_near_tdc() {
        let m = model();
        let s = m.evaluate(2.0 * PI - 1e-6, 3000.0);
        // CR 10.5: 10.5^1.35 ≈ 23.97
        assert!((s.pressure_bar / 1.01325 - 10.5f64.powf(1.35)).abs() < 1e-3);
        assert!((s.volume_cc - 52.578_947).abs() < 1e-4);
    }

    #[test]
    fn combustion_heats_well_above_motoring() {
        let m = model();
        let s = m.evaluate(2.0 * PI + 70f64.to_radians(), 3000.0);
        assert_eq!(s.phase, StrokePhase::Power);
        assert!(s.burn_fraction > 0.99);
        assert!(s.temperature_k > 2000.0);
        assert!(s.pressure_bar > 10.0);
        assert!(s.torque_nm > 0.0);
    }

    #[test]
    fn exhaust_is_fixed_hot_gas() {
        let m = model();
        let s = m.evaluate(3.5 * PI, 2000.0);
        assert_eq!(s.phase, StrokePhase::Exhaust);
        assert_eq!(s.temperature_k, EXHAUST_TEMPERATURE_K);
        assert!((s.pressure_bar - (101_325.0 + 4000.0) / 1e5).abs() < 1e-12);
    }

    #[test]
    fn piston_at_top_on_tdc() {
        let m = model();
        let s = m.evaluate(0.0, 0.0);
        assert!((s.piston_y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn evaluate_raw_wraps_two_cycles() {
        let m = model();
        let a = m.evaluate(1.0, 2500.0);
        let b = m.evaluate_raw(1.0 + 8.0 * PI, 2500.0);
        assert_eq!(a.phase, b.phase);
        assert!((a.volume_cc - b.volume_cc).abs() < 1e-9);
    }
}
