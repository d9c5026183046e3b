//! Volumetric efficiency and intake flow estimates.

use crate::gas::GasProperties;
use crate::kinematics::mean_piston_speed;
use crate::spec::EngineSpec;
use cs_core::numeric::Real;
use serde::Serialize;

/// Speed at which the breathing curve peaks (RPM).
pub const VE_PEAK_RPM: Real = 4500.0;
/// Peak volumetric efficiency.
pub const VE_PEAK: Real = 0.95;
/// Mean piston speed above which flow choking sets in (m/s).
pub const CHOKE_PISTON_SPEED: Real = 20.0;
/// Breathing penalty applied above the choke speed.
pub const CHOKE_FACTOR: Real = 0.8;

/// Bell-shaped volumetric efficiency, clamped to `[0.2, 1.0]`.
pub fn volumetric_efficiency(spec: &EngineSpec, rpm: Real) -> Real {
    let x = rpm / VE_PEAK_RPM - 1.0;
    let mut ve = VE_PEAK * (1.0 - 0.5 * x * x);
    if mean_piston_speed(spec, rpm) > CHOKE_PISTON_SPEED {
        ve *= CHOKE_FACTOR;
    }
    ve.clamp(0.2, 1.0)
}

/// Air mass trapped at intake valve closing, `ρ·V_disp·ve` (kg).
pub fn trapped_mass(spec: &EngineSpec, gas: &GasProperties, ve: Real) -> Real {
    gas.density_stp.value * spec.displacement() * ve
}

/// Breathing figures reported alongside the gas state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OttoMetrics {
    pub volumetric_efficiency: Real,
    pub mean_piston_speed_mps: Real,
    pub air_flow_gps: Real,
    pub fuel_flow_gps: Real,
}

impl OttoMetrics {
    /// Intake and fuel flow of one four-stroke cylinder (one intake event
    /// every two revolutions).
    pub fn compute(spec: &EngineSpec, gas: &GasProperties, rpm: Real) -> Self {
        let ve = volumetric_efficiency(spec, rpm);
        let air_flow_gps =
            spec.displacement() * (rpm / 60.0) * 0.5 * gas.density_stp.value * ve * 1000.0;
        Self {
            volumetric_efficiency: ve,
            mean_piston_speed_mps: mean_piston_speed(spec, rpm),
            air_flow_gps,
            fuel_flow_gps: air_flow_gps / spec.fuel.air_fuel_ratio,
        }
    }
}
