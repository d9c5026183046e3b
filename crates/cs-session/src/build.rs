//! Build runtime models from a validated session.

use crate::schema::{EngineKindDef, MotorDef, PistonDef, RunDef, Session, WankelDef};
use crate::{SessionError, SessionResult};
use cs_core::units::{amp, cc, dk, henry, j_per_kg, kg, m, mm, ohm, volt, weber};
use cs_cycle::{
    CylinderGeometry, EngineSpec, FuelCharge, MotorSpec, StatorThermal, VisualLinkage, WankelSpec,
};
use cs_sim::{Engine, EngineConfig, EngineKind, RpmPoint, RpmSchedule, RunOptions, Simulator};
use tracing::debug;

impl From<EngineKindDef> for EngineKind {
    fn from(def: EngineKindDef) -> Self {
        match def {
            EngineKindDef::Piston => EngineKind::Piston,
            EngineKindDef::Rotary => EngineKind::Rotary,
            EngineKindDef::Electric => EngineKind::Electric,
            EngineKindDef::V8 => EngineKind::V8,
        }
    }
}

pub fn build_piston(def: &PistonDef) -> SessionResult<EngineSpec> {
    let geometry = CylinderGeometry {
        bore: mm(def.bore_mm),
        stroke: mm(def.stroke_mm),
        rod_length: mm(def.rod_length_mm),
        compression_ratio: def.compression_ratio,
        displacement: cc(def.displacement_cc),
    };
    let fuel = FuelCharge {
        air_fuel_ratio: def.air_fuel_ratio,
        heating_value: j_per_kg(def.fuel_lhv_mj_per_kg * 1e6),
        combustion_efficiency: def.combustion_efficiency,
    };
    let visual = VisualLinkage {
        crank_radius: def.visual_crank_radius,
        rod_length: def.visual_rod_length,
    };
    EngineSpec::new(geometry, fuel, kg(def.reciprocating_mass_kg), visual).map_err(build_error)
}

pub fn build_wankel(def: &WankelDef) -> SessionResult<WankelSpec> {
    WankelSpec::new(
        cc(def.displacement_cc),
        def.compression_ratio,
        m(def.generating_radius_m),
        m(def.eccentricity_m),
        m(def.width_m),
        dk(def.heat_addition_k),
    )
    .map_err(build_error)
}

pub fn build_motor(def: &MotorDef) -> SessionResult<MotorSpec> {
    let mut thermal = StatorThermal::default();
    if let Some(t) = &def.thermal {
        thermal.thermal_mass = t.thermal_mass_j_per_k;
        thermal.cooling_base = t.cooling_base_w_per_k;
        thermal.cooling_per_rpm = t.cooling_per_rpm_w_per_k;
        thermal.ambient_c = t.ambient_c;
        thermal.copper_coefficient = t.copper_coefficient_per_c;
        thermal.reference_c = t.reference_c;
    }
    MotorSpec::new(
        def.pole_pairs,
        weber(def.flux_linkage_wb),
        ohm(def.stator_resistance_ohm),
        henry(def.ld_uh * 1e-6),
        henry(def.lq_uh * 1e-6),
        amp(def.current_limit_a),
        volt(def.bus_voltage_v),
        def.base_speed_rpm,
        thermal,
    )
    .map_err(build_error)
}

/// Engine configuration with session overrides applied over the defaults.
pub fn build_config(session: &Session) -> SessionResult<EngineConfig> {
    let mut config = EngineConfig::default();
    if let Some(piston) = &session.piston {
        config.piston = build_piston(piston)?;
    }
    if let Some(wankel) = &session.wankel {
        config.wankel = build_wankel(wankel)?;
    }
    if let Some(motor) = &session.motor {
        config.motor = build_motor(motor)?;
    }
    Ok(config)
}

/// Standalone stepper for the session's engine type.
pub fn build_engine(session: &Session) -> SessionResult<Engine> {
    let config = build_config(session)?;
    Ok(Engine::build(session.engine.into(), &config))
}

pub fn build_simulator(session: &Session) -> SessionResult<Simulator> {
    let config = build_config(session)?;
    debug!(session = %session.name, "building simulator");
    Ok(Simulator::new(session.engine.into(), config))
}

pub fn build_run_options(run: &RunDef) -> SessionResult<RunOptions> {
    let rpm = if run.rpm_schedule.is_empty() {
        RpmSchedule::Constant(run.rpm)
    } else {
        let points = run
            .rpm_schedule
            .iter()
            .map(|p| RpmPoint {
                time: p.time_s,
                rpm: p.rpm,
            })
            .collect();
        RpmSchedule::piecewise(points).map_err(build_error)?
    };
    Ok(RunOptions {
        dt: run.dt_s,
        t_end: run.t_end_s,
        record_every: run.record_every,
        rpm,
        paused: run.paused,
        manual_angle: run.manual_angle_rad,
        ..RunOptions::default()
    })
}

fn build_error(e: impl std::fmt::Display) -> SessionError {
    SessionError::Build {
        what: e.to_string(),
    }
}
