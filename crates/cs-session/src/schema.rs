//! Session schema definitions.

use serde::{Deserialize, Serialize};

pub const SESSION_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub version: u32,
    pub name: String,
    pub engine: EngineKindDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piston: Option<PistonDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wankel: Option<WankelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motor: Option<MotorDef>,
    #[serde(default)]
    pub run: RunDef,
}

impl Session {
    /// Session for `engine` with default hardware and run settings.
    pub fn template(name: &str, engine: EngineKindDef) -> Self {
        let mut session = Session {
            version: SESSION_VERSION,
            name: name.to_string(),
            engine,
            piston: None,
            wankel: None,
            motor: None,
            run: RunDef::default(),
        };
        match engine {
            EngineKindDef::Piston | EngineKindDef::V8 => session.piston = Some(PistonDef::default()),
            EngineKindDef::Rotary => session.wankel = Some(WankelDef::default()),
            EngineKindDef::Electric => session.motor = Some(MotorDef::default()),
        }
        session
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngineKindDef {
    Piston,
    Rotary,
    Electric,
    V8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PistonDef {
    pub bore_mm: f64,
    pub stroke_mm: f64,
    pub rod_length_mm: f64,
    pub compression_ratio: f64,
    pub displacement_cc: f64,
    pub air_fuel_ratio: f64,
    pub fuel_lhv_mj_per_kg: f64,
    pub combustion_efficiency: f64,
    #[serde(default = "default_reciprocating_mass_kg")]
    pub reciprocating_mass_kg: f64,
    #[serde(default = "default_visual_crank_radius")]
    pub visual_crank_radius: f64,
    #[serde(default = "default_visual_rod_length")]
    pub visual_rod_length: f64,
}

fn default_reciprocating_mass_kg() -> f64 {
    0.4
}

fn default_visual_crank_radius() -> f64 {
    1.0
}

fn default_visual_rod_length() -> f64 {
    3.0
}

impl Default for PistonDef {
    fn default() -> Self {
        Self {
            bore_mm: 86.0,
            stroke_mm: 86.0,
            rod_length_mm: 145.0,
            compression_ratio: 10.5,
            displacement_cc: 499.5,
            air_fuel_ratio: 14.7,
            fuel_lhv_mj_per_kg: 44.0,
            combustion_efficiency: 0.90,
            reciprocating_mass_kg: default_reciprocating_mass_kg(),
            visual_crank_radius: default_visual_crank_radius(),
            visual_rod_length: default_visual_rod_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WankelDef {
    pub displacement_cc: f64,
    pub compression_ratio: f64,
    pub generating_radius_m: f64,
    pub eccentricity_m: f64,
    pub width_m: f64,
    #[serde(default = "default_heat_addition_k")]
    pub heat_addition_k: f64,
}

fn default_heat_addition_k() -> f64 {
    1800.0
}

impl Default for WankelDef {
    fn default() -> Self {
        Self {
            displacement_cc: 654.0,
            compression_ratio: 9.0,
            generating_radius_m: 0.10,
            eccentricity_m: 0.015,
            width_m: 0.07,
            heat_addition_k: default_heat_addition_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MotorDef {
    pub pole_pairs: u32,
    pub flux_linkage_wb: f64,
    pub stator_resistance_ohm: f64,
    pub ld_uh: f64,
    pub lq_uh: f64,
    pub current_limit_a: f64,
    pub bus_voltage_v: f64,
    pub base_speed_rpm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal: Option<ThermalDef>,
}

impl Default for MotorDef {
    fn default() -> Self {
        Self {
            pole_pairs: 3,
            flux_linkage_wb: 0.05,
            stator_resistance_ohm: 0.007,
            ld_uh: 150.0,
            lq_uh: 350.0,
            current_limit_a: 200.0,
            bus_voltage_v: 400.0,
            base_speed_rpm: 3000.0,
            thermal: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermalDef {
    pub thermal_mass_j_per_k: f64,
    pub cooling_base_w_per_k: f64,
    pub cooling_per_rpm_w_per_k: f64,
    pub ambient_c: f64,
    /// Copper resistance temperature coefficient (1/°C)
    #[serde(default = "default_copper_coefficient")]
    pub copper_coefficient_per_c: f64,
    /// Temperature at which `stator_resistance_ohm` is specified
    #[serde(default = "default_reference_c")]
    pub reference_c: f64,
}

fn default_copper_coefficient() -> f64 {
    0.00393
}

fn default_reference_c() -> f64 {
    20.0
}

impl Default for ThermalDef {
    fn default() -> Self {
        Self {
            thermal_mass_j_per_k: 5000.0,
            cooling_base_w_per_k: 5.0,
            cooling_per_rpm_w_per_k: 0.01,
            ambient_c: 25.0,
            copper_coefficient_per_c: default_copper_coefficient(),
            reference_c: default_reference_c(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    pub dt_s: f64,
    pub t_end_s: f64,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
    #[serde(default = "default_rpm")]
    pub rpm: f64,
    #[serde(default)]
    pub paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_angle_rad: Option<f64>,
    /// Overrides `rpm` when present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rpm_schedule: Vec<RpmPointDef>,
}

fn default_record_every() -> usize {
    1
}

fn default_rpm() -> f64 {
    3000.0
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            dt_s: 1.0 / 60.0,
            t_end_s: 1.0,
            record_every: default_record_every(),
            rpm: default_rpm(),
            paused: false,
            manual_angle_rad: None,
            rpm_schedule: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpmPointDef {
    pub time_s: f64,
    pub rpm: f64,
}
