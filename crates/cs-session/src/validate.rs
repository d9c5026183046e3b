//! Session validation logic.

use crate::schema::{
    EngineKindDef, MotorDef, PistonDef, RunDef, SESSION_VERSION, Session, WankelDef,
};
use cs_core::angle::MAX_RPM;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_session(session: &Session) -> Result<(), ValidationError> {
    if session.version == 0 || session.version > SESSION_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: session.version,
        });
    }

    // Missing hardware sections fall back to defaults; present ones must be sound
    match session.engine {
        EngineKindDef::Piston | EngineKindDef::V8 => {
            if let Some(piston) = &session.piston {
                validate_piston(piston)?;
            }
        }
        EngineKindDef::Rotary => {
            if let Some(wankel) = &session.wankel {
                validate_wankel(wankel)?;
            }
        }
        EngineKindDef::Electric => {
            if let Some(motor) = &session.motor {
                validate_motor(motor)?;
            }
        }
    }

    validate_run(&session.run)
}

fn validate_piston(piston: &PistonDef) -> Result<(), ValidationError> {
    validate_positive_finite("piston.bore_mm", piston.bore_mm)?;
    validate_positive_finite("piston.stroke_mm", piston.stroke_mm)?;
    validate_positive_finite("piston.rod_length_mm", piston.rod_length_mm)?;
    validate_positive_finite("piston.displacement_cc", piston.displacement_cc)?;
    validate_positive_finite("piston.air_fuel_ratio", piston.air_fuel_ratio)?;
    validate_positive_finite("piston.fuel_lhv_mj_per_kg", piston.fuel_lhv_mj_per_kg)?;
    validate_non_negative_finite("piston.reciprocating_mass_kg", piston.reciprocating_mass_kg)?;
    validate_positive_finite("piston.visual_crank_radius", piston.visual_crank_radius)?;
    validate_positive_finite("piston.visual_rod_length", piston.visual_rod_length)?;
    if !piston.compression_ratio.is_finite() || piston.compression_ratio <= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "piston.compression_ratio".to_string(),
            value: piston.compression_ratio.to_string(),
            reason: "must exceed 1".to_string(),
        });
    }
    let eta = piston.combustion_efficiency;
    if !eta.is_finite() || eta <= 0.0 || eta > 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "piston.combustion_efficiency".to_string(),
            value: eta.to_string(),
            reason: "must be in (0, 1]".to_string(),
        });
    }
    if piston.rod_length_mm <= 0.5 * piston.stroke_mm {
        return Err(ValidationError::InvalidValue {
            field: "piston.rod_length_mm".to_string(),
            value: piston.rod_length_mm.to_string(),
            reason: "must exceed half the stroke".to_string(),
        });
    }
    Ok(())
}

fn validate_wankel(wankel: &WankelDef) -> Result<(), ValidationError> {
    validate_positive_finite("wankel.displacement_cc", wankel.displacement_cc)?;
    validate_positive_finite("wankel.generating_radius_m", wankel.generating_radius_m)?;
    validate_positive_finite("wankel.eccentricity_m", wankel.eccentricity_m)?;
    validate_positive_finite("wankel.width_m", wankel.width_m)?;
    validate_positive_finite("wankel.heat_addition_k", wankel.heat_addition_k)?;
    if !wankel.compression_ratio.is_finite() || wankel.compression_ratio <= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "wankel.compression_ratio".to_string(),
            value: wankel.compression_ratio.to_string(),
            reason: "must exceed 1".to_string(),
        });
    }
    Ok(())
}

fn validate_motor(motor: &MotorDef) -> Result<(), ValidationError> {
    if motor.pole_pairs == 0 {
        return Err(ValidationError::InvalidValue {
            field: "motor.pole_pairs".to_string(),
            value: motor.pole_pairs.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    validate_positive_finite("motor.flux_linkage_wb", motor.flux_linkage_wb)?;
    validate_positive_finite("motor.stator_resistance_ohm", motor.stator_resistance_ohm)?;
    validate_positive_finite("motor.ld_uh", motor.ld_uh)?;
    validate_positive_finite("motor.lq_uh", motor.lq_uh)?;
    validate_positive_finite("motor.current_limit_a", motor.current_limit_a)?;
    validate_positive_finite("motor.bus_voltage_v", motor.bus_voltage_v)?;
    validate_positive_finite("motor.base_speed_rpm", motor.base_speed_rpm)?;
    if let Some(thermal) = &motor.thermal {
        validate_positive_finite("motor.thermal.thermal_mass_j_per_k", thermal.thermal_mass_j_per_k)?;
        validate_non_negative_finite(
            "motor.thermal.cooling_base_w_per_k",
            thermal.cooling_base_w_per_k,
        )?;
        validate_non_negative_finite(
            "motor.thermal.cooling_per_rpm_w_per_k",
            thermal.cooling_per_rpm_w_per_k,
        )?;
        validate_finite("motor.thermal.ambient_c", thermal.ambient_c)?;
        validate_non_negative_finite(
            "motor.thermal.copper_coefficient_per_c",
            thermal.copper_coefficient_per_c,
        )?;
        validate_finite("motor.thermal.reference_c", thermal.reference_c)?;
    }
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    validate_positive_finite("run.dt_s", run.dt_s)?;
    validate_non_negative_finite("run.t_end_s", run.t_end_s)?;
    validate_rpm("run.rpm", run.rpm)?;
    if run.record_every == 0 {
        return Err(ValidationError::InvalidValue {
            field: "run.record_every".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if let Some(angle) = run.manual_angle_rad {
        if !angle.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "run.manual_angle_rad".to_string(),
                value: angle.to_string(),
                reason: "must be finite".to_string(),
            });
        }
        if !run.paused {
            return Err(ValidationError::Unsupported {
                feature: "run.manual_angle_rad".to_string(),
                reason: "a manual angle only applies while paused".to_string(),
            });
        }
    }

    let mut last_time = f64::NEG_INFINITY;
    for point in &run.rpm_schedule {
        validate_rpm("run.rpm_schedule.rpm", point.rpm)?;
        if !point.time_s.is_finite() || point.time_s <= last_time {
            return Err(ValidationError::InvalidValue {
                field: "run.rpm_schedule.time_s".to_string(),
                value: point.time_s.to_string(),
                reason: "times must be finite and strictly increasing".to_string(),
            });
        }
        last_time = point.time_s;
    }
    Ok(())
}

fn validate_rpm(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=MAX_RPM).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("must be in [0, {MAX_RPM}]"),
        });
    }
    Ok(())
}

fn validate_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

fn validate_positive_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn validate_non_negative_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}
