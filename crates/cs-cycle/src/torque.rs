//! Instantaneous crank torque of one piston cylinder.

use crate::kinematics::SliderCrank;
use crate::phase::StrokePhase;
use crate::spec::EngineSpec;
use cs_core::numeric::{Real, rpm_to_rad_per_s};

/// Lumped friction and pumping drag on the non-working strokes (N·m).
pub const PUMPING_DRAG_NM: Real = 5.0;

/// Net gas load on the piston crown, `(P − P_atm)·A` (N).
pub fn gas_force(spec: &EngineSpec, pressure_pa: Real, p_atm_pa: Real) -> Real {
    (pressure_pa - p_atm_pa) * spec.piston_area()
}

/// Reciprocating inertia force `−m·r·ω²·(cosθ + λ·cos2θ)` (N).
pub fn inertia_force(spec: &EngineSpec, theta: Real, rpm: Real) -> Real {
    let omega = rpm_to_rad_per_s(rpm);
    let lambda = spec.rod_ratio();
    -spec.reciprocating_mass.value
        * spec.crank_radius()
        * omega
        * omega
        * (theta.cos() + lambda * (2.0 * theta).cos())
}

/// Effective lever arm `r·(sinθ + λ·sinθ·cosθ / cosβ)` (m).
pub fn lever_arm(spec: &EngineSpec, theta: Real) -> Real {
    let crank = SliderCrank::physical(spec);
    let (_, cos_beta) = crank.obliquity(theta);
    let sin_t = theta.sin();
    crank.crank_radius * (sin_t + crank.ratio() * sin_t * theta.cos() / cos_beta.max(1e-9))
}

/// Crank torque from gas and inertia loads, less pumping drag on the
/// compression and exhaust strokes (N·m).
pub fn crank_torque(
    spec: &EngineSpec,
    phase: StrokePhase,
    theta: Real,
    rpm: Real,
    pressure_pa: Real,
    p_atm_pa: Real,
) -> Real {
    let force = gas_force(spec, pressure_pa, p_atm_pa) + inertia_force(spec, theta, rpm);
    let mut torque = force * lever_arm(spec, theta);
    if matches!(phase, StrokePhase::Compression | StrokePhase::Exhaust) {
        torque -= PUMPING_DRAG_NM;
    }
    torque
}
