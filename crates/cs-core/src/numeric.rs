use crate::{CsError, CsResult};
use std::f64::consts::PI;

/// Scalar type of every physical quantity on the hot path.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> CsResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CsError::NonFinite { what, value: v })
    }
}

/// Shaft speed in rad/s for a speed given in revolutions per minute.
#[inline]
pub fn rpm_to_rad_per_s(rpm: Real) -> Real {
    rpm * 2.0 * PI / 60.0
}
