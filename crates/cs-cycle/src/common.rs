//! Common utilities for cycle calculations.

use crate::error::{CycleError, CycleResult};
use cs_core::numeric::ensure_finite;

/// Conversion factor from Pa to bar.
pub const PA_PER_BAR: f64 = 100_000.0;

/// Conversion factor from m³ to cc.
pub const CC_PER_M3: f64 = 1e6;

/// Ensure a spec parameter is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> CycleResult<()> {
    ensure_finite(value, what).map_err(|_| CycleError::NonPhysical { what })?;
    if value <= 0.0 {
        return Err(CycleError::InvalidArg { what });
    }
    Ok(())
}

/// Ensure a spec parameter is finite and lies in `(0, 1]`.
pub fn check_fraction(value: f64, what: &'static str) -> CycleResult<()> {
    check_positive(value, what)?;
    if value > 1.0 {
        return Err(CycleError::InvalidArg { what });
    }
    Ok(())
}

/// `sqrt` with the argument clamped at zero.
///
/// Round-off near the mechanical limit of a linkage can push the radicand a
/// hair below zero.
#[inline]
pub fn sqrt_clamped(x: f64) -> f64 {
    x.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_positive() {
        assert!(check_positive(1.0, "test").is_ok());
        assert!(check_positive(0.0, "test").is_err());
        assert!(check_positive(-1.0, "test").is_err());
        assert!(check_positive(f64::INFINITY, "test").is_err());
        assert!(check_positive(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_check_fraction() {
        assert!(check_fraction(0.9, "eta").is_ok());
        assert!(check_fraction(1.0, "eta").is_ok());
        assert!(check_fraction(1.01, "eta").is_err());
        assert!(check_fraction(0.0, "eta").is_err());
    }

    #[test]
    fn test_sqrt_clamped() {
        assert_eq!(sqrt_clamped(-1e-17), 0.0);
        assert_eq!(sqrt_clamped(4.0), 2.0);
    }
}
