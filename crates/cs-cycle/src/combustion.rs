//! Wiebe heat-release model.

use cs_core::numeric::Real;
use std::f64::consts::PI;

/// Single Wiebe function `x_b = 1 − exp(−a·((θ − θ₀)/Δθ)^m)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wiebe {
    /// Crank angle of ignition (rad, in the four-stroke window)
    pub start: Real,
    /// Burn duration (rad)
    pub duration: Real,
    /// Efficiency parameter `a`
    pub efficiency: Real,
    /// Form factor `m`
    pub exponent: Real,
}

impl Default for Wiebe {
    /// Spark 20° before the compression TDC, 60° burn.
    fn default() -> Self {
        Self {
            start: 2.0 * PI - 20f64.to_radians(),
            duration: 60f64.to_radians(),
            efficiency: 5.0,
            exponent: 3.0,
        }
    }
}

impl Wiebe {
    /// Burned mass fraction at `theta`: 0 before the burn, 1 after it.
    pub fn burned_fraction(&self, theta: Real) -> Real {
        if theta < self.start {
            return 0.0;
        }
        if theta > self.start + self.duration {
            return 1.0;
        }
        let x = (theta - self.start) / self.duration;
        1.0 - (-self.efficiency * x.powf(self.exponent)).exp()
    }

    /// End of the burn window.
    pub fn end(&self) -> Real {
        self.start + self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_window() {
        let w = Wiebe::default();
        assert_eq!(w.burned_fraction(w.start - 0.1), 0.0);
        assert_eq!(w.burned_fraction(w.end() + 0.1), 1.0);
    }

    #[test]
    fn inside_window_rises() {
        let w = Wiebe::default();
        assert_eq!(w.burned_fraction(w.start), 0.0);
        let mid = w.burned_fraction(w.start + 0.5 * w.duration);
        // 1 - exp(-5/8)
        assert!((mid - 0.464_738).abs() < 1e-6);
        let end = w.burned_fraction(w.end());
        assert!((end - (1.0 - (-5.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn power_stroke_start_is_mid_burn() {
        let w = Wiebe::default();
        // TDC sits a third of the way into the burn
        let at_tdc = w.burned_fraction(2.0 * PI);
        assert!(at_tdc > 0.1 && at_tdc < 0.2);
    }
}
