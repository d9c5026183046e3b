//! Shaft angle integration and cycle-window normalization.
//!
//! Every stepper owns one [`AngleIntegrator`] holding the *raw* accumulated
//! shaft angle. Consumers normalize that raw angle into their own cycle
//! window, so engines with different cycle lengths stay correctly phased
//! from the same accumulator.

use crate::numeric::{Real, rpm_to_rad_per_s};
use std::f64::consts::PI;

/// Canonical cycle windows used to normalize a raw shaft angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleWindow {
    /// Four-stroke piston cycle: two crank revolutions, `[0, 4π)`.
    FourStroke,
    /// One rotary face cycle: three eccentric-shaft revolutions, `[0, 6π)`.
    Rotary,
    /// One mechanical revolution, `[0, 2π)`.
    Revolution,
}

impl CycleWindow {
    /// Window length in radians.
    pub const fn length(self) -> Real {
        match self {
            CycleWindow::FourStroke => 4.0 * PI,
            CycleWindow::Rotary => 6.0 * PI,
            CycleWindow::Revolution => 2.0 * PI,
        }
    }

    /// Normalize a raw angle into this window.
    pub fn normalize(self, angle: Real) -> Real {
        normalize(angle, self.length())
    }
}

/// Floor-modulo of `angle` into `[0, cycle_length)`.
///
/// Negative inputs wrap into the positive window. A result that rounds up to
/// `cycle_length` is folded back to zero so the window stays half-open.
pub fn normalize(angle: Real, cycle_length: Real) -> Real {
    let wrapped = angle.rem_euclid(cycle_length);
    if wrapped >= cycle_length { 0.0 } else { wrapped }
}

/// Highest shaft speed (RPM) any engine is driven at.
///
/// The intake depression term grows with rpm², so speeds beyond this would
/// pull intake pressure toward zero.
pub const MAX_RPM: Real = 10_000.0;

/// Per-frame input supplied to every stepper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Commanded shaft speed (RPM); see [`FrameInput::clamped`].
    pub rpm: Real,
    /// Freeze the accumulator.
    pub paused: bool,
    /// Absolute angle override, honoured only while paused.
    pub manual_angle: Option<Real>,
    /// Elapsed time since the previous frame (seconds).
    pub dt: Real,
}

impl FrameInput {
    /// Free-running input at the given speed.
    pub fn running(rpm: Real, dt: Real) -> Self {
        Self {
            rpm,
            paused: false,
            manual_angle: None,
            dt,
        }
    }

    /// Paused input, optionally scrubbing to `manual_angle`.
    pub fn paused(rpm: Real, manual_angle: Option<Real>, dt: Real) -> Self {
        Self {
            rpm,
            paused: true,
            manual_angle,
            dt,
        }
    }

    /// Copy with the speed held to `[0, MAX_RPM]`; non-finite speeds become zero.
    pub fn clamped(self) -> Self {
        let rpm = if self.rpm.is_finite() {
            self.rpm.clamp(0.0, MAX_RPM)
        } else {
            0.0
        };
        Self { rpm, ..self }
    }
}

/// Raw shaft angle accumulator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AngleIntegrator {
    angle: Real,
}

impl AngleIntegrator {
    pub fn new() -> Self {
        Self { angle: 0.0 }
    }

    /// Start from a given raw angle.
    pub fn with_angle(angle: Real) -> Self {
        Self { angle }
    }

    /// Advance the accumulator for one frame and return the raw angle.
    ///
    /// - paused with a manual angle: the accumulator is set to that angle
    /// - running: `angle += ω·dt` with `ω = rpm·2π/60`
    /// - paused without a manual angle: hold
    pub fn advance(&mut self, input: &FrameInput) -> Real {
        match (input.paused, input.manual_angle) {
            (true, Some(manual)) => self.angle = manual,
            (true, None) => {}
            (false, _) => self.angle += rpm_to_rad_per_s(input.rpm) * input.dt,
        }
        self.angle
    }

    /// Raw (non-normalized) angle.
    pub fn raw(&self) -> Real {
        self.angle
    }

    /// Current angle normalized into `window`.
    pub fn normalized(&self, window: CycleWindow) -> Real {
        window.normalize(self.angle)
    }

    /// Explicit reinitialization back to zero.
    pub fn reset(&mut self) {
        self.angle = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rpm_holds_angle() {
        let mut integ = AngleIntegrator::new();
        let angle = integ.advance(&FrameInput::running(0.0, 1.0));
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn one_frame_at_6000_rpm() {
        let mut integ = AngleIntegrator::new();
        let angle = integ.advance(&FrameInput::running(6000.0, 0.01));
        let expected = 6000.0 * 2.0 * PI / 60.0 * 0.01;
        assert!((angle - expected).abs() < 1e-12);
        assert!((angle - 6.283_185_307).abs() < 1e-8);
    }

    #[test]
    fn manual_override_is_absolute() {
        let mut integ = AngleIntegrator::new();
        for _ in 0..50 {
            integ.advance(&FrameInput::running(4321.0, 0.016));
        }
        let angle = integ.advance(&FrameInput::paused(4321.0, Some(1.5), 0.016));
        assert_eq!(angle, 1.5);
        // Applied every tick while scrubbing
        let angle = integ.advance(&FrameInput::paused(4321.0, Some(1.5), 0.016));
        assert_eq!(angle, 1.5);
    }

    #[test]
    fn paused_without_manual_holds() {
        let mut integ = AngleIntegrator::with_angle(2.0);
        let angle = integ.advance(&FrameInput::paused(3000.0, None, 0.5));
        assert_eq!(angle, 2.0);
    }

    #[test]
    fn manual_angle_ignored_while_running() {
        let mut integ = AngleIntegrator::new();
        let input = FrameInput {
            rpm: 60.0,
            paused: false,
            manual_angle: Some(10.0),
            dt: 0.5,
        };
        let angle = integ.advance(&input);
        assert!((angle - PI).abs() < 1e-12);
    }

    #[test]
    fn clamped_input_never_runs_backwards() {
        let input = FrameInput::running(-500.0, 0.1).clamped();
        assert_eq!(input.rpm, 0.0);
        assert_eq!(FrameInput::running(f64::NAN, 0.1).clamped().rpm, 0.0);
        assert_eq!(FrameInput::running(1200.0, 0.1).clamped().rpm, 1200.0);
    }

    #[test]
    fn clamped_input_caps_speed() {
        assert_eq!(FrameInput::running(60_000.0, 0.1).clamped().rpm, MAX_RPM);
        assert_eq!(FrameInput::running(MAX_RPM, 0.1).clamped().rpm, MAX_RPM);
        let paused = FrameInput::paused(f64::INFINITY, Some(0.5), 0.1).clamped();
        assert_eq!(paused.rpm, 0.0);
        assert_eq!(paused.manual_angle, Some(0.5));
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut integ = AngleIntegrator::with_angle(7.0);
        integ.reset();
        assert_eq!(integ.raw(), 0.0);
    }

    #[test]
    fn negative_angles_wrap_positive() {
        let w = CycleWindow::FourStroke;
        let n = w.normalize(-0.5);
        assert!(n >= 0.0 && n < w.length());
        assert!((n - (4.0 * PI - 0.5)).abs() < 1e-12);
        assert_eq!(w.normalize(-4.0 * PI), 0.0);
    }

    #[test]
    fn tiny_negative_stays_half_open() {
        for window in [
            CycleWindow::FourStroke,
            CycleWindow::Rotary,
            CycleWindow::Revolution,
        ] {
            let n = window.normalize(-1e-18);
            assert!(n < window.length());
        }
    }
}
