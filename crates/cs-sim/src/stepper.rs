//! Per-engine steppers.
//!
//! A stepper owns the angle accumulator of one engine and runs the frame
//! pipeline: integrate angle, normalize into the model's window, evaluate
//! the model, return an immutable snapshot.

use cs_core::angle::{AngleIntegrator, FrameInput};
use cs_core::numeric::Real;
use cs_cycle::{CycleModel, OttoModel, OttoState, WankelModel, WankelState};
use serde::Serialize;

/// Owned per-frame state machine of one engine.
pub trait Stepper {
    /// Snapshot type produced each frame.
    type Snapshot: Clone;

    /// Advance one frame and return the resulting snapshot.
    fn advance(&mut self, input: &FrameInput) -> Self::Snapshot;

    /// Return every accumulator to its initial value.
    fn reset(&mut self);

    /// Raw accumulated shaft angle (rad).
    fn raw_angle(&self) -> Real;
}

/// Normalized cycle angle plus the model's gas state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CycleSnapshot<S> {
    /// Shaft angle normalized into the model's window (rad)
    pub angle: Real,
    #[serde(flatten)]
    pub state: S,
}

/// Stepper for any stateless [`CycleModel`].
#[derive(Clone, Debug)]
pub struct CycleStepper<M> {
    model: M,
    angle: AngleIntegrator,
}

impl<M: CycleModel> CycleStepper<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            angle: AngleIntegrator::new(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: CycleModel> Stepper for CycleStepper<M> {
    type Snapshot = CycleSnapshot<M::State>;

    fn advance(&mut self, input: &FrameInput) -> Self::Snapshot {
        let raw = self.angle.advance(input);
        let angle = self.model.window().normalize(raw);
        CycleSnapshot {
            angle,
            state: self.model.evaluate(angle, input.rpm),
        }
    }

    fn reset(&mut self) {
        self.angle.reset();
    }

    fn raw_angle(&self) -> Real {
        self.angle.raw()
    }
}

pub type PistonStepper = CycleStepper<OttoModel>;
pub type RotaryStepper = CycleStepper<WankelModel>;
pub type PistonSnapshot = CycleSnapshot<OttoState>;
pub type RotarySnapshot = CycleSnapshot<WankelState>;

#[cfg(test)]
mod tests {
    use super::*;
    use cs_cycle::StrokePhase;
    use std::f64::consts::PI;

    #[test]
    fn piston_angle_wraps_into_four_stroke_window() {
        let mut stepper = PistonStepper::new(OttoModel::default());
        // 6000 rpm for 0.25 s is 25 revolutions
        for _ in 0..24 {
            stepper.advance(&FrameInput::running(6000.0, 0.01));
        }
        let snap = stepper.advance(&FrameInput::running(6000.0, 0.01));
        assert!(snap.angle >= 0.0 && snap.angle < 4.0 * PI);
        assert!((stepper.raw_angle() - 50.0 * PI).abs() < 1e-9);
        // 25 turns leaves the crank one revolution into the cycle
        assert!((snap.angle - 2.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn rotary_reports_rotor_at_a_third() {
        let mut stepper = RotaryStepper::new(WankelModel::default());
        let snap = stepper.advance(&FrameInput::paused(0.0, Some(5.0 * PI), 0.016));
        assert!((snap.angle - 5.0 * PI).abs() < 1e-12);
        assert!((snap.state.rotor_angle - 5.0 * PI / 3.0).abs() < 1e-12);
        assert_eq!(snap.state.phase, StrokePhase::Exhaust);
    }

    #[test]
    fn manual_scrub_overrides_history() {
        let mut stepper = PistonStepper::new(OttoModel::default());
        for _ in 0..10 {
            stepper.advance(&FrameInput::running(3000.0, 0.016));
        }
        let snap = stepper.advance(&FrameInput::paused(3000.0, Some(1.5), 0.016));
        assert_eq!(snap.angle, 1.5);
        assert_eq!(snap.state.phase, StrokePhase::Intake);
    }

    #[test]
    fn reset_zeroes_angle() {
        let mut stepper = PistonStepper::new(OttoModel::default());
        stepper.advance(&FrameInput::running(3000.0, 0.5));
        stepper.reset();
        assert_eq!(stepper.raw_angle(), 0.0);
    }
}
