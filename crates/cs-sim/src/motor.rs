//! Electric motor stepper: angle plus stator temperature accumulators.

use crate::stepper::Stepper;
use cs_core::angle::{AngleIntegrator, CycleWindow, FrameInput};
use cs_core::numeric::Real;
use cs_cycle::{MotorModel, MotorState};
use serde::Serialize;

/// Mechanical angle in `[0, 2π)` plus the motor state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MotorSnapshot {
    pub angle: Real,
    #[serde(flatten)]
    pub state: MotorState,
}

/// PMSM stepper.
///
/// The stator temperature integrates every frame, paused or not, so a
/// stalled motor under current keeps heating.
#[derive(Clone, Debug)]
pub struct MotorStepper {
    model: MotorModel,
    angle: AngleIntegrator,
    temperature_c: Real,
}

impl MotorStepper {
    pub fn new(model: MotorModel) -> Self {
        let temperature_c = model.ambient_c();
        Self {
            model,
            angle: AngleIntegrator::new(),
            temperature_c,
        }
    }

    pub fn model(&self) -> &MotorModel {
        &self.model
    }

    /// Stator temperature carried into the next frame (°C).
    pub fn temperature_c(&self) -> Real {
        self.temperature_c
    }
}

impl Stepper for MotorStepper {
    type Snapshot = MotorSnapshot;

    fn advance(&mut self, input: &FrameInput) -> MotorSnapshot {
        let raw = self.angle.advance(input);
        let angle = CycleWindow::Revolution.normalize(raw);
        let state = self
            .model
            .evaluate(angle, input.rpm, self.temperature_c, input.dt);
        self.temperature_c = state.temperature_c;
        MotorSnapshot { angle, state }
    }

    fn reset(&mut self) {
        self.angle.reset();
        self.temperature_c = self.model.ambient_c();
    }

    fn raw_angle(&self) -> Real {
        self.angle.raw()
    }
}
