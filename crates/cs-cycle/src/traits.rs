//! Shared interface of the stateless cycle models.

use cs_core::angle::CycleWindow;
use cs_core::numeric::Real;

/// A thermodynamic model that is a pure function of cycle angle and speed.
///
/// Implementors hold only immutable configuration, so the same model can be
/// evaluated for any number of cylinders at once.
pub trait CycleModel: Send + Sync {
    /// Gas state reported for one evaluation.
    type State: Clone;

    /// Window the model expects its angle normalized into.
    fn window(&self) -> CycleWindow;

    /// Evaluate the model at a normalized cycle angle.
    fn evaluate(&self, cycle_angle: Real, rpm: Real) -> Self::State;

    /// Normalize a raw shaft angle and evaluate.
    fn evaluate_raw(&self, raw_angle: Real, rpm: Real) -> Self::State {
        self.evaluate(self.window().normalize(raw_angle), rpm)
    }
}
