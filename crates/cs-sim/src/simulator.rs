//! Owner of the active engine.
//!
//! Holds the configuration for every engine type but only ever one live
//! stepper. Switching type drops the old stepper and its accumulators.

use crate::engine::{Engine, EngineConfig, EngineKind, Snapshot};
use cs_core::angle::FrameInput;
use tracing::{debug, info, trace};

#[derive(Clone, Debug)]
pub struct Simulator {
    config: EngineConfig,
    engine: Engine,
    frames: u64,
}

impl Simulator {
    pub fn new(kind: EngineKind, config: EngineConfig) -> Self {
        info!(engine = %kind, "activating engine");
        let engine = Engine::build(kind, &config);
        Self {
            config,
            engine,
            frames: 0,
        }
    }

    pub fn kind(&self) -> EngineKind {
        self.engine.kind()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Frames advanced since the engine was activated or reinitialized.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Select an engine type. A different type starts from fresh
    /// accumulators; the current type is left untouched.
    pub fn switch_to(&mut self, kind: EngineKind) {
        if kind == self.engine.kind() {
            debug!(engine = %kind, "engine already active");
            return;
        }
        info!(from = %self.engine.kind(), to = %kind, "switching engine");
        self.engine = Engine::build(kind, &self.config);
        self.frames = 0;
    }

    /// Explicit reinitialization: angle to zero, stator back to ambient.
    pub fn reinitialize(&mut self) {
        debug!(engine = %self.engine.kind(), "reinitializing accumulators");
        self.engine.reset();
        self.frames = 0;
    }

    pub fn advance(&mut self, input: &FrameInput) -> Snapshot {
        let snapshot = self.engine.advance(input);
        self.frames += 1;
        trace!(
            frame = self.frames,
            angle = snapshot.angle(),
            torque = snapshot.torque(),
            "frame"
        );
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_resets_accumulators() {
        let mut sim = Simulator::new(EngineKind::Piston, EngineConfig::default());
        for _ in 0..5 {
            sim.advance(&FrameInput::running(3000.0, 0.016));
        }
        assert!(sim.engine().raw_angle() > 0.0);

        sim.switch_to(EngineKind::Rotary);
        assert_eq!(sim.kind(), EngineKind::Rotary);
        assert_eq!(sim.engine().raw_angle(), 0.0);
        assert_eq!(sim.frames(), 0);

        // Back to piston starts from zero too
        sim.advance(&FrameInput::running(3000.0, 0.016));
        sim.switch_to(EngineKind::Piston);
        assert_eq!(sim.engine().raw_angle(), 0.0);
    }

    #[test]
    fn switching_to_active_kind_keeps_state() {
        let mut sim = Simulator::new(EngineKind::Electric, EngineConfig::default());
        sim.advance(&FrameInput::running(1000.0, 0.5));
        let before = sim.engine().raw_angle();
        sim.switch_to(EngineKind::Electric);
        assert_eq!(sim.engine().raw_angle(), before);
        assert_eq!(sim.frames(), 1);
    }

    #[test]
    fn reinitialize_restores_ambient_stator() {
        let mut sim = Simulator::new(EngineKind::Electric, EngineConfig::default());
        for _ in 0..20 {
            sim.advance(&FrameInput::running(1000.0, 1.0));
        }
        sim.reinitialize();
        let Engine::Electric(motor) = sim.engine() else {
            panic!("expected the electric stepper");
        };
        assert_eq!(motor.temperature_c(), 25.0);
        assert_eq!(sim.engine().raw_angle(), 0.0);
    }
}
