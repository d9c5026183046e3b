//! Frame-driven engine simulation for cyclesim.
//!
//! Provides:
//! - Per-engine steppers owning the angle (and stator temperature) accumulators
//! - Crossplane V8 derived from a single master angle
//! - Tagged `Engine`/`Snapshot` variants with common accessors
//! - Engine switching and reinitialization
//! - Headless fixed-step runner with decimated recording

pub mod engine;
pub mod error;
pub mod motor;
pub mod run;
pub mod simulator;
pub mod stepper;
pub mod v8;

// Re-exports for public API
pub use engine::{Engine, EngineConfig, EngineKind, Snapshot};
pub use error::{SimError, SimResult};
pub use motor::{MotorSnapshot, MotorStepper};
pub use run::{RpmPoint, RpmSchedule, RunOptions, RunRecord, run_frames};
pub use simulator::Simulator;
pub use stepper::{
    CycleSnapshot, CycleStepper, PistonSnapshot, PistonStepper, RotarySnapshot, RotaryStepper,
    Stepper,
};
pub use v8::{Bank, CylinderSnapshot, FIRING_ORDER, V8Snapshot, V8Stepper, firing_cylinder};
