//! cs-core: stable foundation for cyclesim.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real, finiteness check, speed conversion)
//! - angle (shaft angle integration and cycle-window normalization)
//! - error (shared error types)

pub mod angle;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use angle::{AngleIntegrator, CycleWindow, FrameInput, MAX_RPM, normalize};
pub use error::{CsError, CsResult};
pub use numeric::*;
pub use units::*;
