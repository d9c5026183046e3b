//! Stroke phase classification.
//!
//! A cycle window is split into four equal, half-open quarters in firing
//! order. The four-stroke window (4π) yields one quarter per crank half-turn;
//! the rotary window (6π) yields quarters of 1.5π shaft radians.

use cs_core::numeric::Real;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Thermodynamic stroke of the tracked cylinder or rotor face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrokePhase {
    Intake,
    Compression,
    Power,
    Exhaust,
}

impl StrokePhase {
    /// All phases in firing order.
    pub const ALL: [StrokePhase; 4] = [
        StrokePhase::Intake,
        StrokePhase::Compression,
        StrokePhase::Power,
        StrokePhase::Exhaust,
    ];

    /// Zero-based position in firing order.
    pub fn index(self) -> usize {
        match self {
            StrokePhase::Intake => 0,
            StrokePhase::Compression => 1,
            StrokePhase::Power => 2,
            StrokePhase::Exhaust => 3,
        }
    }

    /// Phases during which the working volume grows.
    pub fn is_expanding(self) -> bool {
        matches!(self, StrokePhase::Intake | StrokePhase::Power)
    }
}

impl fmt::Display for StrokePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrokePhase::Intake => "Intake",
            StrokePhase::Compression => "Compression",
            StrokePhase::Power => "Power",
            StrokePhase::Exhaust => "Exhaust",
        };
        f.write_str(name)
    }
}

/// Phase plus the fraction `[0, 1)` already travelled through it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhasePosition {
    pub phase: StrokePhase,
    pub progress: Real,
}

/// Classify a normalized angle in `[0, cycle_length)`.
pub fn classify(angle: Real, cycle_length: Real) -> StrokePhase {
    locate(angle, cycle_length).phase
}

/// Classify a normalized angle and report progress through the phase.
///
/// Angles outside the window are clamped onto its first or last phase.
pub fn locate(angle: Real, cycle_length: Real) -> PhasePosition {
    let quarter = cycle_length / 4.0;
    let (phase, start) = if angle < quarter {
        (StrokePhase::Intake, 0.0)
    } else if angle < quarter * 2.0 {
        (StrokePhase::Compression, quarter)
    } else if angle < quarter * 3.0 {
        (StrokePhase::Power, quarter * 2.0)
    } else {
        (StrokePhase::Exhaust, quarter * 3.0)
    };
    let progress = ((angle - start) / quarter).clamp(0.0, 1.0);
    PhasePosition { phase, progress }
}
