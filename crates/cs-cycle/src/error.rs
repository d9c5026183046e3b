//! Error types for engine and motor specifications.

use cs_core::error::CsError;
use thiserror::Error;

/// Errors raised while building a model from non-physical parameters.
///
/// The per-frame evaluation itself is total and never fails; only spec
/// construction is checked.
#[derive(Error, Debug, Clone)]
pub enum CycleError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type CycleResult<T> = Result<T, CycleError>;

impl From<CycleError> for CsError {
    fn from(e: CycleError) -> Self {
        match e {
            CycleError::NonPhysical { what } => CsError::InvalidArg { what },
            CycleError::InvalidArg { what } => CsError::InvalidArg { what },
        }
    }
}
