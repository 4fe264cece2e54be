//! Frame step errors.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::RegistryError;

/// Errors that abort a frame step.
///
/// Everything a single bot can get wrong is handled in place; only missing
/// oracles and bookkeeping failures reach the caller.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error("environment incomplete: {0}")]
    Oracle(#[from] OracleError),

    #[error("bot registry out of sync: {0}")]
    Registry(#[from] RegistryError),

    /// The frame length is negative or not a number.
    #[error("invalid frame length {0}")]
    InvalidFrame(f32),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::Oracle(err) => err.severity(),
            EngineError::Registry(_) => ErrorSeverity::Internal,
            EngineError::InvalidFrame(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::Oracle(err) => err.error_code(),
            EngineError::Registry(err) => err.error_code(),
            EngineError::InvalidFrame(_) => "ENGINE_INVALID_FRAME",
        }
    }
}
