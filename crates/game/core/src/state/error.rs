//! Bot registry errors.
//!
//! Errors related to bot bookkeeping: lookups by id, level membership and
//! inserting bots restored from content.

use crate::error::{ErrorSeverity, GameError};
use crate::geometry::LevelId;
use crate::state::BotId;

/// Errors that occur during bot registry operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegistryError {
    /// No bot with this id is registered (or it is not in the expected list).
    #[error("Bot {id} is not registered")]
    UnknownBot {
        /// The id that was looked up.
        id: BotId,
    },

    /// The bot's level is not part of the ship.
    #[error("Bot {id} is placed on unknown level {level}")]
    UnknownLevel {
        /// The bot being placed.
        id: BotId,
        /// The missing level.
        level: LevelId,
    },

    /// A bot with this id already exists.
    #[error("Bot {id} is already registered")]
    DuplicateBot {
        /// The conflicting id.
        id: BotId,
    },
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use RegistryError::*;
        match self {
            UnknownBot { .. } => "REGISTRY_UNKNOWN_BOT",
            UnknownLevel { .. } => "REGISTRY_UNKNOWN_LEVEL",
            DuplicateBot { .. } => "REGISTRY_DUPLICATE_BOT",
        }
    }
}
