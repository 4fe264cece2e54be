//! Oracle access errors.
//!
//! Errors related to oracle availability and data access.

use crate::env::DroidType;
use crate::error::{ErrorSeverity, GameError};
use crate::geometry::LevelId;

/// Errors that occur when accessing Oracle data.
///
/// A missing oracle means the frame step cannot run at all; an unknown
/// reference means the world state points at data the tables do not have.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// ObstacleOracle is not available in the environment.
    #[error("ObstacleOracle not available")]
    ObstaclesNotAvailable,

    /// DroidOracle is not available in the environment.
    #[error("DroidOracle not available")]
    DroidsNotAvailable,

    /// Pathfinder is not available in the environment.
    #[error("Pathfinder not available")]
    PathfinderNotAvailable,

    /// FactionOracle is not available in the environment.
    #[error("FactionOracle not available")]
    FactionsNotAvailable,

    /// Droid type has no entry in the droid table.
    #[error("droid type {0:?} not found")]
    UnknownDroidType(DroidType),

    /// Level is not part of the ship.
    #[error("level {0} not found")]
    UnknownLevel(LevelId),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            // Missing oracles are fatal - engine cannot proceed
            ObstaclesNotAvailable
            | DroidsNotAvailable
            | PathfinderNotAvailable
            | FactionsNotAvailable => ErrorSeverity::Fatal,

            UnknownDroidType(_) | UnknownLevel(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ObstaclesNotAvailable => "ORACLE_OBSTACLES_NOT_AVAILABLE",
            DroidsNotAvailable => "ORACLE_DROIDS_NOT_AVAILABLE",
            PathfinderNotAvailable => "ORACLE_PATHFINDER_NOT_AVAILABLE",
            FactionsNotAvailable => "ORACLE_FACTIONS_NOT_AVAILABLE",
            UnknownDroidType(_) => "ORACLE_UNKNOWN_DROID_TYPE",
            UnknownLevel(_) => "ORACLE_UNKNOWN_LEVEL",
        }
    }
}
