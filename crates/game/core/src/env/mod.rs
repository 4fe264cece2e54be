//! Traits describing read-only world data and external services.
//!
//! Oracles expose obstacle and droid type tables, the pathfinder and the
//! faction predicate. The [`Env`] aggregate bundles them so the engine can
//! access everything it needs without hard coupling to concrete
//! implementations.
mod droids;
mod error;
mod faction;
mod obstacles;
mod pathfinder;
mod rng;

pub use droids::{
    AnimationCycle, AnimationSet, BotPart, DroidOracle, DroidSpec, DroidSpecTable, DroidType,
    Sensor, WeaponSpec,
};
pub use error::OracleError;
pub use faction::{Faction, FactionOracle, SameSideFactions};
pub use obstacles::{
    BlockArea, ObstacleFlags, ObstacleKind, ObstacleOracle, ObstacleSpec, ObstacleSpecTable,
};
pub use pathfinder::{
    PathError, PathPoints, PathRequest, Pathfinder, StraightLinePathfinder, TileGridPathfinder,
};
pub use rng::{PcgRng, RngOracle, SequenceRng};

/// Aggregates the read-only oracles required by the frame step.
#[derive(Clone, Copy, Default)]
pub struct Env<'a> {
    obstacles: Option<&'a dyn ObstacleOracle>,
    droids: Option<&'a dyn DroidOracle>,
    pathfinder: Option<&'a dyn Pathfinder>,
    factions: Option<&'a dyn FactionOracle>,
}

impl<'a> Env<'a> {
    pub fn new(
        obstacles: Option<&'a dyn ObstacleOracle>,
        droids: Option<&'a dyn DroidOracle>,
        pathfinder: Option<&'a dyn Pathfinder>,
        factions: Option<&'a dyn FactionOracle>,
    ) -> Self {
        Self {
            obstacles,
            droids,
            pathfinder,
            factions,
        }
    }

    pub fn with_all(
        obstacles: &'a dyn ObstacleOracle,
        droids: &'a dyn DroidOracle,
        pathfinder: &'a dyn Pathfinder,
        factions: &'a dyn FactionOracle,
    ) -> Self {
        Self::new(
            Some(obstacles),
            Some(droids),
            Some(pathfinder),
            Some(factions),
        )
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the ObstacleOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::ObstaclesNotAvailable` if no obstacle oracle was provided.
    pub fn obstacles(&self) -> Result<&'a dyn ObstacleOracle, OracleError> {
        self.obstacles.ok_or(OracleError::ObstaclesNotAvailable)
    }

    /// Returns the DroidOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::DroidsNotAvailable` if no droid oracle was provided.
    pub fn droids(&self) -> Result<&'a dyn DroidOracle, OracleError> {
        self.droids.ok_or(OracleError::DroidsNotAvailable)
    }

    /// Returns the Pathfinder, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::PathfinderNotAvailable` if no pathfinder was provided.
    pub fn pathfinder(&self) -> Result<&'a dyn Pathfinder, OracleError> {
        self.pathfinder.ok_or(OracleError::PathfinderNotAvailable)
    }

    /// Returns the FactionOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::FactionsNotAvailable` if no faction oracle was provided.
    pub fn factions(&self) -> Result<&'a dyn FactionOracle, OracleError> {
        self.factions.ok_or(OracleError::FactionsNotAvailable)
    }

    /// Resolves every oracle at once.
    ///
    /// # Errors
    ///
    /// Returns the error of the first missing oracle.
    pub fn oracles(&self) -> Result<Oracles<'a>, OracleError> {
        Ok(Oracles {
            obstacles: self.obstacles()?,
            droids: self.droids()?,
            pathfinder: self.pathfinder()?,
            factions: self.factions()?,
        })
    }
}

/// Fully resolved [`Env`]: every oracle is present.
#[derive(Clone, Copy)]
pub struct Oracles<'a> {
    pub obstacles: &'a dyn ObstacleOracle,
    pub droids: &'a dyn DroidOracle,
    pub pathfinder: &'a dyn Pathfinder,
    pub factions: &'a dyn FactionOracle,
}

impl<'a> Oracles<'a> {
    /// Looks up a droid type.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::UnknownDroidType` if the table has no such entry.
    pub fn droid(&self, kind: DroidType) -> Result<&'a DroidSpec, OracleError> {
        self.droids
            .droid_spec(kind)
            .ok_or(OracleError::UnknownDroidType(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_oracles_are_reported_in_order() {
        let env = Env::empty();
        assert!(matches!(
            env.oracles(),
            Err(OracleError::ObstaclesNotAvailable)
        ));

        let obstacles = ObstacleSpecTable::default();
        let droids = DroidSpecTable::default();
        let env = Env::new(Some(&obstacles), Some(&droids), None, None);
        assert!(matches!(
            env.oracles(),
            Err(OracleError::PathfinderNotAvailable)
        ));
    }

    #[test]
    fn unknown_droid_type_is_validation_error() {
        use crate::error::{ErrorSeverity, GameError};

        let obstacles = ObstacleSpecTable::default();
        let droids = DroidSpecTable::default();
        let env = Env::with_all(&obstacles, &droids, &StraightLinePathfinder, &SameSideFactions);
        let oracles = env.oracles().unwrap();
        let err = oracles.droid(DroidType(3)).unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "ORACLE_UNKNOWN_DROID_TYPE");
    }
}
