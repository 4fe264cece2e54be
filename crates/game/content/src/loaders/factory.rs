//! Content factory for building the simulation from a data directory.

use std::path::{Path, PathBuf};

use droid_core::{
    Bot, DroidOracle, DroidSpecTable, LevelId, ObstacleSpecTable, Player, Point, RngOracle, Ship,
    SimConfig, Waypoint, World,
};

use crate::loaders::{ConfigLoader, DroidLoader, LoadResult, ObstacleLoader, ShipLoader};

/// Everything loaded from one content directory.
pub struct Content {
    pub config: SimConfig,
    pub obstacles: ObstacleSpecTable,
    pub droids: DroidSpecTable,
    pub ship: Ship,
    pub bots: Vec<Bot>,
}

impl Content {
    /// Spawns the placed bots onto the ship and hands both to a new world.
    ///
    /// The player starts on the first waypoint of level 0, or the level's
    /// centre if it has none.
    pub fn into_world(self, rng: impl RngOracle + 'static) -> LoadResult<World> {
        let start = self
            .ship
            .level(LevelId(0))
            .map(|level| {
                level.waypoints.first().map_or_else(
                    || Point::new(level.xlen as f32 / 2.0, level.ylen as f32 / 2.0),
                    Waypoint::center,
                )
            })
            .ok_or_else(|| anyhow::anyhow!("ship has no level 0"))?;
        let player = Player::new(start.with_level(LevelId(0)));

        let mut world = World::new(self.ship, player, rng);
        for bot in self.bots {
            let spec = self
                .droids
                .droid_spec(bot.kind)
                .ok_or_else(|| anyhow::anyhow!("bot refers to unknown droid type {:?}", bot.kind))?;
            world
                .bots
                .spawn(&world.ship, spec, bot, &mut *world.rng)
                .map_err(|e| anyhow::anyhow!("Failed to spawn bot: {}", e))?;
        }
        tracing::info!(bots = world.bots.len(), levels = world.ship.len(), "world built");
        Ok(world)
    }
}

/// Content factory that loads all simulation content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── sim.toml        (optional)
/// ├── obstacles.ron
/// ├── droids.ron
/// └── ship.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load simulation tuning from `sim.toml`, or the defaults without one.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        let path = self.data_dir.join("sim.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no sim.toml, using defaults");
            return Ok(SimConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load obstacle types from `obstacles.ron`.
    pub fn load_obstacles(&self) -> LoadResult<ObstacleSpecTable> {
        ObstacleLoader::load(&self.data_dir.join("obstacles.ron"))
    }

    /// Load droid types from `droids.ron`.
    pub fn load_droids(&self) -> LoadResult<DroidSpecTable> {
        DroidLoader::load(&self.data_dir.join("droids.ron"))
    }

    /// Load the whole directory.
    pub fn load(&self) -> LoadResult<Content> {
        let config = self.load_config()?;
        let obstacles = self.load_obstacles()?;
        let droids = self.load_droids()?;
        let ship = ShipLoader::load(&self.data_dir.join("ship.ron"), &obstacles, &droids)?;
        Ok(Content {
            config,
            obstacles,
            droids,
            ship: ship.ship,
            bots: ship.bots,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
