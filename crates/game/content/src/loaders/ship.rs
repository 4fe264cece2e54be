//! Ship layout and bot placement loader.
//!
//! Obstacles and droids are referenced by name and resolved against the
//! already loaded tables, so a ship file never depends on table order.

use std::path::Path;

use droid_core::{
    Bot, BotFlags, DroidSpecTable, DroidType, Faction, Gps, JumpTargets, Level, LevelId,
    ObstacleSpecTable, Point, Ship, Waypoint,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct JumpRon {
    north: Option<u16>,
    south: Option<u16>,
    east: Option<u16>,
    west: Option<u16>,
}

impl From<JumpRon> for JumpTargets {
    fn from(jump: JumpRon) -> Self {
        JumpTargets {
            north: jump.north.map(LevelId),
            south: jump.south.map(LevelId),
            east: jump.east.map(LevelId),
            west: jump.west.map(LevelId),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObstacleRon {
    kind: String,
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WaypointRon {
    x: i32,
    y: i32,
    #[serde(default)]
    connections: Vec<usize>,
    #[serde(default)]
    suppress_random_spawn: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelRon {
    xlen: i32,
    ylen: i32,
    #[serde(default)]
    jump: JumpRon,
    #[serde(default)]
    obstacles: Vec<ObstacleRon>,
    #[serde(default)]
    waypoints: Vec<WaypointRon>,
}

/// A bot as written in a ship file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotPlacement {
    pub droid: String,
    pub level: u16,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub faction: Faction,
    #[serde(default)]
    pub flags: BotFlags,
    #[serde(default)]
    pub marker: i32,
    /// Home waypoint index on the bot's level.
    #[serde(default)]
    pub home: Option<usize>,
    #[serde(default)]
    pub max_distance_to_home: f32,
    #[serde(default)]
    pub on_death_drop: Option<u32>,
    #[serde(default)]
    pub dialog_section: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ShipRon {
    levels: Vec<LevelRon>,
    #[serde(default)]
    bots: Vec<BotPlacement>,
}

/// A loaded ship plus the bots to spawn on it.
pub struct ShipContent {
    pub ship: Ship,
    /// Unspawned bots; ids, energy and ammo are assigned when spawned.
    pub bots: Vec<Bot>,
}

/// Loader for ship layouts from RON files.
pub struct ShipLoader;

impl ShipLoader {
    pub fn load(
        path: &Path,
        obstacles: &ObstacleSpecTable,
        droids: &DroidSpecTable,
    ) -> LoadResult<ShipContent> {
        let content = read_file(path)?;
        Self::parse(&content, obstacles, droids)
    }

    pub fn parse(
        content: &str,
        obstacles: &ObstacleSpecTable,
        droids: &DroidSpecTable,
    ) -> LoadResult<ShipContent> {
        let data: ShipRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ship RON: {}", e))?;

        let mut levels = Vec::with_capacity(data.levels.len());
        for (index, level) in data.levels.into_iter().enumerate() {
            levels.push(build_level(LevelId(index as u16), level, obstacles)?);
        }
        let ship = Ship::new(levels).map_err(|e| anyhow::anyhow!("Invalid ship layout: {}", e))?;

        let bots = data
            .bots
            .into_iter()
            .map(|placement| build_bot(&ship, placement, droids))
            .collect::<LoadResult<Vec<_>>>()?;
        Ok(ShipContent { ship, bots })
    }
}

fn build_level(id: LevelId, data: LevelRon, obstacles: &ObstacleSpecTable) -> LoadResult<Level> {
    if data.xlen <= 0 || data.ylen <= 0 {
        anyhow::bail!("level {} has non-positive size {}x{}", id, data.xlen, data.ylen);
    }
    let mut level = Level::new(id, data.xlen, data.ylen).with_jump_targets(data.jump.into());

    for obstacle in data.obstacles {
        let kind = obstacles
            .find(&obstacle.kind)
            .ok_or_else(|| anyhow::anyhow!("level {}: unknown obstacle '{}'", id, obstacle.kind))?;
        level
            .add_obstacle(obstacles, kind, Point::new(obstacle.x, obstacle.y))
            .map_err(|e| anyhow::anyhow!("level {}: {}", id, e))?;
    }

    let count = data.waypoints.len();
    for (index, waypoint) in data.waypoints.into_iter().enumerate() {
        if let Some(&bad) = waypoint.connections.iter().find(|&&c| c >= count) {
            anyhow::bail!("level {}: waypoint {} connects to missing waypoint {}", id, index, bad);
        }
        level.add_waypoint(Waypoint {
            x: waypoint.x,
            y: waypoint.y,
            connections: waypoint.connections,
            suppress_random_spawn: waypoint.suppress_random_spawn,
        });
    }
    Ok(level)
}

fn build_bot(ship: &Ship, placement: BotPlacement, droids: &DroidSpecTable) -> LoadResult<Bot> {
    let kind: DroidType = droids
        .find(&placement.droid)
        .ok_or_else(|| anyhow::anyhow!("unknown droid '{}'", placement.droid))?;
    let z = LevelId(placement.level);
    let level = ship
        .level(z)
        .ok_or_else(|| anyhow::anyhow!("droid '{}' placed on missing level {}", placement.droid, z))?;
    let pos = Point::new(placement.x, placement.y);
    if !level.contains(pos) {
        anyhow::bail!("droid '{}' placed outside level {}", placement.droid, z);
    }

    let mut bot = Bot::new(kind, Gps::new(pos.x, pos.y, z))
        .with_faction(placement.faction)
        .with_flags(placement.flags)
        .with_marker(placement.marker);
    if let Some(home) = placement.home {
        if level.waypoint(home).is_none() {
            anyhow::bail!("droid '{}' has missing home waypoint {}", placement.droid, home);
        }
        bot = bot.with_home(home, placement.max_distance_to_home);
    }
    bot.on_death_drop = placement.on_death_drop;
    bot.dialog_section = placement.dialog_section;
    tracing::debug!(droid = %placement.droid, level = %z, "bot placement loaded");
    Ok(bot)
}
