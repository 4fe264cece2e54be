//! Deterministic, frame-stepped droid simulation.
//!
//! `droid-core` holds the collision queries over a ship of tiled levels and
//! the behaviour of the bots living on it: target acquisition, the combat
//! state machine, movement along waypoint graphs and the damage pipeline.
//! All world mutation flows through [`engine::SimEngine`]; content tables
//! and services reach the simulation through the oracles in [`env`].
pub mod ai;
pub mod colldet;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod geometry;
pub mod map;
pub mod state;

pub use colldet::{CharacterProximity, CollisionFilter, CollisionMap, FilterKind};
pub use config::SimConfig;
pub use engine::{EngineError, SimEngine};
pub use env::{
    BlockArea, DroidOracle, DroidSpec, DroidSpecTable, DroidType, Env, Faction, FactionOracle,
    ObstacleFlags, ObstacleKind, ObstacleOracle, ObstacleSpec, ObstacleSpecTable, OracleError,
    PathError, Pathfinder, PcgRng, RngOracle, SameSideFactions, Sensor, TileGridPathfinder,
    WeaponSpec,
};
pub use error::{ErrorSeverity, GameError, inform_developers};
pub use events::{EventSink, ItemDrop, Killer, NullSink, SimEvent, SoundKind};
pub use geometry::{Gps, LevelId, Point, Rect};
pub use map::{JumpTargets, Level, Obstacle, Ship, ShipError, Waypoint};
pub use state::{
    AttackTarget, Bot, BotFlags, BotHandle, BotId, BotRegistry, CombatState, Player,
    RegistryError, World,
};
