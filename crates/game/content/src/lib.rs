//! Data-driven content definitions and loaders.
//!
//! This crate turns RON/TOML data files into the tables and world state the
//! simulation consumes:
//! - Obstacle types (RON)
//! - Droid types (RON)
//! - Ship layout and bot placements (RON)
//! - Simulation tuning (TOML)
//!
//! Tables are handed to the engine through its oracles; only the ship and the
//! placed bots become world state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BotPlacement, ConfigLoader, Content, ContentFactory, DroidLoader, LoadResult, ObstacleLoader,
    ShipContent, ShipLoader,
};
