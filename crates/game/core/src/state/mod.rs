//! Mutable simulation state.
//!
//! Bots live in a [`BotRegistry`] arena with stable ids; the [`World`] bundles
//! the ship, the registry, the player and the random source. The engine
//! mutates it once per frame.
mod bot;
mod error;
mod player;
mod registry;
mod world;

pub use bot::{
    Animation, AnimationKind, AttackTarget, Bot, BotFlags, BotHandle, BotId, CombatState,
    StatusTimers, WaypointLink,
};
pub use error::RegistryError;
pub use player::Player;
pub use registry::BotRegistry;
pub use world::World;
