use crate::env::RngOracle;
use crate::map::Ship;

use super::{BotRegistry, Player};

/// Mutable simulation state advanced by [`crate::SimEngine::step`].
pub struct World {
    pub ship: Ship,
    pub bots: BotRegistry,
    pub player: Player,
    pub rng: Box<dyn RngOracle>,
    /// Seconds accumulated towards the next healing pass.
    pub heal_timer: f32,
}

impl World {
    pub fn new(ship: Ship, player: Player, rng: impl RngOracle + 'static) -> Self {
        Self {
            ship,
            bots: BotRegistry::new(),
            player,
            rng: Box::new(rng),
            heal_timer: 0.0,
        }
    }
}
