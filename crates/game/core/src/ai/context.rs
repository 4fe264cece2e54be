//! Everything one bot tick may read or mutate, besides the bot itself.
use crate::colldet::{CollisionFilter, CollisionMap, update_virtual_position};
use crate::config::SimConfig;
use crate::env::{DroidSpec, Oracles, RngOracle};
use crate::events::{EventSink, SimEvent};
use crate::geometry::{Gps, LevelId, Point};
use crate::map::Ship;
use crate::state::{BotRegistry, Player};

/// Borrowed view of the world for the duration of one bot's tick.
///
/// The simulated bot is taken out of [`BotRegistry`] while it runs, so
/// lookups through `bots` never alias it.
pub struct TickContext<'a> {
    pub ship: &'a mut Ship,
    pub bots: &'a mut BotRegistry,
    pub player: &'a mut Player,
    pub rng: &'a mut dyn RngOracle,
    pub oracles: Oracles<'a>,
    pub config: &'a SimConfig,
    pub events: &'a mut dyn EventSink,
    /// Seconds simulated by this frame.
    pub dt: f32,
}

impl TickContext<'_> {
    pub fn map(&self) -> CollisionMap<'_> {
        CollisionMap::new(&*self.ship, self.oracles.obstacles)
    }

    /// Whether a character could walk the straight line `from -> to` on `z`.
    pub fn can_walk(&self, from: Point, to: Point, z: LevelId) -> bool {
        !self
            .map()
            .direct_line_blocked(from, to, z, Some(&CollisionFilter::WALKABLE))
    }

    /// Whether a droid of type `spec` can strike along `from -> to` on `z`.
    ///
    /// Bullets fly over ground-level obstacles; melee attackers have to walk
    /// the line.
    pub fn can_shoot(&self, spec: &DroidSpec, from: Point, to: Point, z: LevelId) -> bool {
        let filter = if spec.weapon.melee {
            CollisionFilter::WALKABLE
        } else {
            CollisionFilter::FLYABLE
        };
        !self.map().direct_line_blocked(from, to, z, Some(&filter))
    }

    /// The player's position in level `z`'s frame, if `z` can see it.
    pub fn player_in(&self, z: LevelId) -> Option<Gps> {
        update_virtual_position(&*self.ship, self.player.pos, z)
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.emit(event);
    }
}
