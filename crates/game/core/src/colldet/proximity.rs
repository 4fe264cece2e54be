//! "Is this spot free of characters" predicates.
use crate::config::SimConfig;
use crate::geometry::{Gps, LevelId, Point, normalize_towards, point_segment_sq_distance};
use crate::state::{BotId, BotRegistry};

/// Living characters that may block a position or a segment.
///
/// Bots in a wait state do not block, nor do the up to two excluded bots.
#[derive(Clone, Copy)]
pub struct CharacterProximity<'a> {
    bots: &'a BotRegistry,
    player: Option<Gps>,
    exclude: [Option<BotId>; 2],
}

impl<'a> CharacterProximity<'a> {
    pub fn new(bots: &'a BotRegistry) -> Self {
        Self {
            bots,
            player: None,
            exclude: [None; 2],
        }
    }

    /// Also treats the player at `pos` as an obstacle.
    #[must_use]
    pub fn with_player(mut self, pos: Gps) -> Self {
        self.player = Some(pos);
        self
    }

    #[must_use]
    pub fn excluding(mut self, first: Option<BotId>, second: Option<BotId>) -> Self {
        self.exclude = [first, second];
        self
    }

    fn blockers(&self, z: LevelId) -> impl Iterator<Item = Point> + '_ {
        let bots = self
            .bots
            .bots_on_level(z)
            .filter(|bot| !bot.is_waiting() && !self.exclude.contains(&Some(bot.id)))
            .map(|bot| bot.pos.point());
        let player = self.player.filter(|p| p.z == z).map(Gps::point);
        bots.chain(player)
    }

    pub fn is_position_free(&self, p: Point, z: LevelId) -> bool {
        let r2 = SimConfig::CHARACTER_RADIUS * SimConfig::CHARACTER_RADIUS;
        self.blockers(z).all(|c| c.sq_distance(p) >= r2)
    }

    pub fn is_segment_free(&self, from: Point, to: Point, z: LevelId) -> bool {
        let Some(to_n) = normalize_towards(from, to) else {
            return self.is_position_free(from, z);
        };
        let r = SimConfig::CHARACTER_RADIUS;
        let (min_x, max_x) = (from.x.min(to.x) - r, from.x.max(to.x) + r);
        let (min_y, max_y) = (from.y.min(to.y) - r, from.y.max(to.y) + r);

        self.blockers(z).all(|c| {
            if c.x < min_x || c.x > max_x || c.y < min_y || c.y > max_y {
                return true;
            }
            point_segment_sq_distance(from, to, to_n, c) >= r * r
        })
    }
}
