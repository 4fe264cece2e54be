//! Waypoint graph walking and free roaming.
use tracing::debug;

use crate::colldet::CharacterProximity;
use crate::config::SimConfig;
use crate::env::RngOracle;
use crate::error::inform_developers;
use crate::geometry::Point;
use crate::state::{Bot, WaypointLink};

use super::TickContext;

/// Result of [`set_new_random_waypoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaypointChoice {
    /// Heading for a new waypoint.
    Chosen(usize),
    /// Every connection is occupied; the bot waits a little.
    NoFreeWay,
    /// The bot is not on a usable waypoint.
    Broken,
}

/// Picks the next edge of the waypoint graph from the bot's current waypoint.
///
/// Only connections whose straight path is free of other characters count.
/// The waypoint the bot just came from gets one share of the draw and every
/// other free connection [`SimConfig::WAYPOINT_REPEAT_SHARES`] shares, so
/// bots rarely turn straight back.
pub fn set_new_random_waypoint(ctx: &mut TickContext<'_>, bot: &mut Bot) -> WaypointChoice {
    let Some(link) = bot.waypoints else {
        return WaypointChoice::Broken;
    };
    let z = bot.pos.z;
    let Some(level) = ctx.ship.level(z) else {
        return WaypointChoice::Broken;
    };
    let Some(current) = level.waypoint(link.next) else {
        inform_developers(
            "waypoints",
            &format!("bot {} stands on missing waypoint {} of {z}", bot.id, link.next),
        );
        return WaypointChoice::Broken;
    };
    let came_from = link.last;
    bot.waypoints = Some(WaypointLink::at(link.next));

    if current.connections.is_empty() {
        inform_developers(
            "waypoints",
            &format!("waypoint {} of {z} has no connections", link.next),
        );
        return WaypointChoice::Broken;
    }

    let mut proximity = CharacterProximity::new(&*ctx.bots).excluding(Some(bot.id), None);
    if ctx.player.pos.z == z {
        proximity = proximity.with_player(ctx.player.pos);
    }
    let from = current.center();
    let free: Vec<usize> = current
        .connections
        .iter()
        .copied()
        .filter(|&index| {
            level
                .waypoint(index)
                .is_some_and(|to| proximity.is_segment_free(from, to.center(), z))
        })
        .collect();

    if free.is_empty() {
        let wait = ctx.rng.random_range(
            ctx.config.no_free_waypoint_wait_min,
            ctx.config.no_free_waypoint_wait_max,
        );
        debug!(bot = %bot.id, wait, "no free waypoint");
        bot.pure_wait = wait;
        return WaypointChoice::NoFreeWay;
    }

    let chosen = weighted_pick(&free, came_from, &mut *ctx.rng);
    bot.waypoints = Some(WaypointLink {
        next: chosen,
        last: link.next,
    });
    WaypointChoice::Chosen(chosen)
}

/// Single uniform draw over the shares of `free`; `came_from` owns one share,
/// every other entry `WAYPOINT_REPEAT_SHARES`.
fn weighted_pick(free: &[usize], came_from: usize, rng: &mut dyn RngOracle) -> usize {
    let shares = SimConfig::WAYPOINT_REPEAT_SHARES;
    let share_of = |index: usize| if index == came_from { 1 } else { shares };
    let total: u32 = free.iter().map(|&index| share_of(index)).sum();

    let mut roll = rng.random_int(total - 1);
    for &index in free {
        let share = share_of(index);
        if roll < share {
            return index;
        }
        roll -= share;
    }
    free[free.len() - 1]
}

/// Draws up to [`SimConfig::RANDOM_WALK_ATTEMPTS`] nearby points and returns
/// the first one in a walkable straight line.
///
/// When every candidate is rejected the bot waits `random_walk_wait` seconds.
pub fn set_new_waypointless_walk_target(ctx: &mut TickContext<'_>, bot: &mut Bot) -> Option<Point> {
    let pos = bot.pos.point();
    let span = (SimConfig::RANDOM_WALK_SPAN * 200.0) as u32;
    for _ in 0..SimConfig::RANDOM_WALK_ATTEMPTS {
        let dx = (ctx.rng.random_int(span) as f32 - span as f32 / 2.0) / 100.0;
        let dy = (ctx.rng.random_int(span) as f32 - span as f32 / 2.0) / 100.0;
        let candidate = pos + Point::new(dx, dy);
        if ctx.can_walk(pos, candidate, bot.pos.z) {
            return Some(candidate);
        }
    }
    debug!(bot = %bot.id, "random walk gave up");
    bot.pure_wait = ctx.config.random_walk_wait;
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{Fixture, GUNNER, Z};
    use crate::env::SequenceRng;
    use crate::geometry::Gps;
    use crate::map::Waypoint;
    use crate::state::BotId;

    /// Hub waypoint 0 at (5, 5) connected to 1, 2 and 3.
    fn star(fx: &mut Fixture) {
        fx.waypoint(Waypoint::new(5, 5).connected_to([1, 2, 3]));
        fx.waypoint(Waypoint::new(10, 5).connected_to([0]));
        fx.waypoint(Waypoint::new(5, 10).connected_to([0]));
        fx.waypoint(Waypoint::new(1, 5).connected_to([0]));
    }

    fn hub_bot(fx: &mut Fixture, came_from: usize) -> BotId {
        let mut bot = Bot::new(GUNNER, Gps::new(5.5, 5.5, Z));
        bot.waypoints = Some(WaypointLink {
            next: 0,
            last: came_from,
        });
        let id = fx.spawn(bot);
        // spawn keeps the link
        assert_eq!(fx.bot(id).waypoints.map(|l| l.next), Some(0));
        id
    }

    #[test]
    fn weighted_pick_disfavours_the_previous_waypoint() {
        // shares: 1 -> 3, 2 -> 1 (came from), 3 -> 3; total 7
        let free = [1, 2, 3];
        let picks: Vec<usize> = (0..7)
            .map(|roll| weighted_pick(&free, 2, &mut SequenceRng::constant(roll)))
            .collect();
        assert_eq!(picks, vec![1, 1, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn weighted_pick_is_uniform_without_history() {
        let free = [4, 7];
        let picks: Vec<usize> = (0..6)
            .map(|roll| weighted_pick(&free, 99, &mut SequenceRng::constant(roll)))
            .collect();
        assert_eq!(picks, vec![4, 4, 4, 7, 7, 7]);
    }

    #[test]
    fn free_connection_is_chosen_and_links_updated() {
        let mut fx = Fixture::new();
        star(&mut fx);
        let id = hub_bot(&mut fx, 1);
        fx.rng = SequenceRng::constant(0);
        let choice = fx.with_bot(id, 0.1, |ctx, bot| set_new_random_waypoint(ctx, bot));
        // roll 0 lands in waypoint 1's single share
        assert_eq!(choice, WaypointChoice::Chosen(1));
        assert_eq!(fx.bot(id).waypoints, Some(WaypointLink { next: 1, last: 0 }));
    }

    #[test]
    fn occupied_connections_are_skipped() {
        let mut fx = Fixture::new();
        star(&mut fx);
        fx.spawn_at(GUNNER, 8.0, 5.5);
        fx.spawn_at(GUNNER, 5.5, 8.0);
        let id = hub_bot(&mut fx, 3);
        let choice = fx.with_bot(id, 0.1, |ctx, bot| set_new_random_waypoint(ctx, bot));
        assert_eq!(choice, WaypointChoice::Chosen(3));
    }

    #[test]
    fn no_free_connection_waits() {
        let mut fx = Fixture::new();
        star(&mut fx);
        fx.spawn_at(GUNNER, 8.0, 5.5);
        fx.spawn_at(GUNNER, 5.5, 8.0);
        fx.spawn_at(GUNNER, 3.0, 5.5);
        let id = hub_bot(&mut fx, 3);
        fx.rng = SequenceRng::constant(1000);
        let choice = fx.with_bot(id, 0.1, |ctx, bot| set_new_random_waypoint(ctx, bot));
        assert_eq!(choice, WaypointChoice::NoFreeWay);
        assert_eq!(fx.bot(id).pure_wait, 1.0);
        assert_eq!(fx.bot(id).waypoints, Some(WaypointLink::at(0)));
    }

    #[test]
    fn dead_end_waypoint_is_reported() {
        let mut fx = Fixture::new();
        fx.waypoint(Waypoint::new(5, 5));
        let id = hub_bot(&mut fx, 0);
        let choice = fx.with_bot(id, 0.1, |ctx, bot| set_new_random_waypoint(ctx, bot));
        assert_eq!(choice, WaypointChoice::Broken);
    }

    #[test]
    fn random_walk_rejects_blocked_candidates() {
        let mut fx = Fixture::new();
        let id = fx.spawn_at(GUNNER, 5.5, 5.5);
        // both rolls 0: the candidate is (-3, -3) away, on open floor
        let target = fx.with_bot(id, 0.1, |ctx, bot| set_new_waypointless_walk_target(ctx, bot));
        assert_eq!(target, Some(Point::new(2.5, 2.5)));

        // wall off that corner; every attempt draws the same point
        fx.block(4.0, 4.0);
        let target = fx.with_bot(id, 0.1, |ctx, bot| set_new_waypointless_walk_target(ctx, bot));
        assert_eq!(target, None);
        assert_eq!(fx.bot(id).pure_wait, fx.config.random_walk_wait);
    }
}
