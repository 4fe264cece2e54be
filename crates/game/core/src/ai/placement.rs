//! Scattering bots over a level's waypoints.
use tracing::debug;

use crate::env::RngOracle;
use crate::error::inform_developers;
use crate::geometry::LevelId;
use crate::map::Ship;
use crate::state::{BotFlags, BotRegistry, CombatState, WaypointLink};

/// Redistributes the bots of level `z`, as done when the player enters it.
///
/// Fixed bots stay put. Special-force bots snap to their nearest waypoint.
/// Every other bot takes a distinct random waypoint that allows random
/// spawns, or its nearest waypoint once those run out. The chosen waypoint
/// becomes the bot's home.
pub fn shuffle_level(ship: &Ship, bots: &mut BotRegistry, z: LevelId, rng: &mut dyn RngOracle) {
    let Some(level) = ship.level(z) else {
        return;
    };
    let mut spawn_points: Vec<usize> = level
        .waypoints
        .iter()
        .enumerate()
        .filter(|(_, waypoint)| !waypoint.suppress_random_spawn)
        .map(|(index, _)| index)
        .collect();

    for id in bots.ids_on_level(z) {
        let Some(bot) = bots.get_mut(id) else {
            continue;
        };
        if bot.flags.contains(BotFlags::COMPLETELY_FIXED) {
            continue;
        }

        let index = if bot.flags.contains(BotFlags::SPECIAL_FORCE) || spawn_points.is_empty() {
            level.nearest_waypoint(bot.pos.point())
        } else {
            let pick = rng.random_int(spawn_points.len() as u32 - 1) as usize;
            Some(spawn_points.swap_remove(pick))
        };
        let Some((index, waypoint)) = index.and_then(|i| level.waypoint(i).map(|wp| (i, wp))) else {
            inform_developers("waypoints", &format!("{z} has no waypoint to place bot {id} on"));
            continue;
        };

        bot.pos = bot.pos.with_point(waypoint.center());
        bot.waypoints = Some(WaypointLink::at(index));
        bot.home_waypoint = Some(index);
        bot.state = CombatState::SelectNewWaypoint;
        bot.stand_still();
        bot.move_target = None;
        bot.wander_target = None;
        debug!(bot = %id, waypoint = index, "placed");
    }
}
