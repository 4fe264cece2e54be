//! Recovery of bots that ended up inside an obstacle.
use tracing::debug;

use crate::colldet::CollisionFilter;
use crate::state::Bot;

use super::TickContext;
use super::movement::teleport_to_closest_waypoint;

/// Throttled check for a bot embedded in a solid rectangle.
///
/// The bot first tries to step out through the nearest free edge. If that
/// fails twice in a row it is teleported to the closest waypoint.
pub fn check_if_stuck(ctx: &TickContext<'_>, bot: &mut Bot) {
    if bot.stuck_timer < ctx.config.stuck_check_interval {
        return;
    }
    bot.stuck_timer = 0.0;

    let map = ctx.map();
    let filter = CollisionFilter::WALKABLE;
    let (pos, z) = (bot.pos.point(), bot.pos.z);
    if !map.point_blocked(pos, z, Some(&filter)) {
        bot.was_stuck = false;
        return;
    }

    if let Some(free) = map.escape_from_obstacle(pos, z, Some(&filter)) {
        debug!(bot = %bot.id, ?free, "escaped from obstacle");
        bot.pos = bot.pos.with_point(free);
        bot.stand_still();
        bot.move_target = None;
    } else if bot.was_stuck {
        debug!(bot = %bot.id, "stuck twice, teleporting");
        teleport_to_closest_waypoint(ctx, bot);
    }
    bot.was_stuck = true;
}
