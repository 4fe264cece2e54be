//! Non-blocking rotation towards a point.
use crate::geometry::{Point, bearing_to, wrap_angle_delta};
use crate::state::Bot;

/// Turns `bot` by at most `rate * dt` degrees towards `target`.
///
/// Returns `true` once the bearing is reached or crossed this tick, and
/// always when the bot already stands on `target`. Call it every tick until
/// it reports done.
pub fn turn_a_bit_towards(bot: &mut Bot, target: Point, rate: f32, dt: f32) -> bool {
    let pos = bot.pos.point();
    if pos == target {
        return true;
    }

    let wanted = bearing_to(pos, target);
    let delta = wrap_angle_delta(wanted - bot.current_angle);
    if delta == 0.0 {
        return true;
    }

    let direction = delta.signum();
    bot.current_angle += direction * rate * dt;

    // overshooting flips the sign of the remaining delta
    let remaining = wrap_angle_delta(wanted - bot.current_angle);
    if remaining == 0.0 || remaining.signum() != direction {
        bot.current_angle = wanted;
        return true;
    }
    false
}
