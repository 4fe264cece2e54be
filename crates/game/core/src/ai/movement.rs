//! Route planning and stepping along the planned route.
use tracing::{debug, warn};

use crate::colldet::{CollisionFilter, resolve_virtual_position};
use crate::config::SimConfig;
use crate::env::{DroidSpec, PathRequest};
use crate::error::inform_developers;
use crate::events::SimEvent;
use crate::geometry::Point;
use crate::state::{Animation, AnimationKind, Bot, WaypointLink};

use super::TickContext;

/// Below this speed on both axes the facing is left alone.
const FACING_MIN_SPEED: f32 = 0.03;

/// Turns the state handler's movement request into a route.
///
/// `None` keeps the current route. Standing on the target means "stand
/// here". A new target is routed through the pathfinder; on failure the bot
/// stands still and waits at least `wait_collision` seconds before the next
/// attempt.
pub fn plan_path(ctx: &TickContext<'_>, bot: &mut Bot, target: Option<Point>) {
    let Some(target) = target else {
        return;
    };
    if target == bot.pos.point() {
        bot.stand_still();
        bot.move_target = Some(target);
        return;
    }
    if bot.move_target == Some(target) && !bot.path.is_empty() {
        return;
    }

    let map = ctx.map();
    let walkable = CollisionFilter::WALKABLE;
    let request = PathRequest::new(bot.pos, target, &walkable);
    match ctx.oracles.pathfinder.find_path(&map, &request) {
        Ok(path) => {
            bot.path = path;
            bot.move_target = Some(target);
        }
        Err(err) => {
            debug!(bot = %bot.id, %err, ?target, "no route");
            bot.stand_still();
            bot.move_target = None;
            bot.pure_wait = bot.pure_wait.max(ctx.config.wait_collision);
        }
    }
}

/// Moves the bot along its route for one frame.
///
/// Waiting, paralysed and attacking bots hold still. A step into another
/// bot is rolled back; a step off the level moves the bot to the neighbour.
pub fn move_bot(ctx: &mut TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) {
    if bot.is_waiting()
        || bot.status.paralysis > 0.0
        || bot.animation.kind == AnimationKind::Attack
    {
        return;
    }
    let Some(&spot) = bot.path.first() else {
        return;
    };

    let before = bot.pos;
    move_to_spot(bot, spec, spot, ctx.dt);
    if bot.pos.point() == spot && bot.path.len() > 1 {
        bot.path.remove(0);
    }

    if bumps_into_bot(ctx, bot, before.point()) {
        bot.pos = before;
        bot.speed = Point::ORIGIN;
        return;
    }
    if !cross_level(ctx, bot) {
        bot.pos = before;
        bot.speed = Point::ORIGIN;
    }
}

/// Per-axis step towards `spot` at full speed, snapping when the remaining
/// distance fits into this frame.
fn move_to_spot(bot: &mut Bot, spec: &DroidSpec, spot: Point, dt: f32) {
    let mut max_speed = spec.max_speed;
    if bot.status.frozen > 0.0 {
        max_speed *= SimConfig::FROZEN_SPEED_FACTOR;
    }
    if bot.animation.kind == AnimationKind::GetHit {
        return;
    }

    let remaining = spot - bot.pos.point();
    if remaining == Point::ORIGIN {
        bot.speed = Point::ORIGIN;
        return;
    }
    if bot.animation.kind == AnimationKind::Stand {
        bot.animation = Animation {
            kind: AnimationKind::Walk,
            phase: 0.0,
        };
    }

    let reach = dt * max_speed;
    let axis = |pos: f32, rest: f32, target: f32| {
        if rest.abs() > reach {
            let speed = rest.signum() * max_speed;
            (pos + speed * dt, speed)
        } else {
            (target, 0.0)
        }
    };
    let (x, vx) = axis(bot.pos.x, remaining.x, spot.x);
    let (y, vy) = axis(bot.pos.y, remaining.y, spot.y);
    bot.pos.x = x;
    bot.pos.y = y;
    bot.speed = Point::new(vx, vy);
}

/// Whether this step brought the bot into contact with another bot.
///
/// The other bot waits and both turn around on the waypoint graph.
/// Moving away from a contact is always allowed.
fn bumps_into_bot(ctx: &mut TickContext<'_>, bot: &mut Bot, before: Point) -> bool {
    let reach = 2.0 * SimConfig::BOT_COLLISION_RADIUS;
    let pos = bot.pos.point();
    let wait = ctx.config.wait_collision;

    for id in ctx.bots.ids_on_level(bot.pos.z) {
        let Some(other) = ctx.bots.get_mut(id) else {
            continue;
        };
        let there = other.pos.point();
        let d2 = pos.sq_distance(there);
        if d2 > reach * reach || d2 >= before.sq_distance(there) {
            continue;
        }
        other.pure_wait = wait;
        other.waypoints = other.waypoints.map(WaypointLink::swapped);
        bot.waypoints = bot.waypoints.map(WaypointLink::swapped);
        debug!(bot = %bot.id, other = %id, "bot collision");
        return true;
    }
    false
}

/// Moves a bot that stepped off its level onto the neighbour level.
///
/// Returns `false` when there is no level on that side.
fn cross_level(ctx: &mut TickContext<'_>, bot: &mut Bot) -> bool {
    let Some(level) = ctx.ship.level(bot.pos.z) else {
        return false;
    };
    if level.contains(bot.pos.point()) {
        return true;
    }
    let Some(resolved) = resolve_virtual_position(&*ctx.ship, bot.pos) else {
        return false;
    };
    if resolved.z == bot.pos.z {
        bot.pos = resolved;
        return true;
    }

    let from = bot.pos.z;
    let to = resolved.z;
    if let Err(err) = ctx.bots.relocate(bot.id, from, to) {
        warn!(bot = %bot.id, %err, "level change of an unregistered bot");
        return false;
    }
    bot.pos = resolved;
    bot.waypoints = ctx
        .ship
        .level(to)
        .and_then(|level| level.nearest_waypoint(resolved.point()))
        .map(WaypointLink::at);
    bot.stand_still();
    bot.move_target = None;
    bot.wander_target = None;
    debug!(bot = %bot.id, %from, %to, "changed level");
    ctx.emit(SimEvent::LevelChanged {
        bot: bot.id,
        from,
        to,
    });
    true
}

/// Points the bot along its velocity when it is actually moving.
pub fn update_facing(bot: &mut Bot) {
    let v = bot.speed;
    if v.x.abs() > FACING_MIN_SPEED || v.y.abs() > FACING_MIN_SPEED {
        bot.current_angle = 180.0 - (v.y.atan2(v.x).to_degrees() + 90.0);
    }
}

/// Snaps the bot onto the centre of `level`'s nearest waypoint.
pub fn teleport_to_closest_waypoint(ctx: &TickContext<'_>, bot: &mut Bot) -> bool {
    let Some(level) = ctx.ship.level(bot.pos.z) else {
        return false;
    };
    let Some(index) = level.nearest_waypoint(bot.pos.point()) else {
        inform_developers(
            "waypoints",
            &format!("no waypoint on {} to rescue bot {}", bot.pos.z, bot.id),
        );
        return false;
    };
    let Some(waypoint) = level.waypoint(index) else {
        return false;
    };
    bot.pos = bot.pos.with_point(waypoint.center());
    bot.waypoints = Some(WaypointLink::at(index));
    bot.stand_still();
    bot.move_target = None;
    true
}
