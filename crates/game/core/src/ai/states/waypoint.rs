use crate::ai::TickContext;
use crate::ai::turning::turn_a_bit_towards;
use crate::ai::waypoints::{WaypointChoice, set_new_random_waypoint};
use crate::config::SimConfig;
use crate::env::DroidSpec;
use crate::geometry::Point;
use crate::state::{Bot, CombatState, WaypointLink};

use super::{StateHandler, Transition};

/// Centre of the waypoint the bot is heading for.
fn next_waypoint_center(ctx: &TickContext<'_>, bot: &Bot) -> Option<Point> {
    let link = bot.waypoints?;
    let level = ctx.ship.level(bot.pos.z)?;
    level.waypoint(link.next).map(|waypoint| waypoint.center())
}

/// Draws the next edge of the waypoint graph. No movement this tick.
pub struct SelectNewWaypoint;

impl StateHandler for SelectNewWaypoint {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        let here = bot.pos.point();
        if bot.waypoints.is_none() {
            return Transition::to(CombatState::WaypointlessWandering).moving_to(here);
        }
        if bot.is_waiting() {
            return Transition::to(CombatState::SelectNewWaypoint).moving_to(here);
        }
        let next = match set_new_random_waypoint(ctx, bot) {
            WaypointChoice::Chosen(_) => CombatState::TurnTowardsNextWaypoint,
            WaypointChoice::NoFreeWay => CombatState::SelectNewWaypoint,
            WaypointChoice::Broken => CombatState::WaypointlessWandering,
        };
        Transition::to(next).moving_to(here)
    }
}

/// Turns on the spot until facing the next waypoint.
pub struct TurnTowardsWaypoint;

impl StateHandler for TurnTowardsWaypoint {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        let Some(target) = next_waypoint_center(ctx, bot) else {
            return Transition::to(CombatState::WaypointlessWandering);
        };
        if turn_a_bit_towards(bot, target, ctx.config.waypoint_turn_rate, ctx.dt) {
            return Transition::to(CombatState::MoveAlongRandomWaypoints).moving_to(target);
        }
        Transition::to(CombatState::TurnTowardsNextWaypoint)
    }
}

/// Walks to the next waypoint, then selects another one.
pub struct MoveAlongWaypoints;

impl StateHandler for MoveAlongWaypoints {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        let Some(target) = next_waypoint_center(ctx, bot) else {
            return Transition::to(CombatState::WaypointlessWandering);
        };
        let here = bot.pos.point();
        if here.distance(target) < SimConfig::REACHED_DISTANCE {
            return Transition::to(CombatState::SelectNewWaypoint).moving_to(here);
        }
        Transition::to(CombatState::MoveAlongRandomWaypoints).moving_to(target)
    }
}

/// Walks back towards the home waypoint until within half the allowed
/// distance of it.
pub struct ReturningHome;

impl StateHandler for ReturningHome {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        let home = bot.home_waypoint.and_then(|index| {
            let level = ctx.ship.level(bot.pos.z)?;
            level.waypoint(index).map(|waypoint| (index, waypoint.center()))
        });
        let Some((index, center)) = home else {
            return Transition::to(CombatState::SelectNewWaypoint);
        };
        let here = bot.pos.point();
        if here.distance(center) < bot.max_distance_to_home / 2.0 {
            bot.waypoints = Some(WaypointLink::at(index));
            return Transition::to(CombatState::SelectNewWaypoint).moving_to(here);
        }
        Transition::to(CombatState::ReturningHome).moving_to(center)
    }
}
