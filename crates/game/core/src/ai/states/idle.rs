use tracing::warn;

use crate::ai::TickContext;
use crate::ai::waypoints::set_new_waypointless_walk_target;
use crate::config::SimConfig;
use crate::env::DroidSpec;
use crate::state::{Bot, BotFlags, CombatState};

use super::{StateHandler, Transition};

/// Frozen in place until the paralysis wears off.
pub struct Paralyzed;

impl StateHandler for Paralyzed {
    fn run(&self, _ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        let next = if bot.status.paralysis > 0.0 {
            CombatState::Paralyzed
        } else {
            CombatState::SelectNewWaypoint
        };
        Transition::to(next).moving_to(bot.pos.point())
    }
}

/// Never moves. Still turns to eye and attack targets.
pub struct CompletelyFixed;

impl StateHandler for CompletelyFixed {
    fn run(&self, _ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        let next = if bot.flags.contains(BotFlags::COMPLETELY_FIXED) {
            CombatState::CompletelyFixed
        } else {
            CombatState::SelectNewWaypoint
        };
        Transition::to(next).moving_to(bot.pos.point())
    }
}

/// Free roaming for bots off the waypoint graph: short hops to random
/// nearby points in a walkable straight line.
pub struct WaypointlessWandering;

impl StateHandler for WaypointlessWandering {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        if bot.waypoints.is_some() {
            return Transition::to(CombatState::SelectNewWaypoint);
        }
        let stay = Transition::to(CombatState::WaypointlessWandering);
        if bot.is_waiting() {
            return stay;
        }
        let here = bot.pos.point();
        if let Some(target) = bot.wander_target
            && here.distance(target) >= SimConfig::REACHED_DISTANCE
        {
            return stay.moving_to(target);
        }
        bot.wander_target = set_new_waypointless_walk_target(ctx, bot);
        stay.moving_to(bot.wander_target.unwrap_or(here))
    }
}

/// Reached only through a logic error; the bot resumes its patrol.
pub struct Undefined;

impl StateHandler for Undefined {
    fn run(&self, _ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        warn!(bot = %bot.id, "bot in undefined state, resetting");
        Transition::to(CombatState::SelectNewWaypoint)
    }
}
