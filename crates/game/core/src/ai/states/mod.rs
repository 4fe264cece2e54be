//! Per-state behaviour of the bot state machine.
//!
//! Each [`CombatState`] has a handler that decides where the bot wants to
//! go this tick and which state it is in afterwards. Handlers do not plan
//! routes or move the bot; [`crate::ai::simulate_bot`] does that with the
//! returned [`Transition`].
mod attack;
mod eye;
mod idle;
mod player;
mod waypoint;

use tracing::debug;

use crate::env::DroidSpec;
use crate::geometry::Point;
use crate::state::{Bot, CombatState};

use super::TickContext;

pub use attack::Attack;
pub use eye::StopAndEye;
pub use idle::{CompletelyFixed, Paralyzed, Undefined, WaypointlessWandering};
pub use player::{FollowTux, RushTux};
pub use waypoint::{MoveAlongWaypoints, ReturningHome, SelectNewWaypoint, TurnTowardsWaypoint};

/// Outcome of one state handler run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub next: CombatState,
    /// Where the bot wants to be. `None` keeps the current route; the bot's
    /// own position means "stand here".
    pub move_target: Option<Point>,
}

impl Transition {
    pub const fn to(next: CombatState) -> Self {
        Self {
            next,
            move_target: None,
        }
    }

    #[must_use]
    pub const fn moving_to(mut self, target: Point) -> Self {
        self.move_target = Some(target);
        self
    }
}

/// Behaviour of one combat state.
pub trait StateHandler {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) -> Transition;
}

pub fn handler_for(state: CombatState) -> &'static dyn StateHandler {
    match state {
        CombatState::WaypointlessWandering => &WaypointlessWandering,
        CombatState::SelectNewWaypoint => &SelectNewWaypoint,
        CombatState::TurnTowardsNextWaypoint => &TurnTowardsWaypoint,
        CombatState::MoveAlongRandomWaypoints => &MoveAlongWaypoints,
        CombatState::StopAndEyeTarget => &StopAndEye,
        CombatState::Attack => &Attack,
        CombatState::ReturningHome => &ReturningHome,
        CombatState::Paralyzed => &Paralyzed,
        CombatState::CompletelyFixed => &CompletelyFixed,
        CombatState::FollowTux => &FollowTux,
        CombatState::RushTuxAndOpenTalk => &RushTux,
        CombatState::UndefinedState => &Undefined,
    }
}

/// Runs the handler of the bot's current state and applies its successor.
pub fn run_state(ctx: &mut TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) -> Option<Point> {
    let Transition { next, move_target } = handler_for(bot.state).run(ctx, bot, spec);
    if next != bot.state {
        debug!(bot = %bot.id, from = %bot.state, to = %next, "state change");
    }
    bot.state = next;
    move_target
}
