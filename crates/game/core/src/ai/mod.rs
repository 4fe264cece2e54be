//! Per-frame bot behaviour.
//!
//! [`simulate_bot`] runs one bot through a frame: stuck detection, target
//! acquisition, the situational state overrides, the state handler, route
//! planning and finally the step along the route.
pub mod animation;
mod context;
pub mod movement;
pub mod placement;
pub mod states;
pub mod stuck;
pub mod targeting;
pub mod transitions;
pub mod turning;
pub mod waypoints;

#[cfg(test)]
pub(crate) mod testing;

use tracing::trace;

pub use context::TickContext;
pub use placement::shuffle_level;
pub use states::{StateHandler, Transition};

use crate::env::DroidSpec;
use crate::geometry::Point;
use crate::state::Bot;

/// Advances one living bot by `ctx.dt` seconds.
///
/// The bot must be taken out of `ctx.bots` by the caller.
pub fn simulate_bot(ctx: &mut TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) {
    trace!(bot = %bot.id, state = %bot.state, "simulate");
    stuck::check_if_stuck(ctx, bot);

    if bot.is_friendly() {
        targeting::acquire_target_for_friendly(ctx, bot, spec);
    } else {
        targeting::acquire_target_for_hostile(ctx, bot, spec);
    }

    bot.speed = Point::ORIGIN;
    transitions::situational_transitions(ctx, bot, spec);
    let target = states::run_state(ctx, bot, spec);

    if !bot.is_waiting() {
        movement::plan_path(ctx, bot, target);
    }
    movement::move_bot(ctx, bot, spec);
    movement::update_facing(bot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{BRAWLER, Fixture, GUNNER, Z, brawler, gunner};
    use crate::events::SimEvent;
    use crate::geometry::Gps;
    use crate::map::Waypoint;
    use crate::state::{AttackTarget, CombatState, WaypointLink};

    #[test]
    fn patrol_walks_towards_the_next_waypoint() {
        let mut fx = Fixture::new();
        fx.waypoint(Waypoint::new(2, 2).connected_to([1]));
        fx.waypoint(Waypoint::new(8, 2).connected_to([0]));
        let mut bot = Bot::new(GUNNER, Gps::new(2.5, 2.5, Z));
        bot.waypoints = Some(WaypointLink::at(0));
        let id = fx.spawn(bot);
        let spec = gunner();

        let mut seen = Vec::new();
        for _ in 0..40 {
            fx.with_bot(id, 0.1, |ctx, bot| simulate_bot(ctx, bot, &spec));
            seen.push(fx.bot(id).state);
        }
        assert!(seen.contains(&CombatState::TurnTowardsNextWaypoint));
        assert!(seen.contains(&CombatState::MoveAlongRandomWaypoints));
        assert!(fx.bot(id).pos.x > 2.5);
        assert_eq!(fx.bot(id).pos.y, 2.5);
    }

    #[test]
    fn hostile_spots_and_engages_the_player() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(9.0, 5.0, Z);
        let id = fx.spawn_at(GUNNER, 5.0, 5.0);
        let spec = gunner();

        fx.with_bot(id, 0.1, |ctx, bot| simulate_bot(ctx, bot, &spec));
        assert_eq!(fx.bot(id).target, AttackTarget::Player);
        assert_eq!(fx.bot(id).state, CombatState::StopAndEyeTarget);

        let mut attacked = false;
        for _ in 0..30 {
            fx.with_bot(id, 0.1, |ctx, bot| simulate_bot(ctx, bot, &spec));
            attacked |= fx.bot(id).state == CombatState::Attack;
        }
        assert!(attacked);
    }

    #[test]
    fn ranged_bot_fires_over_water() {
        let mut fx = Fixture::new();
        fx.water_column(7.5);
        fx.player.pos = Gps::new(10.0, 5.5, Z);
        let id = fx.spawn_at(GUNNER, 5.0, 5.5);
        let spec = gunner();

        let mut attacked = false;
        for _ in 0..40 {
            fx.with_bot(id, 0.1, |ctx, bot| simulate_bot(ctx, bot, &spec));
            attacked |= fx.bot(id).state == CombatState::Attack;
        }
        assert_eq!(fx.bot(id).target, AttackTarget::Player);
        assert!(attacked);
        assert!(fx.events.iter().any(|e| matches!(e, SimEvent::BulletFired { .. })));
    }

    #[test]
    fn melee_bot_is_held_back_by_water() {
        let mut fx = Fixture::new();
        fx.water_column(7.5);
        fx.player.pos = Gps::new(10.0, 5.5, Z);
        let id = fx.spawn_at(BRAWLER, 5.0, 5.5);
        let spec = brawler();

        for _ in 0..40 {
            fx.with_bot(id, 0.1, |ctx, bot| simulate_bot(ctx, bot, &spec));
            assert_ne!(fx.bot(id).state, CombatState::Attack);
            assert!(fx.bot(id).pos.x < 7.0);
        }
        assert_eq!(fx.bot(id).target, AttackTarget::None);
        assert!(!fx.events.iter().any(|e| matches!(e, SimEvent::MeleeOnPlayer { .. })));

        // the line check itself, for both weapon kinds
        let ctx = fx.ctx(0.1);
        let (here, there) = (Point::new(5.0, 5.5), Point::new(10.0, 5.5));
        assert!(!ctx.can_shoot(&spec, here, there, Z));
        assert!(ctx.can_shoot(&gunner(), here, there, Z));
    }
}
