//! State changes driven by the situation rather than the current state.
//!
//! The rules run in increasing priority: each one may override the state
//! chosen by the ones before it.
use crate::config::SimConfig;
use crate::env::DroidSpec;
use crate::state::{Bot, BotFlags, CombatState};

use super::TickContext;
use super::targeting::target_position;

pub fn situational_transitions(ctx: &TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) {
    let here = bot.pos.point();
    let z = bot.pos.z;

    if bot.flags.contains(BotFlags::WILL_RUSH_TUX)
        && bot.is_friendly()
        && !ctx.player.in_dialog
        && ctx.player.visible_to(spec.sensor)
        && ctx
            .player_in(z)
            .is_some_and(|player| player.point().sq_distance(here) < SimConfig::RUSH_SQ_RADIUS)
    {
        bot.state = CombatState::RushTuxAndOpenTalk;
    }
    if bot.state == CombatState::RushTuxAndOpenTalk
        && (!bot.flags.contains(BotFlags::WILL_RUSH_TUX) || !bot.is_friendly())
    {
        bot.state = CombatState::SelectNewWaypoint;
    }

    if bot.max_distance_to_home > 0.0
        && let Some(home) = bot
            .home_waypoint
            .and_then(|index| ctx.ship.level(z)?.waypoint(index).map(|wp| wp.center()))
        && here.distance(home) > bot.max_distance_to_home
    {
        bot.state = CombatState::ReturningHome;
    }

    if bot.status.paralysis > 0.0 {
        bot.state = CombatState::Paralyzed;
    }

    // the attack engagement rules below leave these alone
    if matches!(
        bot.state,
        CombatState::StopAndEyeTarget
            | CombatState::Attack
            | CombatState::Paralyzed
            | CombatState::ReturningHome
            | CombatState::SelectNewWaypoint
            | CombatState::RushTuxAndOpenTalk
    ) {
        return;
    }

    if bot.flags.contains(BotFlags::COMPLETELY_FIXED) {
        bot.state = CombatState::CompletelyFixed;
    }
    if bot.flags.contains(BotFlags::FOLLOW_TUX) {
        bot.state = CombatState::FollowTux;
    }
    if let Some(target) = target_position(ctx, bot)
        && ctx.can_shoot(spec, here, target, z)
    {
        bot.state = CombatState::StopAndEyeTarget;
    }
    if bot.state == CombatState::UndefinedState {
        bot.state = CombatState::SelectNewWaypoint;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{Fixture, GUNNER, Z, gunner};
    use crate::env::Faction;
    use crate::geometry::Gps;
    use crate::map::Waypoint;
    use crate::state::{AttackTarget, BotId};

    fn transition(fx: &mut Fixture, id: BotId, state: CombatState) -> CombatState {
        let spec = gunner();
        fx.with_bot(id, 0.1, |ctx, bot| {
            bot.state = state;
            situational_transitions(ctx, bot, &spec);
            bot.state
        })
    }

    #[test]
    fn friendly_rusher_runs_to_a_close_player() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(8.0, 5.0, Z);
        let id = fx.spawn(
            Bot::new(GUNNER, Gps::new(5.0, 5.0, Z))
                .with_faction(Faction::Friendly)
                .with_flags(BotFlags::WILL_RUSH_TUX),
        );
        assert_eq!(
            transition(&mut fx, id, CombatState::MoveAlongRandomWaypoints),
            CombatState::RushTuxAndOpenTalk
        );

        fx.player.in_dialog = true;
        assert_eq!(
            transition(&mut fx, id, CombatState::MoveAlongRandomWaypoints),
            CombatState::MoveAlongRandomWaypoints
        );

        // turned hostile mid-rush
        fx.player.in_dialog = false;
        fx.bots.get_mut(id).unwrap().faction = Faction::Hostile;
        assert_eq!(
            transition(&mut fx, id, CombatState::RushTuxAndOpenTalk),
            CombatState::SelectNewWaypoint
        );
    }

    #[test]
    fn straying_bots_return_home() {
        let mut fx = Fixture::new();
        fx.waypoint(Waypoint::new(2, 2));
        let id = fx.spawn(Bot::new(GUNNER, Gps::new(12.5, 2.5, Z)).with_home(0, 5.0));
        assert_eq!(
            transition(&mut fx, id, CombatState::MoveAlongRandomWaypoints),
            CombatState::ReturningHome
        );
    }

    #[test]
    fn paralysis_overrides_everything() {
        let mut fx = Fixture::new();
        let id = fx.spawn_at(GUNNER, 5.0, 5.0);
        fx.bots.get_mut(id).unwrap().status.paralysis = 2.0;
        assert_eq!(
            transition(&mut fx, id, CombatState::Attack),
            CombatState::Paralyzed
        );
    }

    #[test]
    fn visible_target_starts_eyeing() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(8.0, 5.0, Z);
        let id = fx.spawn_at(GUNNER, 5.0, 5.0);
        fx.bots.get_mut(id).unwrap().target = AttackTarget::Player;
        assert_eq!(
            transition(&mut fx, id, CombatState::WaypointlessWandering),
            CombatState::StopAndEyeTarget
        );
        // already engaged states keep going
        assert_eq!(
            transition(&mut fx, id, CombatState::Attack),
            CombatState::Attack
        );
        fx.block(6.5, 5.0);
        assert_eq!(
            transition(&mut fx, id, CombatState::TurnTowardsNextWaypoint),
            CombatState::TurnTowardsNextWaypoint
        );
    }

    #[test]
    fn flags_force_their_states() {
        let mut fx = Fixture::new();
        let fixed = fx.spawn(
            Bot::new(GUNNER, Gps::new(5.0, 5.0, Z)).with_flags(BotFlags::COMPLETELY_FIXED),
        );
        let follower = fx.spawn(
            Bot::new(GUNNER, Gps::new(6.0, 5.0, Z)).with_flags(BotFlags::FOLLOW_TUX),
        );
        let lost = fx.spawn_at(GUNNER, 7.0, 5.0);
        assert_eq!(
            transition(&mut fx, fixed, CombatState::WaypointlessWandering),
            CombatState::CompletelyFixed
        );
        assert_eq!(
            transition(&mut fx, follower, CombatState::WaypointlessWandering),
            CombatState::FollowTux
        );
        assert_eq!(
            transition(&mut fx, lost, CombatState::UndefinedState),
            CombatState::SelectNewWaypoint
        );
    }
}
