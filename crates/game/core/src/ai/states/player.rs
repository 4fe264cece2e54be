use crate::ai::TickContext;
use crate::colldet::update_virtual_position;
use crate::config::SimConfig;
use crate::env::DroidSpec;
use crate::events::SimEvent;
use crate::geometry::Gps;
use crate::state::{Bot, BotFlags, CombatState};

use super::{StateHandler, Transition};

/// Runs up to the player and asks for a chat once close enough.
pub struct RushTux;

impl StateHandler for RushTux {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        let here = bot.pos.point();
        let Some(player) = ctx.player_in(bot.pos.z).map(Gps::point) else {
            return Transition::to(CombatState::SelectNewWaypoint).moving_to(here);
        };
        if here.distance(player) < SimConfig::RUSH_TALK_DISTANCE {
            ctx.emit(SimEvent::ChatRequested { bot: bot.id });
            bot.flags.remove(BotFlags::WILL_RUSH_TUX);
            return Transition::to(CombatState::SelectNewWaypoint).moving_to(here);
        }
        Transition::to(CombatState::RushTuxAndOpenTalk).moving_to(player)
    }
}

/// Trails the player along its recorded path, a few frames behind.
pub struct FollowTux;

impl StateHandler for FollowTux {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, _spec: &DroidSpec) -> Transition {
        let here = bot.pos.point();
        if !bot.flags.contains(BotFlags::FOLLOW_TUX) {
            return Transition::to(CombatState::SelectNewWaypoint).moving_to(here);
        }
        let stay = Transition::to(CombatState::FollowTux);
        let z = bot.pos.z;
        let Some(player) = ctx.player_in(z).map(Gps::point) else {
            return stay.moving_to(here);
        };
        if here.distance(player) < ctx.config.follow_stop_distance {
            return stay.moving_to(here);
        }
        let trail = ctx.player.delayed_position(ctx.config.follow_delay_frames);
        let spot = update_virtual_position(&*ctx.ship, trail, z).map_or(player, Gps::point);
        stay.moving_to(spot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{Fixture, GUNNER, Z, gunner};
    use crate::geometry::Point;

    #[test]
    fn rush_ends_in_a_chat() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(10.0, 5.0, Z);
        let id = fx.spawn(Bot::new(GUNNER, Gps::new(7.0, 5.0, Z)).with_flags(BotFlags::WILL_RUSH_TUX));
        let spec = gunner();

        let t = fx.with_bot(id, 0.1, |ctx, bot| RushTux.run(ctx, bot, &spec));
        assert_eq!(t.next, CombatState::RushTuxAndOpenTalk);
        assert_eq!(t.move_target, Some(Point::new(10.0, 5.0)));

        fx.bots.get_mut(id).unwrap().pos = Gps::new(9.5, 5.0, Z);
        let t = fx.with_bot(id, 0.1, |ctx, bot| RushTux.run(ctx, bot, &spec));
        assert_eq!(t.next, CombatState::SelectNewWaypoint);
        assert!(!fx.bot(id).flags.contains(BotFlags::WILL_RUSH_TUX));
        assert_eq!(fx.events, vec![SimEvent::ChatRequested { bot: id }]);
    }

    #[test]
    fn follower_lags_behind_the_player() {
        let mut fx = Fixture::new();
        for x in 0..12 {
            fx.player.pos = Gps::new(2.0 + x as f32, 5.0, Z);
            fx.player.record_position(fx.config.player_history_len);
        }
        let id = fx.spawn(Bot::new(GUNNER, Gps::new(2.0, 8.0, Z)).with_flags(BotFlags::FOLLOW_TUX));
        let spec = gunner();
        let t = fx.with_bot(id, 0.1, |ctx, bot| FollowTux.run(ctx, bot, &spec));
        // eight frames behind x = 13
        assert_eq!(t.move_target, Some(Point::new(5.0, 5.0)));

        fx.bots.get_mut(id).unwrap().pos = Gps::new(13.0, 5.5, Z);
        let t = fx.with_bot(id, 0.1, |ctx, bot| FollowTux.run(ctx, bot, &spec));
        assert_eq!(t.move_target, Some(Point::new(13.0, 5.5)));
    }

    #[test]
    fn cleared_follow_flag_resumes_patrol() {
        let mut fx = Fixture::new();
        let id = fx.spawn_at(GUNNER, 5.0, 5.0);
        let spec = gunner();
        let t = fx.with_bot(id, 0.1, |ctx, bot| FollowTux.run(ctx, bot, &spec));
        assert_eq!(t.next, CombatState::SelectNewWaypoint);
    }
}
