use crate::ai::TickContext;
use crate::ai::targeting::target_position;
use crate::ai::turning::turn_a_bit_towards;
use crate::combat::set_rest_of_group_to_state;
use crate::env::DroidSpec;
use crate::events::{SimEvent, SoundKind};
use crate::state::{Bot, BotFlags, CombatState};

use super::{StateHandler, Transition};

/// Stands facing the target for `time_spent_eyeing` seconds, then starts an
/// attack run together with the rest of its group.
pub struct StopAndEye;

impl StateHandler for StopAndEye {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) -> Transition {
        let here = bot.pos.point();
        let Some(target) = target_position(ctx, bot) else {
            bot.state_timeout = 0.0;
            return Transition::to(CombatState::SelectNewWaypoint).moving_to(here);
        };
        turn_a_bit_towards(bot, target, ctx.config.eye_turn_rate, ctx.dt);

        if !bot.flags.contains(BotFlags::HAS_GREETED) {
            bot.flags.insert(BotFlags::HAS_GREETED);
            if spec.greeting_sound.is_some() {
                ctx.emit(SimEvent::Sound {
                    kind: SoundKind::Greeting,
                    droid: bot.kind,
                });
            }
        }

        bot.state_timeout += ctx.dt;
        if bot.state_timeout <= spec.time_spent_eyeing {
            return Transition::to(CombatState::StopAndEyeTarget).moving_to(here);
        }
        bot.state_timeout = 0.0;

        let mut next = CombatState::StopAndEyeTarget;
        if !bot.flags.contains(BotFlags::ATTACK_ONLY_DIRECT_LINE)
            || ctx.can_shoot(spec, here, target, bot.pos.z)
        {
            set_rest_of_group_to_state(ctx.bots, bot.marker, CombatState::Attack);
            next = CombatState::Attack;
        }
        if spec.greeting_sound.is_some() {
            ctx.emit(SimEvent::Sound {
                kind: SoundKind::AttackRun,
                droid: bot.kind,
            });
        }
        Transition::to(next).moving_to(here)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{Fixture, GUNNER, Z, gunner};
    use crate::geometry::Gps;
    use crate::state::AttackTarget;

    fn eyeing(fx: &mut Fixture, marker: i32) -> crate::state::BotId {
        fx.player.pos = Gps::new(8.0, 5.0, Z);
        let mut bot = Bot::new(GUNNER, Gps::new(5.0, 5.0, Z)).with_marker(marker);
        bot.target = AttackTarget::Player;
        fx.spawn(bot)
    }

    #[test]
    fn eyes_then_attacks_with_the_group() {
        let mut fx = Fixture::new();
        let id = eyeing(&mut fx, 5);
        let mate = fx.spawn(Bot::new(GUNNER, Gps::new(2.0, 2.0, Z)).with_marker(5));
        let spec = DroidSpec {
            greeting_sound: Some(1),
            ..gunner()
        };

        let first = fx.with_bot(id, 0.6, |ctx, bot| StopAndEye.run(ctx, bot, &spec));
        assert_eq!(first.next, CombatState::StopAndEyeTarget);
        assert_eq!(first.move_target, Some(fx.bot(id).pos.point()));
        assert!(fx.bot(id).flags.contains(BotFlags::HAS_GREETED));

        let second = fx.with_bot(id, 0.6, |ctx, bot| StopAndEye.run(ctx, bot, &spec));
        assert_eq!(second.next, CombatState::Attack);
        assert_eq!(fx.bot(id).state_timeout, 0.0);
        assert_eq!(fx.bot(mate).state, CombatState::Attack);

        let sounds: Vec<SoundKind> = fx
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Sound { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(sounds, vec![SoundKind::Greeting, SoundKind::AttackRun]);
    }

    #[test]
    fn lost_target_resumes_patrol() {
        let mut fx = Fixture::new();
        let id = fx.spawn_at(GUNNER, 5.0, 5.0);
        fx.bots.get_mut(id).unwrap().state_timeout = 0.4;
        let spec = gunner();
        let t = fx.with_bot(id, 0.1, |ctx, bot| StopAndEye.run(ctx, bot, &spec));
        assert_eq!(t.next, CombatState::SelectNewWaypoint);
        assert_eq!(fx.bot(id).state_timeout, 0.0);
    }

    #[test]
    fn direct_line_attackers_wait_for_a_clear_path() {
        let mut fx = Fixture::new();
        fx.block(6.5, 5.0);
        let id = eyeing(&mut fx, 0);
        fx.bots
            .get_mut(id)
            .unwrap()
            .flags
            .insert(BotFlags::ATTACK_ONLY_DIRECT_LINE);
        let spec = gunner();
        let t = fx.with_bot(id, 2.0, |ctx, bot| StopAndEye.run(ctx, bot, &spec));
        assert_eq!(t.next, CombatState::StopAndEyeTarget);
    }
}
