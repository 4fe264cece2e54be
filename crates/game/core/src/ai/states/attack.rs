use crate::ai::TickContext;
use crate::ai::targeting::target_position;
use crate::colldet::{CharacterProximity, CollisionFilter};
use crate::combat::fire_shot;
use crate::config::SimConfig;
use crate::env::DroidSpec;
use crate::geometry::Point;
use crate::state::{AnimationKind, Bot, BotFlags, CombatState};

use super::{StateHandler, Transition};

/// Step rotations tried, in order, when the direct step is not possible.
const REPOSITION_ANGLES: [f32; 7] = [0.0, 30.0, 330.0, 60.0, 300.0, 90.0, 270.0];

/// Below this offset on both axes two characters count as on top of each other.
const SAME_SPOT: f32 = 0.01;

/// Closes in on or backs away from the target, and fires whenever the
/// weapon is ready.
///
/// Movement decisions are throttled by `attack_move_rate`; a melee bot
/// approaches until it is in reach, a ranged bot keeps between
/// [`SimConfig::MIN_RANGED_SQ_DIST`] and its weapon range.
pub struct Attack;

impl StateHandler for Attack {
    fn run(&self, ctx: &mut TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) -> Transition {
        let here = bot.pos.point();
        let z = bot.pos.z;
        let Some(target) =
            target_position(ctx, bot).filter(|&t| ctx.can_shoot(spec, here, t, z))
        else {
            return Transition::to(CombatState::SelectNewWaypoint);
        };
        let d2 = here.sq_distance(target);
        let melee = spec.weapon.melee;

        let mut result = Transition::to(CombatState::Attack);
        if bot.last_combat_step > ctx.config.attack_move_rate {
            bot.last_combat_step = 0.0;
            if !bot.flags.contains(BotFlags::COMPLETELY_FIXED)
                && let Some(sign) = step_direction(spec, d2)
                && let Some(spot) = reposition(ctx, bot, target, sign)
            {
                result = result.moving_to(spot);
            }
        }

        if melee && d2 > SimConfig::SQUARED_MELEE_APPROACH_DIST {
            return result;
        }
        if bot.firewait > 0.0
            || !matches!(bot.animation.kind, AnimationKind::Walk | AnimationKind::Stand)
        {
            return result;
        }
        fire_shot(ctx, bot, spec, target);
        result
    }
}

/// `+1` to close in, `-3` to back off a third of a tile, `None` to hold.
fn step_direction(spec: &DroidSpec, d2: f32) -> Option<f32> {
    if spec.weapon.melee {
        return (d2 > SimConfig::SQUARED_MELEE_APPROACH_DIST).then_some(1.0);
    }
    let range = spec.weapon.range();
    if d2 < SimConfig::MIN_RANGED_SQ_DIST {
        Some(-3.0)
    } else if d2 > range * range {
        Some(1.0)
    } else {
        None
    }
}

/// First rotated step towards (or away from) `target` that lands on free
/// floor along a path no other character blocks.
fn reposition(ctx: &mut TickContext<'_>, bot: &Bot, target: Point, sign: f32) -> Option<Point> {
    let here = bot.pos.point();
    let z = bot.pos.z;
    let mut offset = target - here;
    if offset.x.abs() < SAME_SPOT && offset.y.abs() < SAME_SPOT {
        offset = if ctx.rng.random_int(1) == 1 {
            Point::new(3.0, 3.0)
        } else {
            Point::new(-3.0, -3.0)
        };
    }
    let step = offset * (1.0 / (sign * offset.length()));

    let map = ctx.map();
    let mut proximity = CharacterProximity::new(&*ctx.bots).excluding(Some(bot.id), None);
    if let Some(player) = ctx.player_in(z) {
        proximity = proximity.with_player(player);
    }
    REPOSITION_ANGLES
        .iter()
        .map(|&angle| here + step.rotated(angle))
        .find(|&spot| {
            !map.point_blocked(spot, z, Some(&CollisionFilter::WALKABLE))
                && proximity.is_segment_free(here, spot, z)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{BRAWLER, Fixture, GUNNER, Z, brawler, gunner};
    use crate::events::SimEvent;
    use crate::geometry::Gps;
    use crate::state::{AttackTarget, BotId};

    fn attacker(fx: &mut Fixture, kind: crate::env::DroidType, x: f32) -> BotId {
        let mut bot = Bot::new(kind, Gps::new(x, 5.0, Z));
        bot.target = AttackTarget::Player;
        fx.spawn(bot)
    }

    fn fired(fx: &Fixture) -> bool {
        fx.events.iter().any(|e| {
            matches!(
                e,
                SimEvent::BulletFired { .. } | SimEvent::MeleeOnPlayer { .. }
            )
        })
    }

    #[test]
    fn ranged_bot_backs_off_and_fires() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(10.0, 5.0, Z);
        let id = attacker(&mut fx, GUNNER, 9.0);
        let spec = gunner();
        let t = fx.with_bot(id, 0.1, |ctx, bot| Attack.run(ctx, bot, &spec));

        assert_eq!(t.next, CombatState::Attack);
        let spot = t.move_target.unwrap();
        assert!((spot.x - (9.0 - 1.0 / 3.0)).abs() < 1e-3);
        assert!((spot.y - 5.0).abs() < 1e-3);
        assert!(fired(&fx));
        assert_eq!(fx.bot(id).last_combat_step, 0.0);
    }

    #[test]
    fn ranged_bot_in_range_holds_position() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(10.0, 5.0, Z);
        let id = attacker(&mut fx, GUNNER, 5.0);
        let spec = gunner();
        let t = fx.with_bot(id, 0.1, |ctx, bot| Attack.run(ctx, bot, &spec));
        assert_eq!(t.move_target, None);
        assert!(fired(&fx));
    }

    #[test]
    fn ranged_bot_out_of_range_closes_in() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(17.0, 5.0, Z);
        let id = attacker(&mut fx, GUNNER, 5.0);
        let spec = gunner();
        let t = fx.with_bot(id, 0.1, |ctx, bot| Attack.run(ctx, bot, &spec));
        let spot = t.move_target.unwrap();
        assert!((spot.x - 6.0).abs() < 1e-3);
    }

    #[test]
    fn occupied_step_tries_rotations() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(12.0, 5.0, Z);
        let id = attacker(&mut fx, BRAWLER, 5.0);
        let spec = brawler();
        let t = fx.with_bot(id, 0.1, |ctx, bot| Attack.run(ctx, bot, &spec));
        let spot = t.move_target.unwrap();
        assert!((spot.x - 6.0).abs() < 1e-3);

        // someone stands on the straight step now
        fx.spawn_at(GUNNER, 6.0, 5.2);
        fx.bots.get_mut(id).unwrap().last_combat_step = 1.0;
        let t = fx.with_bot(id, 0.1, |ctx, bot| Attack.run(ctx, bot, &spec));
        let spot = t.move_target.unwrap();
        assert!((spot.y - 4.5).abs() < 1e-3, "took the 30 degree step: {spot:?}");
    }

    #[test]
    fn melee_bot_out_of_reach_does_not_strike() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(9.0, 5.0, Z);
        let id = attacker(&mut fx, BRAWLER, 5.0);
        let spec = brawler();
        fx.with_bot(id, 0.1, |ctx, bot| Attack.run(ctx, bot, &spec));
        assert!(!fired(&fx));
    }

    #[test]
    fn cooling_weapon_and_throttle() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(6.0, 5.0, Z);
        let id = attacker(&mut fx, BRAWLER, 5.0);
        {
            let bot = fx.bots.get_mut(id).unwrap();
            bot.firewait = 0.3;
            bot.last_combat_step = 0.1;
        }
        let spec = brawler();
        let t = fx.with_bot(id, 0.1, |ctx, bot| Attack.run(ctx, bot, &spec));
        assert_eq!(t.move_target, None);
        assert!(!fired(&fx));
        assert_eq!(fx.bot(id).last_combat_step, 0.1);
    }

    #[test]
    fn wall_between_ends_the_attack() {
        let mut fx = Fixture::new();
        fx.player.pos = Gps::new(9.0, 5.0, Z);
        fx.block(7.0, 5.0);
        let id = attacker(&mut fx, GUNNER, 5.0);
        let spec = gunner();
        let t = fx.with_bot(id, 0.1, |ctx, bot| Attack.run(ctx, bot, &spec));
        assert_eq!(t.next, CombatState::SelectNewWaypoint);
    }
}
