//! Bots firing their weapons.
use tracing::{debug, warn};

use crate::ai::TickContext;
use crate::ai::animation::start_attack;
use crate::ai::targeting::resolve_target;
use crate::colldet::update_virtual_position;
use crate::config::SimConfig;
use crate::env::DroidSpec;
use crate::events::{SimEvent, SoundKind};
use crate::geometry::{Point, normalize_towards};
use crate::state::{AttackTarget, Bot, BotHandle};

use super::hit::{Hit, apply_hit};

/// Fires one shot from `bot` at `target`, given in the bot's level frame.
///
/// Ranged weapons emit a bullet; melee weapons strike the target directly.
/// Either way one round is spent and the weapon cools down.
pub fn fire_shot(ctx: &mut TickContext<'_>, bot: &mut Bot, spec: &DroidSpec, target: Point) {
    let weapon = &spec.weapon;
    let aim = target - bot.pos.point();
    let damage = weapon.base_damage + ctx.rng.random_int(weapon.damage_modifier);

    if weapon.melee {
        match bot.target {
            AttackTarget::Player => ctx.emit(SimEvent::MeleeOnPlayer {
                attacker: bot.id,
                damage,
                to_hit: SimConfig::MELEE_TO_HIT_PER_LEVEL * spec.monster_level,
            }),
            AttackTarget::Bot(handle) => melee_on_bot(ctx, bot, spec, handle, damage),
            AttackTarget::None => return,
        }
    } else {
        let dir = normalize_towards(Point::ORIGIN, aim).unwrap_or(Point::new(0.0, 1.0));
        let start = bot.pos.point() + dir * SimConfig::BULLET_START_OFFSET;
        ctx.emit(SimEvent::BulletFired {
            shooter: bot.id,
            bullet_kind: weapon.bullet_kind,
            pos: bot.pos.with_point(start),
            velocity: (dir * weapon.bullet_speed).rotated(weapon.start_angle_modifier),
            damage,
            lifetime: weapon.bullet_lifetime,
            to_hit: spec.to_hit,
        });
    }

    bot.ammo_left = bot.ammo_left.saturating_sub(1);
    if bot.ammo_left > 0 {
        bot.firewait += weapon.recharge_time;
    } else {
        bot.ammo_left = weapon.clip_size;
        bot.firewait = bot.firewait.max(weapon.reload_time);
    }
    bot.firewait = bot.firewait.max(weapon.recharge_time);

    if start_attack(bot, &spec.animation) {
        bot.current_angle = 90.0 - aim.y.atan2(aim.x).to_degrees();
    }
    ctx.emit(SimEvent::Sound {
        kind: SoundKind::Fire,
        droid: bot.kind,
    });
}

/// Resolves a melee strike against another bot on the spot.
fn melee_on_bot(
    ctx: &mut TickContext<'_>,
    attacker: &Bot,
    spec: &DroidSpec,
    handle: BotHandle,
    damage: u32,
) {
    let Some((victim_id, victim_pos)) = resolve_target(&*ctx.bots, handle).map(|v| (v.id, v.pos))
    else {
        return;
    };
    let in_reach = update_virtual_position(&*ctx.ship, victim_pos, attacker.pos.z)
        .is_some_and(|pos| pos.point().sq_distance(attacker.pos.point()) <= SimConfig::SQUARED_MELEE_MAX_DIST);
    let to_hit = SimConfig::MELEE_TO_HIT_PER_LEVEL * spec.monster_level;
    if !in_reach || ctx.rng.random_int(99) >= to_hit {
        debug!(attacker = %attacker.id, victim = %victim_id, "melee missed");
        return;
    }

    let Some(mut victim) = ctx.bots.take(victim_id) else {
        return;
    };
    match ctx.oracles.droid(victim.kind) {
        Ok(victim_spec) => {
            apply_hit(ctx, &mut victim, victim_spec, Hit::by_bot(damage as f32, attacker.kind));
        }
        Err(err) => warn!(victim = %victim_id, %err, "melee victim has no droid type"),
    }
    if let Err(err) = ctx.bots.restore(victim) {
        warn!(%err, "melee victim vanished");
    }
}
