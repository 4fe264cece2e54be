//! Damage dealt to bots.
use tracing::debug;

use crate::ai::TickContext;
use crate::ai::animation::start_gethit;
use crate::config::SimConfig;
use crate::env::{DroidSpec, DroidType, Faction};
use crate::events::{Killer, SimEvent, SoundKind};
use crate::state::{Bot, BotFlags};

use super::blood::spray_blood;
use super::group::group_turn_hostile;
use super::kill::kill_bot;

/// One blow against a bot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub amount: f32,
    /// Whether killing the victim may award the player experience.
    pub grant_xp: bool,
    pub killer: Killer,
    /// Dealt by the player; turns the victim's group hostile.
    pub by_player: bool,
}

impl Hit {
    pub fn by_player(amount: f32) -> Self {
        Self {
            amount,
            grant_xp: true,
            killer: Killer::Player,
            by_player: true,
        }
    }

    pub fn by_bot(amount: f32, kind: DroidType) -> Self {
        Self {
            amount,
            grant_xp: false,
            killer: Killer::Bot(kind),
            by_player: false,
        }
    }

    /// Poison, traps and other damage nobody is credited for.
    pub fn environmental(amount: f32) -> Self {
        Self {
            amount,
            grant_xp: false,
            killer: Killer::Unknown,
            by_player: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// The victim was already dead.
    Ignored,
    Wounded,
    Killed,
}

/// Applies `hit` to `victim`, the only way bots lose energy.
///
/// Hits of at least [`SimConfig::HIT_STUN_RATIO`] of the maximum energy
/// stun the victim for its recovery time. A victim whose energy drops to
/// zero or below is killed exactly once; later hits are ignored.
pub fn apply_hit(
    ctx: &mut TickContext<'_>,
    victim: &mut Bot,
    spec: &DroidSpec,
    hit: Hit,
) -> HitOutcome {
    if !victim.is_alive() {
        return HitOutcome::Ignored;
    }
    let grant_xp = hit.grant_xp && !victim.is_friendly();

    if hit.by_player && !victim.flags.contains(BotFlags::TAKEN_OVER) {
        victim.faction = Faction::Hostile;
        group_turn_hostile(ctx.bots, victim.marker);
    }

    if spec.max_energy > 0.0 && hit.amount / spec.max_energy >= SimConfig::HIT_STUN_RATIO {
        victim.firewait = victim.firewait.max(spec.recover_time_after_hit);
        start_gethit(victim, &spec.animation);
    }

    victim.energy -= hit.amount;
    debug!(bot = %victim.id, amount = hit.amount, energy = victim.energy, "hit");
    if victim.energy <= 0.0 {
        kill_bot(ctx, victim, spec, hit.killer, grant_xp);
        return HitOutcome::Killed;
    }

    if hit.amount > 1.0 && ctx.rng.random_int(SimConfig::BLOOD_ON_HIT_CHANCE) == 0 {
        spray_blood(ctx, victim, spec);
    }
    ctx.emit(SimEvent::Sound {
        kind: SoundKind::GotHit,
        droid: victim.kind,
    });
    HitOutcome::Wounded
}
