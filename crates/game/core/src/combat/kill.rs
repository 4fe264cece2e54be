//! Death of a bot.
use tracing::{debug, warn};

use crate::ai::TickContext;
use crate::ai::animation::start_death;
use crate::config::SimConfig;
use crate::env::DroidSpec;
use crate::error::inform_developers;
use crate::events::{Killer, SimEvent, SoundKind};
use crate::state::Bot;

use super::blood::spray_blood;
use super::treasure::drop_treasure;

/// Finishes off a bot whose energy dropped to zero.
///
/// Awards experience, reports the death, drops loot and moves the bot to
/// the dead list. Loot and the death animation need the bot inside its
/// level; a bot outside is still removed.
pub fn kill_bot(
    ctx: &mut TickContext<'_>,
    bot: &mut Bot,
    spec: &DroidSpec,
    killer: Killer,
    grant_xp: bool,
) {
    let grant_xp = grant_xp && !bot.is_friendly();
    if grant_xp {
        ctx.player.experience += u64::from(spec.experience_reward);
    }
    let message = death_message(ctx, bot, spec, killer, grant_xp);
    ctx.emit(SimEvent::Message(message));

    let inside = ctx
        .ship
        .level(bot.pos.z)
        .is_some_and(|level| level.contains_strict(bot.pos.point()));
    if inside {
        ctx.player.record_kill(bot.kind);
        drop_treasure(ctx, bot, spec);
        start_death(bot, &spec.animation);
        ctx.emit(SimEvent::Sound {
            kind: SoundKind::Death,
            droid: bot.kind,
        });
        if ctx.rng.random_int(SimConfig::BLOOD_ON_DEATH_CHANCE) == 1 {
            spray_blood(ctx, bot, spec);
        }
    } else {
        inform_developers(
            "kills",
            &format!("bot {} died outside {} at {}", bot.id, bot.pos.z, bot.pos),
        );
    }

    if let Err(err) = ctx.bots.kill(bot.id) {
        warn!(bot = %bot.id, %err, "dead bot was not on the alive list");
    }
    bot.speed = Default::default();
    bot.stand_still();
    bot.target = Default::default();
    debug!(bot = %bot.id, ?killer, "bot died");
    ctx.emit(SimEvent::BotDied {
        bot: bot.id,
        kind: bot.kind,
        killer,
        pos: bot.pos,
    });
}

fn death_message(
    ctx: &TickContext<'_>,
    bot: &Bot,
    spec: &DroidSpec,
    killer: Killer,
    grant_xp: bool,
) -> String {
    let name = &spec.name;
    let killer_name = match killer {
        Killer::Bot(kind) => ctx.oracles.droid(kind).ok().map(|s| s.name.as_str()),
        Killer::Player | Killer::Unknown => None,
    };

    if bot.is_friendly() {
        return match (killer, killer_name) {
            (_, Some(other)) => format!("Your friend {name} was killed by {other}."),
            (Killer::Player, _) => format!("You killed {name}."),
            _ => format!("{name} is dead."),
        };
    }
    match killer_name {
        _ if grant_xp => format!(
            "For defeating {name}, you receive {} experience.",
            spec.experience_reward
        ),
        Some(other) => format!("{name} was killed by {other}."),
        None => format!("{name} died."),
    }
}
