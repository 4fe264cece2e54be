//! Loot dropped by destroyed bots.
use strum::IntoEnumIterator;

use crate::ai::TickContext;
use crate::config::SimConfig;
use crate::env::{BotPart, DroidSpec};
use crate::error::inform_developers;
use crate::events::{ItemDrop, SimEvent};
use crate::state::{Bot, Player};

/// Emits the drop requests for a bot that just died.
///
/// Rare parts come first: the player's extraction skill unlocks the parts
/// from the top of the cascade down, and each unlocked part the droid type
/// carries drops with one chance in `PART_DROP_CHANCE + 1`. Then the bot's
/// forced item, then one roll on the random table.
pub fn drop_treasure(ctx: &mut TickContext<'_>, bot: &mut Bot, spec: &DroidSpec) {
    let pos = bot.pos;
    let skill = extraction_skill(ctx.player);

    for part in BotPart::iter() {
        if i32::from(part.required_skill()) > skill || !spec.carries(part) {
            continue;
        }
        if ctx.rng.random_int(SimConfig::PART_DROP_CHANCE) == 1 {
            ctx.emit(SimEvent::ItemDropped {
                item: ItemDrop::Part(part),
                pos,
            });
        }
    }

    if let Some(code) = bot.on_death_drop.take() {
        if code > 0 && code < ctx.config.item_type_count {
            ctx.emit(SimEvent::ItemDropped {
                item: ItemDrop::Item(code),
                pos,
            });
        } else {
            inform_developers(
                "loot",
                &format!("bot {} carries invalid forced drop {code}; skipped", bot.id),
            );
        }
    }

    ctx.emit(SimEvent::ItemDropped {
        item: ItemDrop::Random {
            monster_level: spec.monster_level,
        },
        pos,
    });
}

fn extraction_skill(player: &Player) -> i32 {
    let skill = player.extract_parts_skill;
    if (0..=Player::MAX_EXTRACT_SKILL).contains(&skill) {
        return skill;
    }
    inform_developers(
        "loot",
        &format!("extraction skill {skill} out of range; clamped"),
    );
    skill.clamp(0, Player::MAX_EXTRACT_SKILL)
}
