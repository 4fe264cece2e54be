//! Bots sharing a marker act as one group.
use crate::config::SimConfig;
use crate::env::Faction;
use crate::state::{BotFlags, BotRegistry, CombatState};

#[inline]
pub fn is_grouped(marker: i32) -> bool {
    !SimConfig::UNGROUPED_MARKERS.contains(&marker)
}

/// Puts every other alive bot with `marker` into `state`.
///
/// The caller's own bot is taken out of the registry while it runs, so it is
/// never touched here.
pub fn set_rest_of_group_to_state(bots: &mut BotRegistry, marker: i32, state: CombatState) {
    if !is_grouped(marker) {
        return;
    }
    for id in bots.alive_ids() {
        if let Some(bot) = bots.get_mut(id)
            && bot.marker == marker
        {
            bot.state = state;
        }
    }
}

/// Turns every alive bot with `marker` hostile, except those the player
/// has taken over.
pub fn group_turn_hostile(bots: &mut BotRegistry, marker: i32) {
    if !is_grouped(marker) {
        return;
    }
    for id in bots.alive_ids() {
        if let Some(bot) = bots.get_mut(id)
            && bot.marker == marker
            && !bot.flags.contains(BotFlags::TAKEN_OVER)
        {
            bot.faction = Faction::Hostile;
        }
    }
}
