//! Fire-and-forget notifications emitted by the simulation.
//!
//! The core never consumes these; a front end plays sounds, shows messages,
//! spawns bullets and drops items in response.
use crate::env::{BotPart, DroidType};
use crate::geometry::{Gps, LevelId, Point};
use crate::state::BotId;

/// Who dealt the final blow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Killer {
    Player,
    Bot(DroidType),
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SoundKind {
    Greeting,
    AttackRun,
    GotHit,
    Death,
    Fire,
}

/// What an item drop request asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemDrop {
    Part(BotPart),
    /// A specific item code forced by the bot's placement.
    Item(u32),
    /// One roll on the random drop table.
    Random { monster_level: u32 },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimEvent {
    /// Text for the in-game message log.
    Message(String),
    Sound {
        kind: SoundKind,
        droid: DroidType,
    },
    BotDied {
        bot: BotId,
        kind: DroidType,
        killer: Killer,
        pos: Gps,
    },
    ItemDropped {
        item: ItemDrop,
        pos: Gps,
    },
    BulletFired {
        shooter: BotId,
        bullet_kind: u16,
        pos: Gps,
        velocity: Point,
        damage: u32,
        lifetime: f32,
        to_hit: u32,
    },
    /// Melee strike against the player; resolving it belongs to the player side.
    MeleeOnPlayer {
        attacker: BotId,
        damage: u32,
        to_hit: u32,
    },
    ChatRequested {
        bot: BotId,
    },
    LevelChanged {
        bot: BotId,
        from: LevelId,
        to: LevelId,
    },
}

/// Receives simulation events.
pub trait EventSink {
    fn emit(&mut self, event: SimEvent);
}

impl EventSink for Vec<SimEvent> {
    fn emit(&mut self, event: SimEvent) {
        self.push(event);
    }
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: SimEvent) {}
}
