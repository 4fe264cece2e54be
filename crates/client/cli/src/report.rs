//! Aggregation of simulation events for the run summary.
use std::collections::BTreeMap;
use std::fmt;

use droid_core::{EventSink, SimEvent};

/// Counts events by kind and keeps the message log.
#[derive(Debug, Default)]
pub struct Report {
    counts: BTreeMap<&'static str, u32>,
    messages: Vec<String>,
}

impl Report {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn count(&self, kind: &str) -> u32 {
        self.counts.get(kind).copied().unwrap_or(0)
    }
}

impl EventSink for Report {
    fn emit(&mut self, event: SimEvent) {
        let kind = match &event {
            SimEvent::Message(text) => {
                self.messages.push(text.clone());
                "message"
            }
            SimEvent::Sound { .. } => "sound",
            SimEvent::BotDied { .. } => "death",
            SimEvent::ItemDropped { .. } => "item_drop",
            SimEvent::BulletFired { .. } => "bullet",
            SimEvent::MeleeOnPlayer { .. } => "melee_on_player",
            SimEvent::ChatRequested { .. } => "chat",
            SimEvent::LevelChanged { .. } => "level_change",
        };
        *self.counts.entry(kind).or_default() += 1;
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, count) in &self.counts {
            writeln!(f, "{kind:>16}: {count}")?;
        }
        for message in &self.messages {
            writeln!(f, "  > {message}")?;
        }
        Ok(())
    }
}
