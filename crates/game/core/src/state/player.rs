use std::collections::{BTreeMap, VecDeque};

use crate::env::{DroidType, Faction, Sensor};
use crate::geometry::Gps;

/// The parts of the player the bot simulation reads and updates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub pos: Gps,
    pub faction: Faction,
    pub invisible_duration: f32,
    /// Bots do not rush a player who is already talking.
    pub in_dialog: bool,
    pub experience: u64,
    /// "Extract bot parts" skill level, expected in `0..=6`.
    pub extract_parts_skill: i32,
    pub kill_record: BTreeMap<DroidType, u32>,
    /// Most recent position last.
    history: VecDeque<Gps>,
}

impl Player {
    pub const MAX_EXTRACT_SKILL: i32 = 6;

    pub fn new(pos: Gps) -> Self {
        Self {
            pos,
            faction: Faction::Friendly,
            invisible_duration: 0.0,
            in_dialog: false,
            experience: 0,
            extract_parts_skill: 0,
            kill_record: BTreeMap::new(),
            history: VecDeque::new(),
        }
    }

    pub fn is_invisible(&self) -> bool {
        self.invisible_duration > 0.0
    }

    /// Whether a bot with `sensor` can perceive the player at all.
    pub fn visible_to(&self, sensor: Sensor) -> bool {
        !self.is_invisible() || sensor.sees_invisible()
    }

    /// Appends the current position, keeping at most `capacity` entries.
    pub fn record_position(&mut self, capacity: usize) {
        self.history.push_back(self.pos);
        while self.history.len() > capacity.max(1) {
            self.history.pop_front();
        }
    }

    /// Position recorded `frames` frames ago, or the oldest one available.
    pub fn delayed_position(&self, frames: usize) -> Gps {
        let len = self.history.len();
        if len == 0 {
            return self.pos;
        }
        let back = frames.min(len - 1);
        self.history.get(len - 1 - back).copied().unwrap_or(self.pos)
    }

    pub fn record_kill(&mut self, kind: DroidType) {
        *self.kill_record.entry(kind).or_default() += 1;
    }

    pub fn kills(&self, kind: DroidType) -> u32 {
        self.kill_record.get(&kind).copied().unwrap_or(0)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Gps::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LevelId;

    #[test]
    fn history_is_bounded_and_delayed() {
        let mut player = Player::default();
        for x in 0..10 {
            player.pos = Gps::new(x as f32, 0.0, LevelId(0));
            player.record_position(4);
        }
        assert_eq!(player.delayed_position(0).x, 9.0);
        assert_eq!(player.delayed_position(2).x, 7.0);
        // older than the history: oldest entry
        assert_eq!(player.delayed_position(50).x, 6.0);
    }

    #[test]
    fn invisibility_is_seen_by_infrared_only() {
        let mut player = Player::default();
        assert!(player.visible_to(Sensor::Spectral));
        player.invisible_duration = 3.0;
        assert!(!player.visible_to(Sensor::Spectral));
        assert!(!player.visible_to(Sensor::XRay));
        assert!(player.visible_to(Sensor::Infrared));
    }
}
