//! Arena of bots with alive/dead and per-level index sets.
use std::collections::BTreeMap;

use crate::env::{DroidSpec, RngOracle};
use crate::geometry::LevelId;
use crate::map::Ship;

use super::{Bot, BotHandle, BotId, CombatState, RegistryError};

/// Owns every bot. Slots are stable for the lifetime of the registry; moving a
/// bot between lists only updates id sets.
#[derive(Clone, Debug, Default)]
pub struct BotRegistry {
    slots: Vec<Option<Bot>>,
    index: BTreeMap<BotId, usize>,
    alive: Vec<BotId>,
    dead: Vec<BotId>,
    levels: BTreeMap<LevelId, Vec<BotId>>,
    epoch: u32,
    next_id: u32,
}

impl BotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new bot: assigns the next id, fills energy and ammo from
    /// `spec`, resets the state machine and staggers the stuck-check timer.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownLevel` if the bot's level does not exist.
    pub fn spawn(
        &mut self,
        ship: &Ship,
        spec: &DroidSpec,
        mut bot: Bot,
        rng: &mut dyn RngOracle,
    ) -> Result<BotId, RegistryError> {
        let id = BotId(self.next_id);
        if ship.level(bot.pos.z).is_none() {
            return Err(RegistryError::UnknownLevel {
                id,
                level: bot.pos.z,
            });
        }
        bot.id = id;
        bot.energy = spec.max_energy;
        bot.ammo_left = spec.weapon.clip_size;
        bot.state = CombatState::WaypointlessWandering;
        bot.stuck_timer = rng.random_int(999) as f32 / 1000.0;
        self.next_id += 1;
        self.place(bot);
        Ok(id)
    }

    /// Registers a bot that already carries an id (e.g. restored from content).
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateBot` if the id is taken and
    /// `RegistryError::UnknownLevel` if the bot's level does not exist.
    pub fn insert(&mut self, ship: &Ship, bot: Bot) -> Result<BotId, RegistryError> {
        let id = bot.id;
        if self.index.contains_key(&id) {
            return Err(RegistryError::DuplicateBot { id });
        }
        if ship.level(bot.pos.z).is_none() {
            return Err(RegistryError::UnknownLevel {
                id,
                level: bot.pos.z,
            });
        }
        self.next_id = self.next_id.max(id.0 + 1);
        self.place(bot);
        Ok(id)
    }

    fn place(&mut self, bot: Bot) {
        let id = bot.id;
        if bot.is_alive() {
            self.alive.push(id);
            self.levels.entry(bot.pos.z).or_default().push(id);
        } else {
            self.dead.push(id);
        }
        self.index.insert(id, self.slots.len());
        self.slots.push(Some(bot));
    }

    pub fn get(&self, id: BotId) -> Option<&Bot> {
        let slot = *self.index.get(&id)?;
        self.slots.get(slot)?.as_ref()
    }

    pub fn get_mut(&mut self, id: BotId) -> Option<&mut Bot> {
        let slot = *self.index.get(&id)?;
        self.slots.get_mut(slot)?.as_mut()
    }

    /// Moves a bot out of its slot so it can be simulated while the rest of
    /// the registry is read. Lookups of a taken bot return `None` until it is
    /// [`restored`](Self::restore).
    pub fn take(&mut self, id: BotId) -> Option<Bot> {
        let slot = *self.index.get(&id)?;
        self.slots.get_mut(slot)?.take()
    }

    /// Puts a taken bot back into its slot.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownBot` if the bot was never registered.
    pub fn restore(&mut self, bot: Bot) -> Result<(), RegistryError> {
        let id = bot.id;
        let slot = self
            .index
            .get(&id)
            .and_then(|&slot| self.slots.get_mut(slot))
            .ok_or(RegistryError::UnknownBot { id })?;
        *slot = Some(bot);
        Ok(())
    }

    pub fn is_alive(&self, id: BotId) -> bool {
        self.alive.contains(&id)
    }

    /// Moves a bot from the alive list to the dead list and out of its level.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownBot` if the bot is not alive.
    pub fn kill(&mut self, id: BotId) -> Result<(), RegistryError> {
        let at = self
            .alive
            .iter()
            .position(|&alive| alive == id)
            .ok_or(RegistryError::UnknownBot { id })?;
        self.alive.remove(at);
        for members in self.levels.values_mut() {
            members.retain(|&member| member != id);
        }
        self.dead.push(id);
        Ok(())
    }

    /// Moves an alive bot's membership from level `from` to level `to`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownBot` if the bot is not alive.
    pub fn relocate(&mut self, id: BotId, from: LevelId, to: LevelId) -> Result<(), RegistryError> {
        if !self.is_alive(id) {
            return Err(RegistryError::UnknownBot { id });
        }
        if let Some(members) = self.levels.get_mut(&from) {
            members.retain(|&member| member != id);
        }
        self.levels.entry(to).or_default().push(id);
        Ok(())
    }

    /// Drops every bot. Handles issued before this call become stale.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.alive.clear();
        self.dead.clear();
        self.levels.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn handle(&self, id: BotId) -> BotHandle {
        BotHandle {
            id,
            epoch: self.epoch,
        }
    }

    /// The bot behind `handle`, if the handle is current and the bot exists.
    pub fn resolve(&self, handle: BotHandle) -> Option<&Bot> {
        if handle.epoch != self.epoch {
            return None;
        }
        self.get(handle.id)
    }

    /// Refreshes a stale handle by looking its id up again.
    pub fn revalidate(&self, handle: BotHandle) -> Option<BotHandle> {
        self.index
            .contains_key(&handle.id)
            .then(|| self.handle(handle.id))
    }

    /// Snapshot of the alive ids in insertion order; safe to iterate while
    /// bots die.
    pub fn alive_ids(&self) -> Vec<BotId> {
        self.alive.clone()
    }

    pub fn dead_ids(&self) -> Vec<BotId> {
        self.dead.clone()
    }

    /// Snapshot of the alive ids on level `z`.
    pub fn ids_on_level(&self, z: LevelId) -> Vec<BotId> {
        self.levels.get(&z).cloned().unwrap_or_default()
    }

    /// Alive bots on level `z`, skipping any that are currently taken.
    pub fn bots_on_level(&self, z: LevelId) -> impl Iterator<Item = &Bot> + '_ {
        self.levels
            .get(&z)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.get(id))
    }

    /// Alive bots, skipping any that are currently taken.
    pub fn alive_bots(&self) -> impl Iterator<Item = &Bot> + '_ {
        self.alive.iter().filter_map(|&id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
