//! Frame stepping.
//!
//! The [`SimEngine`] advances a [`World`] by one frame: timers and poison,
//! the periodic healing pass, then every bot on the levels around the
//! player. Bots on far away levels are frozen until the player comes close.

mod errors;

pub use errors::EngineError;

use tracing::{debug, trace};

use crate::ai::{self, TickContext};
use crate::combat::{Hit, apply_hit};
use crate::config::SimConfig;
use crate::env::{DroidSpec, Env, Oracles};
use crate::events::EventSink;
use crate::geometry::LevelId;
use crate::state::{Bot, BotId, World};

/// Drives the simulation of one [`World`].
pub struct SimEngine<'a> {
    world: &'a mut World,
}

impl<'a> SimEngine<'a> {
    pub fn new(world: &'a mut World) -> Self {
        Self { world }
    }

    /// Advances the world by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Fails when an oracle is missing from `env`, when a bot references a
    /// droid type the tables do not know, or when `dt` is not a usable
    /// frame length. The world may be partially advanced in the latter cases.
    pub fn step(
        &mut self,
        env: Env<'_>,
        config: &SimConfig,
        dt: f32,
        events: &mut dyn EventSink,
    ) -> Result<(), EngineError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(EngineError::InvalidFrame(dt));
        }
        let oracles = env.oracles()?;

        self.world.player.record_position(config.player_history_len);
        self.heal(oracles, config, dt)?;

        for id in self.world.bots.alive_ids() {
            self.update_timers(id, oracles, config, dt, events)?;
        }

        let active = self.world.ship.neighborhood(self.world.player.pos.z);
        for id in self.world.bots.dead_ids() {
            self.animate(id, oracles, dt)?;
        }
        for id in self.world.bots.alive_ids() {
            let Some(z) = self.world.bots.get(id).map(|bot| bot.pos.z) else {
                continue;
            };
            if !active.contains(&z) {
                continue;
            }
            self.animate(id, oracles, dt)?;
            self.simulate(id, oracles, config, dt, events)?;
        }
        Ok(())
    }

    /// Scatters the bots of level `z` over its waypoints.
    pub fn shuffle_level(&mut self, z: LevelId) {
        let world = &mut *self.world;
        ai::shuffle_level(&world.ship, &mut world.bots, z, &mut *world.rng);
    }

    /// Every `heal_interval` seconds each living bot regains
    /// `lose_health * heal_interval` energy, capped at its maximum.
    fn heal(&mut self, oracles: Oracles<'_>, config: &SimConfig, dt: f32) -> Result<(), EngineError> {
        self.world.heal_timer += dt;
        if self.world.heal_timer < config.heal_interval {
            return Ok(());
        }
        self.world.heal_timer = 0.0;

        for id in self.world.bots.alive_ids() {
            let Some(bot) = self.world.bots.get_mut(id) else {
                continue;
            };
            let spec = oracles.droid(bot.kind)?;
            let gain = (spec.lose_health * config.heal_interval).floor();
            bot.energy = (bot.energy + gain).min(spec.max_energy);
        }
        trace!("healing pass");
        Ok(())
    }

    fn update_timers(
        &mut self,
        id: BotId,
        oracles: Oracles<'_>,
        config: &SimConfig,
        dt: f32,
        events: &mut dyn EventSink,
    ) -> Result<(), EngineError> {
        let Some(bot) = self.world.bots.get_mut(id) else {
            return Ok(());
        };
        let poison = if bot.status.poison_duration > 0.0 {
            bot.status.poison_dps * dt
        } else {
            0.0
        };
        bot.tick_timers(dt);
        if bot.status.poison_duration <= 0.0 {
            bot.status.poison_dps = 0.0;
        }
        if poison <= 0.0 {
            return Ok(());
        }

        self.with_bot(id, oracles, config, dt, events, |ctx, bot, spec| {
            apply_hit(ctx, bot, spec, Hit::environmental(poison));
        })
    }

    fn animate(&mut self, id: BotId, oracles: Oracles<'_>, dt: f32) -> Result<(), EngineError> {
        let Some(bot) = self.world.bots.get_mut(id) else {
            return Ok(());
        };
        let spec = oracles.droid(bot.kind)?;
        ai::animation::animate(bot, &spec.animation, dt);
        Ok(())
    }

    fn simulate(
        &mut self,
        id: BotId,
        oracles: Oracles<'_>,
        config: &SimConfig,
        dt: f32,
        events: &mut dyn EventSink,
    ) -> Result<(), EngineError> {
        self.with_bot(id, oracles, config, dt, events, |ctx, bot, spec| {
            // killed earlier this frame, e.g. by a melee hit
            if ctx.bots.is_alive(bot.id) {
                ai::simulate_bot(ctx, bot, spec);
            }
        })
    }

    /// Takes bot `id` out of the registry, runs `f` on it and puts it back.
    fn with_bot(
        &mut self,
        id: BotId,
        oracles: Oracles<'_>,
        config: &SimConfig,
        dt: f32,
        events: &mut dyn EventSink,
        f: impl FnOnce(&mut TickContext<'_>, &mut Bot, &DroidSpec),
    ) -> Result<(), EngineError> {
        let world = &mut *self.world;
        let Some(mut bot) = world.bots.take(id) else {
            debug!(bot = %id, "bot vanished before its turn");
            return Ok(());
        };
        let spec = match oracles.droid(bot.kind) {
            Ok(spec) => spec,
            Err(err) => {
                world.bots.restore(bot)?;
                return Err(err.into());
            }
        };

        {
            let mut ctx = TickContext {
                ship: &mut world.ship,
                bots: &mut world.bots,
                player: &mut world.player,
                rng: &mut *world.rng,
                oracles,
                config,
                events,
                dt,
            };
            f(&mut ctx, &mut bot, spec);
        }
        world.bots.restore(bot)?;
        Ok(())
    }
}
