//! Shared world fixture for the bot behaviour tests.
use crate::config::SimConfig;
use crate::env::{
    AnimationCycle, AnimationSet, DroidOracle, DroidSpec, DroidSpecTable, DroidType, ObstacleFlags,
    ObstacleKind, ObstacleSpec, ObstacleSpecTable, Oracles, SameSideFactions, SequenceRng, TileGridPathfinder,
    WeaponSpec,
};
use crate::events::SimEvent;
use crate::geometry::{Gps, LevelId, Point};
use crate::map::{Level, Ship, Waypoint};
use crate::state::{Bot, BotId, BotRegistry, Player};

use super::TickContext;

pub const GUNNER: DroidType = DroidType(0);
pub const BRAWLER: DroidType = DroidType(1);
pub const Z: LevelId = LevelId(0);

pub fn animations() -> AnimationSet {
    AnimationSet {
        walk: AnimationCycle::new(0.0, 10.0, 10.0),
        attack: AnimationCycle::new(10.0, 15.0, 10.0),
        gethit: AnimationCycle::new(15.0, 17.0, 10.0),
        death: AnimationCycle::new(17.0, 22.0, 10.0),
        stand: AnimationCycle::new(23.0, 27.0, 5.0),
    }
}

pub fn gunner() -> DroidSpec {
    DroidSpec {
        name: "gunner".into(),
        max_speed: 2.0,
        max_energy: 40.0,
        lose_health: 1.0,
        aggression_distance: 8.0,
        time_spent_eyeing: 1.0,
        recover_time_after_hit: 0.5,
        experience_reward: 30,
        monster_level: 2,
        to_hit: 70,
        weapon: WeaponSpec {
            bullet_kind: 3,
            bullet_speed: 10.0,
            bullet_lifetime: 1.0,
            base_damage: 5,
            damage_modifier: 2,
            recharge_time: 0.5,
            reload_time: 2.0,
            clip_size: 2,
            ..WeaponSpec::default()
        },
        animation: animations(),
        ..DroidSpec::default()
    }
}

pub fn brawler() -> DroidSpec {
    DroidSpec {
        name: "brawler".into(),
        is_human: true,
        weapon: WeaponSpec {
            melee: true,
            base_damage: 8,
            recharge_time: 1.0,
            clip_size: 100,
            ..WeaponSpec::default()
        },
        ..gunner()
    }
}

pub struct Fixture {
    pub ship: Ship,
    pub bots: BotRegistry,
    pub player: Player,
    pub rng: SequenceRng,
    pub obstacles: ObstacleSpecTable,
    pub droids: DroidSpecTable,
    pub pathfinder: TileGridPathfinder,
    pub factions: SameSideFactions,
    pub config: SimConfig,
    pub events: Vec<SimEvent>,
    block: ObstacleKind,
    water: ObstacleKind,
}

impl Fixture {
    /// One empty 20x20 level; the player stands far away in a corner.
    pub fn new() -> Self {
        let mut obstacles = ObstacleSpecTable::default();
        let block = obstacles.push(ObstacleSpec::solid_square("block", 0.5));
        let water = obstacles.push(
            ObstacleSpec::solid_square("water", 0.5).with_flags(ObstacleFlags::GROUND_LEVEL),
        );
        let ship = Ship::new(vec![Level::new(Z, 20, 20)]).unwrap();
        Self {
            ship,
            bots: BotRegistry::new(),
            player: Player::new(Gps::new(19.5, 19.5, Z)),
            rng: SequenceRng::constant(0),
            obstacles,
            droids: DroidSpecTable::new(vec![gunner(), brawler()]),
            pathfinder: TileGridPathfinder::default(),
            factions: SameSideFactions,
            config: SimConfig::default(),
            events: Vec::new(),
            block,
            water,
        }
    }

    pub fn block(&mut self, x: f32, y: f32) {
        let level = self.ship.level_mut(Z).unwrap();
        level
            .add_obstacle(&self.obstacles, self.block, Point::new(x, y))
            .unwrap();
    }

    /// A full-height column of ground-level tiles at `x`.
    pub fn water_column(&mut self, x: f32) {
        let level = self.ship.level_mut(Z).unwrap();
        for y in 0..level.ylen {
            level
                .add_obstacle(&self.obstacles, self.water, Point::new(x, y as f32 + 0.5))
                .unwrap();
        }
    }

    pub fn waypoint(&mut self, waypoint: Waypoint) -> usize {
        self.ship.level_mut(Z).unwrap().add_waypoint(waypoint)
    }

    pub fn spawn(&mut self, bot: Bot) -> BotId {
        let spec = self.droids.droid_spec(bot.kind).cloned().unwrap();
        let mut rng = SequenceRng::constant(0);
        self.bots.spawn(&self.ship, &spec, bot, &mut rng).unwrap()
    }

    pub fn spawn_at(&mut self, kind: DroidType, x: f32, y: f32) -> BotId {
        self.spawn(Bot::new(kind, Gps::new(x, y, Z)))
    }

    pub fn bot(&self, id: BotId) -> &Bot {
        self.bots.get(id).unwrap()
    }

    pub fn ctx(&mut self, dt: f32) -> TickContext<'_> {
        TickContext {
            ship: &mut self.ship,
            bots: &mut self.bots,
            player: &mut self.player,
            rng: &mut self.rng,
            oracles: Oracles {
                obstacles: &self.obstacles,
                droids: &self.droids,
                pathfinder: &self.pathfinder,
                factions: &self.factions,
            },
            config: &self.config,
            events: &mut self.events,
            dt,
        }
    }

    /// Runs `f` on bot `id` taken out of the registry, as the engine does.
    pub fn with_bot<R>(
        &mut self,
        id: BotId,
        dt: f32,
        f: impl FnOnce(&mut TickContext<'_>, &mut Bot) -> R,
    ) -> R {
        let mut bot = self.bots.take(id).unwrap();
        let result = {
            let mut ctx = self.ctx(dt);
            f(&mut ctx, &mut bot)
        };
        self.bots.restore(bot).unwrap();
        result
    }
}
