//! End-to-end scenarios over the public API.
use droid_core::ai::{TickContext, simulate_bot};
use droid_core::colldet::{resolve_virtual_position, update_virtual_position};
use droid_core::combat::{Hit, HitOutcome, apply_hit};
use droid_core::env::{AnimationCycle, AnimationSet, Oracles};
use droid_core::geometry::normalize_towards;
use droid_core::state::WaypointLink;
use droid_core::{
    Bot, BotId, CollisionFilter, CollisionMap, CombatState, DroidSpec, DroidSpecTable, DroidType,
    Env, EventSink, Gps, JumpTargets, Level, LevelId, ObstacleFlags, ObstacleKind, ObstacleSpec,
    ObstacleSpecTable, PcgRng, Player, Point, SameSideFactions, Ship, SimConfig, SimEngine,
    SimEvent, TileGridPathfinder, Waypoint, WeaponSpec, World,
};

const Z: LevelId = LevelId(0);
const DROID: DroidType = DroidType(0);

fn droid() -> DroidSpec {
    DroidSpec {
        name: "sentinel".into(),
        max_speed: 2.0,
        max_energy: 100.0,
        aggression_distance: 6.0,
        time_spent_eyeing: 0.5,
        monster_level: 1,
        weapon: WeaponSpec {
            bullet_speed: 8.0,
            bullet_lifetime: 1.0,
            base_damage: 3,
            recharge_time: 0.5,
            reload_time: 1.0,
            clip_size: 6,
            ..WeaponSpec::default()
        },
        animation: AnimationSet {
            walk: AnimationCycle::new(0.0, 10.0, 10.0),
            attack: AnimationCycle::new(10.0, 15.0, 10.0),
            gethit: AnimationCycle::new(15.0, 17.0, 10.0),
            death: AnimationCycle::new(17.0, 22.0, 10.0),
            stand: AnimationCycle::new(23.0, 27.0, 5.0),
        },
        ..DroidSpec::default()
    }
}

struct Tables {
    obstacles: ObstacleSpecTable,
    droids: DroidSpecTable,
    pathfinder: TileGridPathfinder,
}

impl Tables {
    fn new() -> Self {
        let mut obstacles = ObstacleSpecTable::default();
        obstacles.push(ObstacleSpec::solid_square("crate", 0.5));
        obstacles.push(
            ObstacleSpec::solid_square("glass", 0.5).with_flags(ObstacleFlags::IS_WALKABLE),
        );
        Self {
            obstacles,
            droids: DroidSpecTable::new(vec![droid()]),
            pathfinder: TileGridPathfinder::default(),
        }
    }

    fn env(&self) -> Env<'_> {
        Env::with_all(
            &self.obstacles,
            &self.droids,
            &self.pathfinder,
            &SameSideFactions,
        )
    }

    fn oracles(&self) -> Oracles<'_> {
        self.env().oracles().unwrap()
    }
}

/// One 12x12 level with a solid crate centred on (5, 5).
fn crate_level(tables: &Tables) -> Ship {
    let mut ship = Ship::new(vec![Level::new(Z, 12, 12)]).unwrap();
    let level = ship.level_mut(Z).unwrap();
    level
        .add_obstacle(&tables.obstacles, ObstacleKind(0), p(5.0, 5.0))
        .unwrap();
    ship
}

fn p(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

#[test]
fn crate_blocks_the_line_through_its_centre() {
    let tables = Tables::new();
    let ship = crate_level(&tables);
    let map = CollisionMap::new(&ship, &tables.obstacles);

    assert!(map.direct_line_blocked(p(4.0, 5.0), p(6.0, 5.0), Z, None));
    assert!(!map.direct_line_blocked(p(4.0, 5.0), p(4.0, 6.0), Z, None));
}

#[test]
fn point_query_is_strict_interior() {
    let tables = Tables::new();
    let ship = crate_level(&tables);
    let map = CollisionMap::new(&ship, &tables.obstacles);

    assert!(map.point_blocked(p(5.0, 5.0), Z, None));
    assert!(map.point_blocked(p(5.49, 4.51), Z, None));
    assert!(!map.point_blocked(p(5.5, 5.0), Z, None));
    assert!(!map.point_blocked(p(4.5, 4.5), Z, None));
}

#[test]
fn more_filters_never_block_more() {
    let tables = Tables::new();
    let mut ship = crate_level(&tables);
    ship.level_mut(Z)
        .unwrap()
        .add_obstacle(&tables.obstacles, ObstacleKind(1), p(8.0, 5.0))
        .unwrap();
    let map = CollisionMap::new(&ship, &tables.obstacles);

    let segments = [
        (p(3.0, 5.0), p(10.0, 5.0)),
        (p(7.0, 5.0), p(9.0, 5.0)),
        (p(1.0, 1.0), p(2.0, 2.0)),
    ];
    let walkable = CollisionFilter::WALKABLE;
    let widened = CollisionFilter::WALKABLE.then(CollisionFilter::obstacle_by_id(Z, 0));
    for (a, b) in segments {
        let none = map.direct_line_blocked(a, b, Z, None);
        let fewer = map.direct_line_blocked(a, b, Z, Some(&walkable));
        let fewest = map.direct_line_blocked(a, b, Z, Some(&widened));
        assert!(none || !fewer);
        assert!(fewer || !fewest);
    }
    // the glass pane only blocks without the walkable filter
    assert!(map.direct_line_blocked(p(7.0, 5.0), p(9.0, 5.0), Z, None));
    assert!(!map.direct_line_blocked(p(7.0, 5.0), p(9.0, 5.0), Z, Some(&walkable)));
}

#[test]
fn normalizing_twice_changes_nothing() {
    let origin = p(1.0, 2.0);
    for target in [p(4.0, 6.0), p(-3.0, 2.5), p(1.0, 2.0001), p(10.0, -7.0)] {
        let Some(once) = normalize_towards(origin, target) else {
            continue;
        };
        let twice = normalize_towards(origin, once).unwrap();
        assert!((once.x - twice.x).abs() < 1e-2);
        assert!((once.y - twice.y).abs() < 1e-2);
    }
}

#[test]
fn virtual_positions_round_trip_between_neighbours() {
    let west = Level::new(LevelId(0), 10, 8).with_jump_targets(JumpTargets {
        east: Some(LevelId(1)),
        ..JumpTargets::default()
    });
    let east = Level::new(LevelId(1), 6, 8).with_jump_targets(JumpTargets {
        west: Some(LevelId(0)),
        ..JumpTargets::default()
    });
    let ship = Ship::new(vec![west, east]).unwrap();

    let here = Gps::new(8.5, 3.0, LevelId(0));
    let there = update_virtual_position(&ship, here, LevelId(1)).unwrap();
    assert_eq!(there, Gps::new(-1.5, 3.0, LevelId(1)));
    let back = resolve_virtual_position(&ship, there).unwrap();
    assert_eq!(back, here);
}

#[test]
fn escape_leaves_the_rectangle() {
    let tables = Tables::new();
    let ship = crate_level(&tables);
    let map = CollisionMap::new(&ship, &tables.obstacles);

    let free = map.escape_from_obstacle(p(5.2, 5.1), Z, None).unwrap();
    assert!(!map.point_blocked(free, Z, None));
    assert_eq!(free, p(5.6, 5.1));
}

struct Arena {
    tables: Tables,
    world: World,
    config: SimConfig,
}

impl Arena {
    fn new() -> Self {
        let tables = Tables::new();
        let ship = Ship::new(vec![Level::new(Z, 20, 20)]).unwrap();
        let world = World::new(ship, Player::new(Gps::new(19.5, 19.5, Z)), PcgRng::new(7));
        Self {
            tables,
            world,
            config: SimConfig::default(),
        }
    }

    fn spawn(&mut self, bot: Bot) -> BotId {
        let spec = droid();
        let world = &mut self.world;
        world
            .bots
            .spawn(&world.ship, &spec, bot, &mut *world.rng)
            .unwrap()
    }

    fn hit(&mut self, id: BotId, amount: f32, events: &mut dyn EventSink) -> HitOutcome {
        let oracles = self.tables.oracles();
        let spec = droid();
        let world = &mut self.world;
        let mut bot = world.bots.take(id).unwrap();
        let outcome = {
            let mut ctx = TickContext {
                ship: &mut world.ship,
                bots: &mut world.bots,
                player: &mut world.player,
                rng: &mut *world.rng,
                oracles,
                config: &self.config,
                events,
                dt: 0.1,
            };
            apply_hit(&mut ctx, &mut bot, &spec, Hit::environmental(amount))
        };
        world.bots.restore(bot).unwrap();
        outcome
    }
}

#[test]
fn light_hit_neither_stuns_nor_kills() {
    let mut arena = Arena::new();
    let id = arena.spawn(Bot::new(DROID, Gps::new(5.5, 5.5, Z)));
    arena.world.bots.get_mut(id).unwrap().energy = 10.0;

    let mut events = Vec::new();
    assert_eq!(arena.hit(id, 4.0, &mut events), HitOutcome::Wounded);
    let bot = arena.world.bots.get(id).unwrap();
    assert_eq!(bot.energy, 6.0);
    assert_eq!(bot.firewait, 0.0);
    assert!(arena.world.bots.is_alive(id));
}

#[test]
fn lethal_hit_kills_exactly_once() {
    let mut arena = Arena::new();
    let id = arena.spawn(Bot::new(DROID, Gps::new(5.5, 5.5, Z)));
    arena.world.bots.get_mut(id).unwrap().energy = 3.0;

    let mut events = Vec::new();
    assert_eq!(arena.hit(id, 5.0, &mut events), HitOutcome::Killed);
    assert_eq!(arena.world.bots.get(id).unwrap().energy, -2.0);
    assert_eq!(arena.hit(id, 5.0, &mut events), HitOutcome::Ignored);

    let deaths = events
        .iter()
        .filter(|e| matches!(e, SimEvent::BotDied { .. }))
        .count();
    assert_eq!(deaths, 1);
    assert_eq!(arena.world.bots.dead_ids(), vec![id]);
}

#[test]
fn select_new_waypoint_moves_on_within_one_tick() {
    let mut arena = Arena::new();
    {
        let level = arena.world.ship.level_mut(Z).unwrap();
        level.add_waypoint(Waypoint::new(5, 5).connected_to([1, 2]));
        level.add_waypoint(Waypoint::new(10, 5).connected_to([0]));
        level.add_waypoint(Waypoint::new(5, 10).connected_to([0]));
    }
    let mut bot = Bot::new(DROID, Gps::new(5.5, 5.5, Z));
    bot.waypoints = Some(WaypointLink::at(0));
    let id = arena.spawn(bot);

    let oracles = arena.tables.oracles();
    let spec = droid();
    let world = &mut arena.world;
    let mut bot = world.bots.take(id).unwrap();
    bot.state = CombatState::SelectNewWaypoint;
    let mut events = Vec::new();
    {
        let mut ctx = TickContext {
            ship: &mut world.ship,
            bots: &mut world.bots,
            player: &mut world.player,
            rng: &mut *world.rng,
            oracles,
            config: &arena.config,
            events: &mut events,
            dt: 0.05,
        };
        simulate_bot(&mut ctx, &mut bot, &spec);
    }
    assert_eq!(bot.state, CombatState::TurnTowardsNextWaypoint);
    let next = bot.waypoints.unwrap().next;
    assert!(next == 1 || next == 2);
    world.bots.restore(bot).unwrap();
}

#[test]
fn long_run_stays_on_the_level() {
    let mut arena = Arena::new();
    {
        let level = arena.world.ship.level_mut(Z).unwrap();
        level.add_waypoint(Waypoint::new(3, 3).connected_to([1, 3]));
        level.add_waypoint(Waypoint::new(15, 3).connected_to([0, 2]));
        level.add_waypoint(Waypoint::new(15, 15).connected_to([1, 3]));
        level.add_waypoint(Waypoint::new(3, 15).connected_to([2, 0]));
    }
    let ids: Vec<BotId> = (0..4)
        .map(|i| arena.spawn(Bot::new(DROID, Gps::new(3.5 + 4.0 * i as f32, 3.5, Z))))
        .collect();
    arena.world.player.pos = Gps::new(9.5, 9.5, Z);
    SimEngine::new(&mut arena.world).shuffle_level(Z);

    let mut events = Vec::new();
    for _ in 0..300 {
        SimEngine::new(&mut arena.world)
            .step(arena.tables.env(), &arena.config, 0.05, &mut events)
            .unwrap();
    }
    for id in ids {
        let bot = arena.world.bots.get(id).unwrap();
        let level = arena.world.ship.level(bot.pos.z).unwrap();
        assert!(level.contains(bot.pos.point()), "{id} left the level");
        assert_ne!(bot.state, CombatState::UndefinedState);
    }
}
