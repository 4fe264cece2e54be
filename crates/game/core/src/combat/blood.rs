//! Blood and oil decals left by wounded bots.
use tracing::debug;

use crate::ai::TickContext;
use crate::env::DroidSpec;
use crate::error::inform_developers;
use crate::geometry::Point;
use crate::state::Bot;

/// Drops one decal a unit away from the bot in a random direction.
///
/// Humans bleed, machines leak oil. Nothing is placed inside a solid
/// rectangle or outside the level.
pub fn spray_blood(ctx: &mut TickContext<'_>, bot: &Bot, spec: &DroidSpec) {
    let config = ctx.config;
    let decals = if spec.is_human {
        &config.blood_decals
    } else {
        &config.oil_decals
    };
    if decals.is_empty() {
        return;
    }

    let angle = ctx.rng.random_int(360) as f32;
    let spot = bot.pos.point() + Point::new(1.0, 0.0).rotated(angle);
    let kind = decals[ctx.rng.random_int(decals.len() as u32 - 1) as usize];

    let z = bot.pos.z;
    if ctx.map().point_blocked(spot, z, None) {
        return;
    }
    let obstacles = ctx.oracles.obstacles;
    let Some(level) = ctx.ship.level_mut(z) else {
        return;
    };
    if !level.contains(spot) {
        return;
    }
    match level.add_obstacle(obstacles, kind, spot) {
        Ok(index) => debug!(bot = %bot.id, index, "decal sprayed"),
        Err(err) => inform_developers("decals", &err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{Fixture, GUNNER, brawler, gunner};
    use crate::env::{ObstacleSpec, SequenceRng};
    use crate::geometry::LevelId;

    fn decal_fixture() -> Fixture {
        let mut fx = Fixture::new();
        let blood = fx.obstacles.push(ObstacleSpec {
            name: "blood".into(),
            ..ObstacleSpec::default()
        });
        let oil = fx.obstacles.push(ObstacleSpec {
            name: "oil".into(),
            ..ObstacleSpec::default()
        });
        fx.config = fx.config.clone().with_decals(vec![blood], vec![oil]);
        fx
    }

    fn obstacle_count(fx: &Fixture) -> usize {
        fx.ship.level(LevelId(0)).unwrap().obstacles().len()
    }

    #[test]
    fn machines_leak_oil_next_to_themselves() {
        let mut fx = decal_fixture();
        let id = fx.spawn_at(GUNNER, 5.0, 5.0);
        let spec = gunner();
        fx.with_bot(id, 0.1, |ctx, bot| spray_blood(ctx, bot, &spec));

        let level = fx.ship.level(LevelId(0)).unwrap();
        let decal = level.obstacles().last().unwrap();
        assert_eq!(decal.kind, fx.config.oil_decals[0]);
        assert!((decal.pos.distance(Point::new(5.0, 5.0)) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn no_decal_inside_walls() {
        let mut fx = decal_fixture();
        // rotation 0 puts the spot at (6, 5)
        fx.block(6.0, 5.0);
        let id = fx.spawn_at(GUNNER, 5.0, 5.0);
        let before = obstacle_count(&fx);
        let spec = brawler();
        fx.rng = SequenceRng::constant(0);
        fx.with_bot(id, 0.1, |ctx, bot| spray_blood(ctx, bot, &spec));
        assert_eq!(obstacle_count(&fx), before);
    }
}
