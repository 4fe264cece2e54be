//! Segment and point queries against the glued obstacles of a level and its
//! neighbourhood.
use std::collections::HashSet;

use crate::env::ObstacleOracle;
use crate::geometry::{LevelId, Point};
use crate::map::{Level, Ship};

use super::CollisionFilter;
use super::neighborhood::virtual_neighbor_index;

/// Inclusive tile box `(x0, y0, x1, y1)`.
type TileBox = (i32, i32, i32, i32);

/// Obstacles already tested in one query.
type Visited = HashSet<(LevelId, usize)>;

/// Read-only view of the ship's obstacles for collision queries.
#[derive(Clone, Copy)]
pub struct CollisionMap<'a> {
    ship: &'a Ship,
    obstacles: &'a dyn ObstacleOracle,
}

impl<'a> CollisionMap<'a> {
    pub fn new(ship: &'a Ship, obstacles: &'a dyn ObstacleOracle) -> Self {
        Self { ship, obstacles }
    }

    pub fn ship(&self) -> &'a Ship {
        self.ship
    }

    pub fn obstacles(&self) -> &'a dyn ObstacleOracle {
        self.obstacles
    }

    /// Whether the segment `from -> to` on level `z` hits a solid obstacle.
    ///
    /// A degenerate segment is a point test. The query is decomposed over the
    /// neighbour levels its tile box reaches. Unknown levels never block.
    pub fn direct_line_blocked(
        &self,
        from: Point,
        to: Point,
        z: LevelId,
        filter: Option<&CollisionFilter>,
    ) -> bool {
        let Some(level) = self.ship.level(z) else {
            return false;
        };
        let margin = filter.map_or(0.0, CollisionFilter::extra_margin);
        let mut visited = Visited::new();

        let bbox = tile_box(from, to, margin);
        if let Some(clamped) = clamp_to_level(bbox, level)
            && self.level_blocked(level, clamped, from, to, filter, margin, &mut visited)
        {
            return true;
        }

        let (x0, y0, x1, y1) = bbox;
        let i_range = virtual_neighbor_index(x0 as f32, level.xlen)
            ..=virtual_neighbor_index(x1 as f32, level.xlen);
        let j_range = virtual_neighbor_index(y0 as f32, level.ylen)
            ..=virtual_neighbor_index(y1 as f32, level.ylen);

        for j in j_range {
            for i in i_range.clone() {
                if (i, j) == (1, 1) {
                    continue;
                }
                let Some(link) = self.ship.neighbor(z, i, j) else {
                    continue;
                };
                let Some(neighbor) = self.ship.level(link.level) else {
                    continue;
                };
                let delta = Point::new(link.delta_x, link.delta_y);
                let (a, b) = (from + delta, to + delta);
                let Some(clamped) = clamp_to_level(tile_box(a, b, margin), neighbor) else {
                    continue;
                };
                if self.level_blocked(neighbor, clamped, a, b, filter, margin, &mut visited) {
                    return true;
                }
            }
        }
        false
    }

    /// Point variant of [`Self::direct_line_blocked`].
    #[inline]
    pub fn point_blocked(&self, p: Point, z: LevelId, filter: Option<&CollisionFilter>) -> bool {
        self.direct_line_blocked(p, p, z, filter)
    }

    #[allow(clippy::too_many_arguments)]
    fn level_blocked(
        &self,
        level: &Level,
        (x0, y0, x1, y1): TileBox,
        from: Point,
        to: Point,
        filter: Option<&CollisionFilter>,
        margin: f32,
        visited: &mut Visited,
    ) -> bool {
        for y in y0..=y1 {
            for x in x0..=x1 {
                for &index in level.glued(x, y) {
                    if !visited.insert((level.id, index)) {
                        continue;
                    }
                    let Some(obstacle) = level.obstacle(index) else {
                        continue;
                    };
                    let Some(spec) = self.obstacles.obstacle_spec(obstacle.kind) else {
                        continue;
                    };
                    let Some(rect) = spec.collision_rect(obstacle.pos) else {
                        continue;
                    };
                    if filter.is_some_and(|f| f.ignores(spec, level.id, index)) {
                        continue;
                    }
                    let rect = if margin != 0.0 {
                        rect.inflated(margin)
                    } else {
                        rect
                    };
                    if rect.intersects_segment(from, to) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

fn tile_box(from: Point, to: Point, margin: f32) -> TileBox {
    (
        (from.x.min(to.x) - margin).floor() as i32,
        (from.y.min(to.y) - margin).floor() as i32,
        (from.x.max(to.x) + margin).floor() as i32,
        (from.y.max(to.y) + margin).floor() as i32,
    )
}

fn clamp_to_level((x0, y0, x1, y1): TileBox, level: &Level) -> Option<TileBox> {
    let clamped = (
        x0.max(0),
        y0.max(0),
        x1.min(level.xlen - 1),
        y1.min(level.ylen - 1),
    );
    (clamped.0 <= clamped.2 && clamped.1 <= clamped.3).then_some(clamped)
}
