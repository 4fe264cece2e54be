//! Recovery for characters embedded in an obstacle.
use core::ops::Range;

use crate::config::SimConfig;
use crate::geometry::{LevelId, Point, Rect};

use super::{CollisionFilter, CollisionMap};

impl CollisionMap<'_> {
    /// Nearest free point just outside `rect`, trying the four edges in order
    /// of distance from `pos`.
    pub fn move_out_of_obstacle(
        &self,
        pos: Point,
        rect: Rect,
        z: LevelId,
        filter: Option<&CollisionFilter>,
    ) -> Option<Point> {
        let offset = SimConfig::ESCAPE_OFFSET;
        let mut candidates = [
            (pos.x - rect.min.x, Point::new(rect.min.x - offset, pos.y)),
            (rect.max.x - pos.x, Point::new(rect.max.x + offset, pos.y)),
            (pos.y - rect.min.y, Point::new(pos.x, rect.min.y - offset)),
            (rect.max.y - pos.y, Point::new(pos.x, rect.max.y + offset)),
        ];
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

        candidates
            .into_iter()
            .map(|(_, candidate)| candidate)
            .find(|&candidate| !self.point_blocked(candidate, z, filter))
    }

    /// Finds the obstacle `pos` is stuck in (scanning a small tile window
    /// around it) and moves out of it.
    ///
    /// Returns `None` when no containing obstacle is found or every escape
    /// direction is blocked.
    pub fn escape_from_obstacle(
        &self,
        pos: Point,
        z: LevelId,
        filter: Option<&CollisionFilter>,
    ) -> Option<Point> {
        let level = self.ship().level(z)?;
        let (xs, ys) = escape_window(pos, level.xlen, level.ylen);

        for y in ys {
            for x in xs.clone() {
                for &index in level.glued(x, y) {
                    let Some(obstacle) = level.obstacle(index) else {
                        continue;
                    };
                    let Some(spec) = self.obstacles().obstacle_spec(obstacle.kind) else {
                        continue;
                    };
                    let Some(rect) = spec.collision_rect(obstacle.pos) else {
                        continue;
                    };
                    if filter.is_some_and(|f| f.ignores(spec, z, index)) {
                        continue;
                    }
                    if rect.contains_strict(pos) {
                        return self.move_out_of_obstacle(pos, rect, z, filter);
                    }
                }
            }
        }
        None
    }
}

/// Tiles scanned around `pos`: a window of [`SimConfig::ESCAPE_WINDOW`]
/// tiles starting two tiles before it, clipped to the level on each side.
fn escape_window(pos: Point, xlen: i32, ylen: i32) -> (Range<i32>, Range<i32>) {
    let half = SimConfig::ESCAPE_WINDOW / 2;
    let span = |coord: f32, len: i32| {
        let start = coord.floor() as i32 - half;
        start.max(0)..(start + SimConfig::ESCAPE_WINDOW).min(len)
    };
    (span(pos.x, xlen), span(pos.y, ylen))
}
