//! Route planning service used by the bot state machine.
//!
//! The state machine treats the pathfinder as a black box: it asks for at most
//! [`SimConfig::MAX_PATH_POINTS`] points from a start position to a target and
//! parks the bot when the answer is an error.
use std::collections::{BTreeMap, BTreeSet};

use arrayvec::ArrayVec;

use crate::colldet::{CharacterProximity, CollisionFilter, CollisionMap};
use crate::config::SimConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::geometry::{Gps, Point};

/// Planned route, excluding the start position.
pub type PathPoints = ArrayVec<Point, { SimConfig::MAX_PATH_POINTS }>;

/// Why no route was produced.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathError {
    #[error("no path to target")]
    NoPath,

    #[error("path needs {needed} points, at most {max} allowed")]
    TooManyPoints { needed: usize, max: usize },
}

impl GameError for PathError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoPath => "PATH_NO_PATH",
            Self::TooManyPoints { .. } => "PATH_TOO_MANY_POINTS",
        }
    }
}

/// One routing query.
#[derive(Clone, Copy)]
pub struct PathRequest<'a> {
    pub from: Gps,
    pub to: Point,
    pub max_points: usize,
    pub filter: &'a CollisionFilter,
    /// When set, route segments must also be free of other characters.
    pub avoid: Option<&'a CharacterProximity<'a>>,
}

impl<'a> PathRequest<'a> {
    pub fn new(from: Gps, to: Point, filter: &'a CollisionFilter) -> Self {
        Self {
            from,
            to,
            max_points: SimConfig::MAX_PATH_POINTS,
            filter,
            avoid: None,
        }
    }

    #[must_use]
    pub fn avoiding(mut self, avoid: &'a CharacterProximity<'a>) -> Self {
        self.avoid = Some(avoid);
        self
    }

    /// Whether a character could walk `from -> to` on the request's level.
    fn segment_clear(&self, map: &CollisionMap<'_>, from: Point, to: Point) -> bool {
        let z = self.from.z;
        if map.direct_line_blocked(from, to, z, Some(self.filter)) {
            return false;
        }
        self.avoid
            .is_none_or(|avoid| avoid.is_segment_free(from, to, z))
    }
}

/// Computes a route between two positions on one level.
pub trait Pathfinder {
    fn find_path(
        &self,
        map: &CollisionMap<'_>,
        request: &PathRequest<'_>,
    ) -> Result<PathPoints, PathError>;
}

/// Accepts only a direct line to the target.
#[derive(Clone, Copy, Debug, Default)]
pub struct StraightLinePathfinder;

impl Pathfinder for StraightLinePathfinder {
    fn find_path(
        &self,
        map: &CollisionMap<'_>,
        request: &PathRequest<'_>,
    ) -> Result<PathPoints, PathError> {
        if !request.segment_clear(map, request.from.point(), request.to) {
            return Err(PathError::NoPath);
        }
        if request.max_points == 0 {
            return Err(PathError::TooManyPoints { needed: 1, max: 0 });
        }
        let mut path = PathPoints::new();
        path.push(request.to);
        Ok(path)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

type Tile = (i32, i32);

/// A* over tile centres in a window around start and goal, followed by
/// line-of-sight smoothing. Falls back to the direct line when it is clear.
#[derive(Clone, Copy, Debug)]
pub struct TileGridPathfinder {
    /// Tiles searched beyond the start/goal bounding box.
    pub search_margin: i32,
}

impl TileGridPathfinder {
    pub const DEFAULT_SEARCH_MARGIN: i32 = 6;

    pub fn new(search_margin: i32) -> Self {
        Self { search_margin }
    }

    fn tile_of(p: Point) -> Tile {
        (p.x.floor() as i32, p.y.floor() as i32)
    }

    fn center(tile: Tile) -> Point {
        Point::tile_center(tile.0, tile.1)
    }

    fn manhattan(a: Tile, b: Tile) -> u32 {
        a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
    }

    fn grid_route(
        &self,
        map: &CollisionMap<'_>,
        request: &PathRequest<'_>,
    ) -> Option<Vec<Tile>> {
        let level = map.ship().level(request.from.z)?;
        let start = Self::tile_of(request.from.point());
        let goal = Self::tile_of(request.to);

        let x0 = (start.0.min(goal.0) - self.search_margin).max(0);
        let y0 = (start.1.min(goal.1) - self.search_margin).max(0);
        let x1 = (start.0.max(goal.0) + self.search_margin).min(level.xlen - 1);
        let y1 = (start.1.max(goal.1) + self.search_margin).min(level.ylen - 1);
        let in_window = |t: Tile| t.0 >= x0 && t.0 <= x1 && t.1 >= y0 && t.1 <= y1;

        let mut open = BTreeSet::new();
        let mut g_score: BTreeMap<Tile, u32> = BTreeMap::new();
        let mut came_from: BTreeMap<Tile, Tile> = BTreeMap::new();
        let h = Self::manhattan(start, goal);
        open.insert(OpenNode {
            f: h,
            h,
            y: start.1,
            x: start.0,
        });
        g_score.insert(start, 0);

        while let Some(current) = open.pop_first() {
            let tile = (current.x, current.y);
            if tile == goal {
                let mut route = vec![goal];
                let mut cursor = goal;
                while let Some(prev) = came_from.get(&cursor) {
                    cursor = *prev;
                    route.push(cursor);
                }
                route.reverse();
                return Some(route);
            }
            let cur_g = g_score.get(&tile).copied().unwrap_or(u32::MAX);
            let neighbors = [
                (tile.0, tile.1 - 1),
                (tile.0 + 1, tile.1),
                (tile.0, tile.1 + 1),
                (tile.0 - 1, tile.1),
            ];
            for next in neighbors {
                if !in_window(next) {
                    continue;
                }
                let from = if tile == start {
                    request.from.point()
                } else {
                    Self::center(tile)
                };
                let to = if next == goal {
                    request.to
                } else {
                    Self::center(next)
                };
                if !request.segment_clear(map, from, to) {
                    continue;
                }
                let tentative = cur_g.saturating_add(1);
                if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                    came_from.insert(next, tile);
                    g_score.insert(next, tentative);
                    let h = Self::manhattan(next, goal);
                    open.insert(OpenNode {
                        f: tentative + h,
                        h,
                        y: next.1,
                        x: next.0,
                    });
                }
            }
        }
        None
    }
}

impl Default for TileGridPathfinder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEARCH_MARGIN)
    }
}

impl Pathfinder for TileGridPathfinder {
    fn find_path(
        &self,
        map: &CollisionMap<'_>,
        request: &PathRequest<'_>,
    ) -> Result<PathPoints, PathError> {
        if let Ok(path) = StraightLinePathfinder.find_path(map, request) {
            return Ok(path);
        }
        if map.point_blocked(request.to, request.from.z, Some(request.filter)) {
            return Err(PathError::NoPath);
        }

        let route = self.grid_route(map, request).ok_or(PathError::NoPath)?;
        let mut corners: Vec<Point> = route
            .iter()
            .skip(1)
            .map(|tile| Self::center(*tile))
            .collect();
        match corners.last_mut() {
            Some(last) => *last = request.to,
            None => corners.push(request.to),
        }

        // keep only the points where line of sight breaks
        let mut smoothed = Vec::with_capacity(corners.len());
        let mut anchor = request.from.point();
        let mut i = 0;
        while i < corners.len() {
            let mut reach = i;
            for j in (i + 1..corners.len()).rev() {
                if request.segment_clear(map, anchor, corners[j]) {
                    reach = j;
                    break;
                }
            }
            smoothed.push(corners[reach]);
            anchor = corners[reach];
            i = reach + 1;
        }

        let max = request.max_points.min(SimConfig::MAX_PATH_POINTS);
        if smoothed.len() > max {
            return Err(PathError::TooManyPoints {
                needed: smoothed.len(),
                max,
            });
        }
        Ok(smoothed.into_iter().collect())
    }
}
