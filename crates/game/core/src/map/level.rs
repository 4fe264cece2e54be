use crate::env::{ObstacleKind, ObstacleOracle};
use crate::geometry::{LevelId, Point};

use super::ShipError;

/// An obstacle placed on a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub pos: Point,
}

/// Node of a level's waypoint graph, in integer tile coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Waypoint {
    pub x: i32,
    pub y: i32,
    pub connections: Vec<usize>,
    /// Never used as a random spawn point when bots are shuffled.
    pub suppress_random_spawn: bool,
}

impl Waypoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn connected_to(mut self, targets: impl IntoIterator<Item = usize>) -> Self {
        self.connections.extend(targets);
        self
    }

    /// Centre of the waypoint's tile; bots walk to this point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::tile_center(self.x, self.y)
    }
}

/// Levels reached by walking off each edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JumpTargets {
    pub north: Option<LevelId>,
    pub south: Option<LevelId>,
    pub east: Option<LevelId>,
    pub west: Option<LevelId>,
}

/// One level: tile grid with glued obstacles, obstacle list, waypoints.
#[derive(Clone, Debug)]
pub struct Level {
    pub id: LevelId,
    pub xlen: i32,
    pub ylen: i32,
    pub jump: JumpTargets,
    /// Row-major; each cell lists indices into `obstacles`.
    tiles: Vec<Vec<usize>>,
    obstacles: Vec<Obstacle>,
    pub waypoints: Vec<Waypoint>,
}

impl Level {
    pub fn new(id: LevelId, xlen: i32, ylen: i32) -> Self {
        let xlen = xlen.max(1);
        let ylen = ylen.max(1);
        Self {
            id,
            xlen,
            ylen,
            jump: JumpTargets::default(),
            tiles: vec![Vec::new(); (xlen * ylen) as usize],
            obstacles: Vec::new(),
            waypoints: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_jump_targets(mut self, jump: JumpTargets) -> Self {
        self.jump = jump;
        self
    }

    /// Whether `p` lies in `[0, xlen) x [0, ylen)`.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.xlen as f32 && p.y < self.ylen as f32
    }

    /// Strictly inside the level, as required for kill bookkeeping.
    pub fn contains_strict(&self, p: Point) -> bool {
        p.x > 0.0 && p.y > 0.0 && p.x < self.xlen as f32 && p.y < self.ylen as f32
    }

    fn tile_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.xlen || y >= self.ylen {
            return None;
        }
        Some((y * self.xlen + x) as usize)
    }

    /// Obstacle indices glued to tile `(x, y)`; empty outside the level.
    pub fn glued(&self, x: i32, y: i32) -> &[usize] {
        self.tile_index(x, y)
            .and_then(|i| self.tiles.get(i))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn obstacle(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Places an obstacle and glues it to every tile its collision rectangle
    /// overlaps (or to its own tile when it has none).
    ///
    /// # Errors
    ///
    /// Returns `ShipError::UnknownObstacleKind` when `kind` has no spec.
    pub fn add_obstacle(
        &mut self,
        specs: &dyn ObstacleOracle,
        kind: ObstacleKind,
        pos: Point,
    ) -> Result<usize, ShipError> {
        let spec = specs
            .obstacle_spec(kind)
            .ok_or(ShipError::UnknownObstacleKind { level: self.id, kind })?;
        let index = self.obstacles.len();
        self.obstacles.push(Obstacle { kind, pos });

        let (x0, y0, x1, y1) = match spec.collision_rect(pos) {
            Some(rect) => rect.tile_span(),
            None => {
                let (x, y) = (pos.x.floor() as i32, pos.y.floor() as i32);
                (x, y, x, y)
            }
        };
        for y in y0.max(0)..=y1.min(self.ylen - 1) {
            for x in x0.max(0)..=x1.min(self.xlen - 1) {
                if let Some(cell) = self.tile_index(x, y).and_then(|i| self.tiles.get_mut(i)) {
                    cell.push(index);
                }
            }
        }
        Ok(index)
    }

    pub fn add_waypoint(&mut self, waypoint: Waypoint) -> usize {
        self.waypoints.push(waypoint);
        self.waypoints.len() - 1
    }

    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Waypoint whose centre is closest to `p`; ties go to the later index.
    pub fn nearest_waypoint(&self, p: Point) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, wp) in self.waypoints.iter().enumerate() {
            let d = wp.center().sq_distance(p);
            if best.is_none_or(|(_, bd)| d <= bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }
}
