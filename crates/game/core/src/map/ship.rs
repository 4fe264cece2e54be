use crate::env::ObstacleKind;
use crate::error::{ErrorSeverity, GameError};
use crate::geometry::LevelId;

use super::Level;

/// How to re-express a position of one level in a neighbour's frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeighborLink {
    pub level: LevelId,
    /// Added to a position's x to obtain the neighbour's x.
    pub delta_x: f32,
    /// Added to a position's y to obtain the neighbour's y.
    pub delta_y: f32,
}

/// 3x3 neighbourhood of one level, indexed `[j][i]` with `(1, 1)` the level itself.
pub type Neighborhood = [[Option<NeighborLink>; 3]; 3];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShipError {
    #[error("level at index {index} declares id {found}")]
    LevelIdMismatch { index: usize, found: LevelId },

    #[error("level {level} links to missing level {target}")]
    UnknownJumpTarget { level: LevelId, target: LevelId },

    #[error("level {level} links to itself")]
    SelfLink { level: LevelId },

    #[error("obstacle kind {kind:?} on level {level} has no spec")]
    UnknownObstacleKind { level: LevelId, kind: ObstacleKind },
}

impl GameError for ShipError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LevelIdMismatch { .. } => "SHIP_LEVEL_ID_MISMATCH",
            Self::UnknownJumpTarget { .. } => "SHIP_UNKNOWN_JUMP_TARGET",
            Self::SelfLink { .. } => "SHIP_SELF_LINK",
            Self::UnknownObstacleKind { .. } => "SHIP_UNKNOWN_OBSTACLE_KIND",
        }
    }
}

/// All levels plus the precomputed neighbourhood table.
#[derive(Clone, Debug)]
pub struct Ship {
    levels: Vec<Level>,
    neighbors: Vec<Neighborhood>,
}

impl Ship {
    /// Validates jump links and builds the neighbourhood table.
    ///
    /// # Errors
    ///
    /// Returns a [`ShipError`] if a level id does not match its index or a
    /// jump target is missing.
    pub fn new(levels: Vec<Level>) -> Result<Self, ShipError> {
        for (index, level) in levels.iter().enumerate() {
            if level.id.index() != index {
                return Err(ShipError::LevelIdMismatch {
                    index,
                    found: level.id,
                });
            }
            let j = level.jump;
            for target in [j.north, j.south, j.east, j.west].into_iter().flatten() {
                if target == level.id {
                    return Err(ShipError::SelfLink { level: level.id });
                }
                if target.index() >= levels.len() {
                    return Err(ShipError::UnknownJumpTarget {
                        level: level.id,
                        target,
                    });
                }
            }
        }

        let neighbors = levels
            .iter()
            .map(|level| Self::neighborhood_of(&levels, level))
            .collect();
        Ok(Self { levels, neighbors })
    }

    fn neighborhood_of(levels: &[Level], level: &Level) -> Neighborhood {
        let get = |id: Option<LevelId>| id.and_then(|id| levels.get(id.index()));
        let link = |target: &Level, dx: f32, dy: f32| NeighborLink {
            level: target.id,
            delta_x: dx,
            delta_y: dy,
        };

        let west = get(level.jump.west);
        let east = get(level.jump.east);
        let north = get(level.jump.north);
        let south = get(level.jump.south);

        let west_dx = west.map_or(0.0, |w| w.xlen as f32);
        let east_dx = -(level.xlen as f32);
        let north_dy = north.map_or(0.0, |n| n.ylen as f32);
        let south_dy = -(level.ylen as f32);

        let nw = Self::corner(levels, west, north, |l| l.jump.north, |l| l.jump.west);
        let ne = Self::corner(levels, east, north, |l| l.jump.north, |l| l.jump.east);
        let sw = Self::corner(levels, west, south, |l| l.jump.south, |l| l.jump.west);
        let se = Self::corner(levels, east, south, |l| l.jump.south, |l| l.jump.east);

        let mut table: Neighborhood = [[None; 3]; 3];
        table[1][1] = Some(link(level, 0.0, 0.0));
        table[1][0] = west.map(|w| link(w, west_dx, 0.0));
        table[1][2] = east.map(|e| link(e, east_dx, 0.0));
        table[0][1] = north.map(|n| link(n, 0.0, north_dy));
        table[2][1] = south.map(|s| link(s, 0.0, south_dy));
        table[0][0] = nw.map(|c| link(c, c.xlen as f32, c.ylen as f32));
        table[0][2] = ne.map(|c| link(c, east_dx, c.ylen as f32));
        table[2][0] = sw.map(|c| link(c, c.xlen as f32, south_dy));
        table[2][2] = se.map(|c| link(c, east_dx, south_dy));
        table
    }

    /// Diagonal neighbour: via the horizontal neighbour first, then via the vertical one.
    fn corner<'l>(
        levels: &'l [Level],
        horizontal: Option<&'l Level>,
        vertical: Option<&'l Level>,
        pick_vertical: fn(&Level) -> Option<LevelId>,
        pick_horizontal: fn(&Level) -> Option<LevelId>,
    ) -> Option<&'l Level> {
        let get = |id: Option<LevelId>| id.and_then(|id| levels.get(id.index()));
        horizontal
            .and_then(|h| get(pick_vertical(h)))
            .or_else(|| vertical.and_then(|v| get(pick_horizontal(v))))
    }

    pub fn level(&self, z: LevelId) -> Option<&Level> {
        self.levels.get(z.index())
    }

    pub fn level_mut(&mut self, z: LevelId) -> Option<&mut Level> {
        self.levels.get_mut(z.index())
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Neighbour cell `(i, j)` of level `z`; `(1, 1)` is `z` itself.
    pub fn neighbor(&self, z: LevelId, i: usize, j: usize) -> Option<&NeighborLink> {
        self.neighbors.get(z.index())?.get(j)?.get(i)?.as_ref()
    }

    /// Distinct levels in the 3x3 neighbourhood of `z`, starting with `z`.
    pub fn neighborhood(&self, z: LevelId) -> Vec<LevelId> {
        let mut out = Vec::with_capacity(9);
        if self.level(z).is_none() {
            return out;
        }
        out.push(z);
        for j in 0..3 {
            for i in 0..3 {
                if let Some(link) = self.neighbor(z, i, j)
                    && !out.contains(&link.level)
                {
                    out.push(link.level);
                }
            }
        }
        out
    }
}
