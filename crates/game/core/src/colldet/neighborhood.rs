//! Coordinate transforms between a level and its 3x3 neighbourhood.
use crate::geometry::{Gps, LevelId};
use crate::map::Ship;

/// Neighbourhood cell index (0, 1 or 2) of a coordinate relative to `[0, len)`.
#[inline]
pub fn virtual_neighbor_index(coord: f32, len: i32) -> usize {
    if coord < 0.0 {
        0
    } else if coord >= len as f32 {
        2
    } else {
        1
    }
}

/// Re-expresses `pos` in the frame of `target`.
///
/// Returns `None` when `target` is not in the neighbourhood of `pos.z`.
pub fn update_virtual_position(ship: &Ship, pos: Gps, target: LevelId) -> Option<Gps> {
    if pos.z == target {
        return Some(pos);
    }
    for j in 0..3 {
        for i in 0..3 {
            if (i, j) == (1, 1) {
                continue;
            }
            if let Some(link) = ship.neighbor(pos.z, i, j)
                && link.level == target
            {
                return Some(Gps::new(pos.x + link.delta_x, pos.y + link.delta_y, target));
            }
        }
    }
    None
}

/// Maps a position that may lie outside its level's extent to the level it
/// actually belongs to, in that level's native frame.
///
/// Returns `None` when the position falls into a neighbourhood cell without a
/// level.
pub fn resolve_virtual_position(ship: &Ship, pos: Gps) -> Option<Gps> {
    let level = ship.level(pos.z)?;
    let i = virtual_neighbor_index(pos.x, level.xlen);
    let j = virtual_neighbor_index(pos.y, level.ylen);
    let link = ship.neighbor(pos.z, i, j)?;
    Some(Gps::new(pos.x + link.delta_x, pos.y + link.delta_y, link.level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{JumpTargets, Level};

    fn pair() -> Ship {
        // 0 | 1, both 10x8
        Ship::new(vec![
            Level::new(LevelId(0), 10, 8).with_jump_targets(JumpTargets {
                east: Some(LevelId(1)),
                ..JumpTargets::default()
            }),
            Level::new(LevelId(1), 10, 8).with_jump_targets(JumpTargets {
                west: Some(LevelId(0)),
                ..JumpTargets::default()
            }),
        ])
        .unwrap()
    }

    #[test]
    fn neighbor_index_classifies_coordinates() {
        assert_eq!(virtual_neighbor_index(-0.1, 10), 0);
        assert_eq!(virtual_neighbor_index(0.0, 10), 1);
        assert_eq!(virtual_neighbor_index(9.99, 10), 1);
        assert_eq!(virtual_neighbor_index(10.0, 10), 2);
    }

    #[test]
    fn update_maps_into_neighbor_frame() {
        let ship = pair();
        let p = Gps::new(9.5, 3.0, LevelId(0));
        let v = update_virtual_position(&ship, p, LevelId(1)).unwrap();
        assert_eq!(v, Gps::new(-0.5, 3.0, LevelId(1)));
        assert_eq!(update_virtual_position(&ship, p, LevelId(0)), Some(p));
        assert_eq!(update_virtual_position(&ship, p, LevelId(7)), None);
    }

    #[test]
    fn resolve_moves_position_to_owning_level() {
        let ship = pair();
        let crossed = Gps::new(10.25, 4.0, LevelId(0));
        assert_eq!(
            resolve_virtual_position(&ship, crossed),
            Some(Gps::new(0.25, 4.0, LevelId(1)))
        );
        // nothing north of level 0
        assert_eq!(resolve_virtual_position(&ship, Gps::new(3.0, -1.0, LevelId(0))), None);
    }
}
