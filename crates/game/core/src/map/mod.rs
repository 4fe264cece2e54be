//! Level storage: tile grids with glued obstacles, waypoint graphs and the
//! precomputed 3x3 level neighbourhood.
mod level;
mod ship;

pub use level::{JumpTargets, Level, Obstacle, Waypoint};
pub use ship::{NeighborLink, Neighborhood, Ship, ShipError};
