//! Collision detection: segment/point queries against glued obstacles across
//! level boundaries, character proximity, and escaping from obstacles.
mod direct_line;
mod escape;
mod filter;
mod neighborhood;
mod proximity;

pub use direct_line::CollisionMap;
pub use filter::{CollisionFilter, FilterKind};
pub use neighborhood::{resolve_virtual_position, update_virtual_position, virtual_neighbor_index};
pub use proximity::CharacterProximity;
