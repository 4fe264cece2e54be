//! Combat resolution.
//!
//! Everything that changes a bot's energy goes through [`apply_hit`], which
//! also handles the consequences of a kill: messages, loot, decals and the
//! move to the dead list. [`fire_shot`] is the attacker's side.
//!
//! Bots are usually taken out of the registry while these run, so group
//! helpers only ever see the *other* members of a group.

mod blood;
mod group;
mod hit;
mod kill;
mod shot;
mod treasure;

pub use blood::spray_blood;
pub use group::{group_turn_hostile, is_grouped, set_rest_of_group_to_state};
pub use hit::{Hit, HitOutcome, apply_hit};
pub use kill::kill_bot;
pub use shot::fire_shot;
pub use treasure::drop_treasure;
