//! Faction membership and the friendliness predicate.

/// Side a character fights for. The player is always [`Faction::Friendly`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    #[default]
    Hostile,
    Friendly,
}

impl Faction {
    #[inline]
    pub const fn is_friendly(self) -> bool {
        matches!(self, Faction::Friendly)
    }
}

/// Decides whether two characters are on the same side.
pub trait FactionOracle {
    fn is_friendly(&self, a: Faction, b: Faction) -> bool;
}

/// Two characters are friends exactly when they share a faction.
#[derive(Clone, Copy, Debug, Default)]
pub struct SameSideFactions;

impl FactionOracle for SameSideFactions {
    fn is_friendly(&self, a: Faction, b: Faction) -> bool {
        a == b
    }
}
