//! Per-bot simulation state.
use core::fmt;

use bitflags::bitflags;

use crate::env::{DroidType, Faction, PathPoints};
use crate::geometry::{Gps, Point};

/// Sequentially assigned, never reused bot identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BotId(pub u32);

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Weak reference to a bot: its id plus the registry epoch it was taken in.
///
/// A handle from an older epoch must be revalidated through
/// [`crate::state::BotRegistry::revalidate`] before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BotHandle {
    pub id: BotId,
    pub epoch: u32,
}

/// What a bot is currently doing.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatState {
    #[default]
    WaypointlessWandering,
    SelectNewWaypoint,
    TurnTowardsNextWaypoint,
    MoveAlongRandomWaypoints,
    StopAndEyeTarget,
    Attack,
    ReturningHome,
    Paralyzed,
    CompletelyFixed,
    FollowTux,
    RushTuxAndOpenTalk,
    UndefinedState,
}

/// Current attack target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackTarget {
    #[default]
    None,
    Player,
    Bot(BotHandle),
}

impl AttackTarget {
    pub fn is_none(&self) -> bool {
        matches!(self, AttackTarget::None)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AnimationKind {
    #[default]
    Walk,
    Attack,
    GetHit,
    Death,
    Stand,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animation {
    pub kind: AnimationKind,
    pub phase: f32,
}

/// Position on the level's waypoint graph: heading from `last` to `next`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaypointLink {
    pub next: usize,
    pub last: usize,
}

impl WaypointLink {
    /// Standing on `waypoint`.
    pub const fn at(waypoint: usize) -> Self {
        Self {
            next: waypoint,
            last: waypoint,
        }
    }

    #[must_use]
    pub const fn swapped(self) -> Self {
        Self {
            next: self.last,
            last: self.next,
        }
    }
}

bitflags! {
    /// Disposition flags set by content or dialog.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct BotFlags: u16 {
        const WILL_RESPAWN            = 1 << 0;
        const WILL_RUSH_TUX           = 1 << 1;
        const FOLLOW_TUX              = 1 << 2;
        const COMPLETELY_FIXED        = 1 << 3;
        /// Placed by hand; never scattered when its level is shuffled.
        const SPECIAL_FORCE           = 1 << 4;
        /// Only starts an attack run when its weapon reaches the target in a straight line.
        const ATTACK_ONLY_DIRECT_LINE = 1 << 5;
        /// Controlled by the player after a takeover.
        const TAKEN_OVER              = 1 << 6;
        const HAS_GREETED             = 1 << 7;
    }
}

/// Text form: flag names joined by `|`.
#[cfg(feature = "serde")]
impl serde::Serialize for BotFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for BotFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

/// Status effect timers, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTimers {
    pub frozen: f32,
    pub paralysis: f32,
    pub poison_duration: f32,
    /// Damage per second while poisoned.
    pub poison_dps: f32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bot {
    // ===== identity =====
    pub id: BotId,
    pub kind: DroidType,
    pub dialog_section: String,

    // ===== disposition =====
    pub faction: Faction,
    pub flags: BotFlags,
    /// Group marker; bots sharing a marker act together.
    pub marker: i32,
    pub max_distance_to_home: f32,
    pub home_waypoint: Option<usize>,
    pub on_death_drop: Option<u32>,

    // ===== simulation =====
    pub pos: Gps,
    pub speed: Point,
    pub energy: f32,
    pub state: CombatState,
    pub state_timeout: f32,
    pub target: AttackTarget,
    /// Where the retained target stood when it was acquired.
    pub target_last_pos: Option<Point>,
    pub waypoints: Option<WaypointLink>,
    /// Planned route; a single entry equal to `pos` means "stand here".
    pub path: PathPoints,
    /// Movement target requested on the previous tick.
    pub move_target: Option<Point>,
    /// Free-roam target of a bot without waypoints.
    pub wander_target: Option<Point>,
    pub pure_wait: f32,
    pub firewait: f32,
    pub last_combat_step: f32,
    pub ammo_left: u32,
    pub status: StatusTimers,
    pub stuck_timer: f32,
    pub was_stuck: bool,
    pub animation: Animation,
    pub current_angle: f32,
}

impl Bot {
    /// A fresh bot of `kind` at `pos`. Energy and ammo are filled on spawn.
    pub fn new(kind: DroidType, pos: Gps) -> Self {
        Self {
            id: BotId::default(),
            kind,
            dialog_section: String::new(),
            faction: Faction::default(),
            flags: BotFlags::empty(),
            marker: 0,
            max_distance_to_home: 0.0,
            home_waypoint: None,
            on_death_drop: None,
            pos,
            speed: Point::ORIGIN,
            energy: 0.0,
            state: CombatState::WaypointlessWandering,
            state_timeout: 0.0,
            target: AttackTarget::None,
            target_last_pos: None,
            waypoints: None,
            path: PathPoints::new(),
            move_target: None,
            wander_target: None,
            pure_wait: 0.0,
            firewait: 0.0,
            // the first attack step is never throttled
            last_combat_step: 100.0,
            ammo_left: 0,
            status: StatusTimers::default(),
            stuck_timer: 0.0,
            was_stuck: false,
            animation: Animation::default(),
            current_angle: 0.0,
        }
    }

    #[must_use]
    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: BotFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_marker(mut self, marker: i32) -> Self {
        self.marker = marker;
        self
    }

    /// Places the bot on waypoint `home` and remembers it as home.
    #[must_use]
    pub fn with_home(mut self, home: usize, max_distance: f32) -> Self {
        self.home_waypoint = Some(home);
        self.waypoints = Some(WaypointLink::at(home));
        self.max_distance_to_home = max_distance;
        self
    }

    #[inline]
    pub fn is_friendly(&self) -> bool {
        self.faction.is_friendly()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.pure_wait > 0.0
    }

    /// Replaces the route with "stand here".
    pub fn stand_still(&mut self) {
        self.path.clear();
        self.path.push(self.pos.point());
    }

    /// Counts down all timers by `dt`, clamping at zero.
    pub fn tick_timers(&mut self, dt: f32) {
        let down = |t: &mut f32| *t = (*t - dt).max(0.0);
        down(&mut self.pure_wait);
        down(&mut self.firewait);
        down(&mut self.status.frozen);
        down(&mut self.status.paralysis);
        down(&mut self.status.poison_duration);
        self.last_combat_step += dt;
        self.stuck_timer += dt;
    }
}
