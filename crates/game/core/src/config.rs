use crate::env::ObstacleKind;

/// Simulation constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Seconds between two throttled ATTACK movement decisions.
    pub attack_move_rate: f32,
    /// Seconds between two stuck-in-wall checks of the same bot.
    pub stuck_check_interval: f32,
    /// Wait imposed after a bot collision or a failed path request.
    pub wait_collision: f32,
    /// Lower bound of the random wait when no waypoint is free.
    pub no_free_waypoint_wait_min: f32,
    /// Upper bound of the random wait when no waypoint is free.
    pub no_free_waypoint_wait_max: f32,
    /// Wait after every random-walk candidate was rejected.
    pub random_walk_wait: f32,
    /// Seconds between two healing passes.
    pub heal_interval: f32,
    /// Degrees per second while eyeing a target.
    pub eye_turn_rate: f32,
    /// Degrees per second while turning towards the next waypoint.
    pub waypoint_turn_rate: f32,
    /// How many recorded frames a follower lags behind the player.
    pub follow_delay_frames: usize,
    /// A follower stops when it is this close to the player.
    pub follow_stop_distance: f32,
    /// Capacity of the player's position history.
    pub player_history_len: usize,
    /// Decal obstacles sprayed by human droids.
    pub blood_decals: Vec<ObstacleKind>,
    /// Decal obstacles sprayed by machines.
    pub oil_decals: Vec<ObstacleKind>,
    /// Number of item types known to the item tables; forced drops must be
    /// below it.
    pub item_type_count: u32,
}

impl SimConfig {
    // ===== geometry =====
    /// Squared lengths closer to zero than this cannot be normalized.
    pub const NORMALIZE_EPSILON: f32 = 1e-4;
    /// Radius used by the droid-proximity predicates.
    pub const CHARACTER_RADIUS: f32 = 0.5;
    /// Radius used by enemy-enemy collision handling.
    pub const BOT_COLLISION_RADIUS: f32 = 0.25;
    /// Distance an escaping character is placed outside a rectangle edge.
    pub const ESCAPE_OFFSET: f32 = 0.1;
    /// Side length, in tiles, of the window scanned when escaping.
    pub const ESCAPE_WINDOW: i32 = 4;

    // ===== path buffer =====
    pub const MAX_PATH_POINTS: usize = 5;
    pub const MAX_INTERMEDIATE_POINTS: usize = 4;

    // ===== state machine =====
    pub const REACHED_DISTANCE: f32 = 0.1;
    pub const RUSH_SQ_RADIUS: f32 = 16.0;
    pub const RUSH_TALK_DISTANCE: f32 = 1.0;
    pub const TARGET_FOLLOW_SLACK_SQ: f32 = 9.0;
    pub const WAYPOINT_REPEAT_SHARES: u32 = 3;
    pub const RANDOM_WALK_ATTEMPTS: usize = 4;
    /// Random walk candidates are drawn within this many tiles per axis.
    pub const RANDOM_WALK_SPAN: f32 = 3.0;
    pub const FROZEN_SPEED_FACTOR: f32 = 0.2;
    /// Markers that never form a group.
    pub const UNGROUPED_MARKERS: [i32; 2] = [0, 101];

    // ===== combat =====
    pub const SQUARED_MELEE_APPROACH_DIST: f32 = 2.25;
    pub const SQUARED_MELEE_MAX_DIST: f32 = 4.0;
    pub const MIN_RANGED_SQ_DIST: f32 = 1.5;
    pub const HIT_STUN_RATIO: f32 = 0.05;
    /// `random_int(5) == 0`, i.e. one chance in six.
    pub const BLOOD_ON_HIT_CHANCE: u32 = 5;
    /// `random_int(15) == 1`.
    pub const BLOOD_ON_DEATH_CHANCE: u32 = 15;
    /// `random_int(10) == 1`.
    pub const PART_DROP_CHANCE: u32 = 10;
    pub const MELEE_TO_HIT_PER_LEVEL: u32 = 60;
    /// Bullets start this far from the shooter along the aim.
    pub const BULLET_START_OFFSET: f32 = 0.5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ATTACK_MOVE_RATE: f32 = 0.2;
    pub const DEFAULT_STUCK_CHECK_INTERVAL: f32 = 1.0;
    pub const DEFAULT_WAIT_COLLISION: f32 = 1.0;
    pub const DEFAULT_NO_FREE_WAYPOINT_WAIT: (f32, f32) = (0.5, 1.0);
    pub const DEFAULT_RANDOM_WALK_WAIT: f32 = 1.6;
    pub const DEFAULT_HEAL_INTERVAL: f32 = 3.0;
    pub const DEFAULT_EYE_TURN_RATE: f32 = 120.0;
    pub const DEFAULT_WAYPOINT_TURN_RATE: f32 = 90.0;
    pub const DEFAULT_FOLLOW_DELAY_FRAMES: usize = 8;
    pub const DEFAULT_FOLLOW_STOP_DISTANCE: f32 = 1.0;
    pub const DEFAULT_PLAYER_HISTORY_LEN: usize = 32;

    pub fn new() -> Self {
        Self {
            attack_move_rate: Self::DEFAULT_ATTACK_MOVE_RATE,
            stuck_check_interval: Self::DEFAULT_STUCK_CHECK_INTERVAL,
            wait_collision: Self::DEFAULT_WAIT_COLLISION,
            no_free_waypoint_wait_min: Self::DEFAULT_NO_FREE_WAYPOINT_WAIT.0,
            no_free_waypoint_wait_max: Self::DEFAULT_NO_FREE_WAYPOINT_WAIT.1,
            random_walk_wait: Self::DEFAULT_RANDOM_WALK_WAIT,
            heal_interval: Self::DEFAULT_HEAL_INTERVAL,
            eye_turn_rate: Self::DEFAULT_EYE_TURN_RATE,
            waypoint_turn_rate: Self::DEFAULT_WAYPOINT_TURN_RATE,
            follow_delay_frames: Self::DEFAULT_FOLLOW_DELAY_FRAMES,
            follow_stop_distance: Self::DEFAULT_FOLLOW_STOP_DISTANCE,
            player_history_len: Self::DEFAULT_PLAYER_HISTORY_LEN,
            blood_decals: Vec::new(),
            oil_decals: Vec::new(),
            item_type_count: u32::MAX,
        }
    }

    /// Sets the decal obstacle kinds used by blood spray (builder pattern).
    #[must_use]
    pub fn with_decals(mut self, blood: Vec<ObstacleKind>, oil: Vec<ObstacleKind>) -> Self {
        self.blood_decals = blood;
        self.oil_decals = oil;
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
