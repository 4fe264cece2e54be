//! Droid type table: stats, weapon, sensor and animation cycles per bot type.
use crate::error::inform_developers;

/// Index into the droid spec table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DroidType(pub u16);

impl DroidType {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Special perception capability of a droid type.
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
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Sensor {
    /// No special capability.
    #[default]
    Spectral,
    /// Sees an invisible player.
    Infrared,
    /// Sees through vision-blocking obstacles.
    #[strum(to_string = "xray", serialize = "x_ray")]
    XRay,
}

impl Sensor {
    /// Parses a sensor name, falling back to [`Sensor::Spectral`] on unknown input.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            inform_developers(
                "sensors",
                &format!("unknown sensor name '{name}', using 'spectral'"),
            );
            Sensor::Spectral
        })
    }

    pub const fn sees_invisible(self) -> bool {
        matches!(self, Sensor::Infrared)
    }

    pub const fn sees_through_walls(self) -> bool {
        matches!(self, Sensor::XRay)
    }
}

impl From<String> for Sensor {
    fn from(name: String) -> Self {
        Sensor::from_name(&name)
    }
}

impl From<Sensor> for String {
    fn from(sensor: Sensor) -> Self {
        sensor.as_ref().to_owned()
    }
}

/// Rare components a skilled player can extract from a destroyed bot.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BotPart {
    #[strum(serialize = "Tachyon Condensator")]
    TachyonCondensator,
    #[strum(serialize = "Entropy Inverter")]
    EntropyInverter,
    #[strum(serialize = "Antimatter-Matter Converter")]
    AntimatterConverter,
    #[strum(serialize = "Superconducting Relay Unit")]
    Superconductor,
    #[strum(serialize = "Plasma Transistor")]
    PlasmaTransistor,
}

impl BotPart {
    /// Minimum extraction skill level needed to salvage this part.
    pub const fn required_skill(self) -> u8 {
        match self {
            BotPart::TachyonCondensator => 5,
            BotPart::EntropyInverter => 4,
            BotPart::AntimatterConverter => 3,
            BotPart::Superconductor => 2,
            BotPart::PlasmaTransistor => 1,
        }
    }
}

/// Weapon carried by a droid type.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeaponSpec {
    pub melee: bool,
    pub bullet_kind: u16,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub base_damage: u32,
    pub damage_modifier: u32,
    pub recharge_time: f32,
    pub reload_time: f32,
    pub clip_size: u32,
    /// Degrees added to the aim of every shot.
    pub start_angle_modifier: f32,
}

impl WeaponSpec {
    /// Farthest distance a bullet travels before expiring.
    pub fn range(&self) -> f32 {
        self.bullet_lifetime * self.bullet_speed
    }
}

/// One animation cycle: image phase range and playback speed.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationCycle {
    pub first: f32,
    pub last: f32,
    pub speed: f32,
}

impl AnimationCycle {
    pub const fn new(first: f32, last: f32, speed: f32) -> Self {
        Self { first, last, speed }
    }

    #[inline]
    pub fn frames(&self) -> f32 {
        self.last - self.first
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationSet {
    pub walk: AnimationCycle,
    pub attack: AnimationCycle,
    pub gethit: AnimationCycle,
    pub death: AnimationCycle,
    pub stand: AnimationCycle,
}

/// Static description of a droid type.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DroidSpec {
    pub name: String,
    pub max_speed: f32,
    pub max_energy: f32,
    /// Energy regained per second by the healing pass.
    pub lose_health: f32,
    /// Radius within which attack targets are considered.
    pub aggression_distance: f32,
    pub time_spent_eyeing: f32,
    pub recover_time_after_hit: f32,
    pub experience_reward: u32,
    pub monster_level: u32,
    pub to_hit: u32,
    pub is_human: bool,
    pub sensor: Sensor,
    pub greeting_sound: Option<u16>,
    pub parts: Vec<BotPart>,
    pub weapon: WeaponSpec,
    pub animation: AnimationSet,
}

impl DroidSpec {
    pub fn carries(&self, part: BotPart) -> bool {
        self.parts.contains(&part)
    }
}

/// Read-only access to droid types.
pub trait DroidOracle {
    fn droid_spec(&self, kind: DroidType) -> Option<&DroidSpec>;
}

/// Droid types indexed by [`DroidType`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DroidSpecTable {
    specs: Vec<DroidSpec>,
}

impl DroidSpecTable {
    pub fn new(specs: Vec<DroidSpec>) -> Self {
        Self { specs }
    }

    pub fn push(&mut self, spec: DroidSpec) -> DroidType {
        self.specs.push(spec);
        DroidType((self.specs.len() - 1) as u16)
    }

    /// Type of the first droid called `name`.
    pub fn find(&self, name: &str) -> Option<DroidType> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .map(|index| DroidType(index as u16))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl DroidOracle for DroidSpecTable {
    fn droid_spec(&self, kind: DroidType) -> Option<&DroidSpec> {
        self.specs.get(kind.index())
    }
}
