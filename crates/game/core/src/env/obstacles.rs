//! Obstacle type table.
use bitflags::bitflags;

use crate::geometry::{Point, Rect};

/// Index into the obstacle spec table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleKind(pub u16);

bitflags! {
    /// Capability flags of an obstacle type.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ObstacleFlags: u8 {
        /// Characters can walk through it (open doors, rugs).
        const IS_WALKABLE       = 1 << 0;
        /// Flying objects pass over it (water, holes).
        const GROUND_LEVEL      = 1 << 1;
        /// Light does not pass through it.
        const BLOCKS_VISION_TOO = 1 << 2;
    }
}

/// Text form: flag names joined by `|`.
#[cfg(feature = "serde")]
impl serde::Serialize for ObstacleFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ObstacleFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

/// Whether an obstacle type has a collision rectangle at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockArea {
    #[default]
    None,
    Rectangle,
}

/// Static description of an obstacle type.
///
/// Borders are offsets from the obstacle position and follow the isometric
/// map convention: `upper`/`lower` bound the x axis, `left`/`right` the y axis.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObstacleSpec {
    pub name: String,
    pub upper_border: f32,
    pub lower_border: f32,
    pub left_border: f32,
    pub right_border: f32,
    pub block_area: BlockArea,
    pub flags: ObstacleFlags,
}

impl ObstacleSpec {
    /// A solid square of half-width `half` centred on the obstacle position.
    pub fn solid_square(name: impl Into<String>, half: f32) -> Self {
        Self {
            name: name.into(),
            upper_border: -half,
            lower_border: half,
            left_border: -half,
            right_border: half,
            block_area: BlockArea::Rectangle,
            flags: ObstacleFlags::BLOCKS_VISION_TOO,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ObstacleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Collision rectangle of an obstacle of this type placed at `pos`.
    pub fn collision_rect(&self, pos: Point) -> Option<Rect> {
        match self.block_area {
            BlockArea::None => None,
            BlockArea::Rectangle => Some(self.footprint(pos)),
        }
    }

    /// Rectangle spanned by the borders, whether or not it blocks.
    pub fn footprint(&self, pos: Point) -> Rect {
        Rect::new(
            Point::new(pos.x + self.upper_border, pos.y + self.left_border),
            Point::new(pos.x + self.lower_border, pos.y + self.right_border),
        )
    }
}

/// Read-only access to obstacle types.
pub trait ObstacleOracle {
    fn obstacle_spec(&self, kind: ObstacleKind) -> Option<&ObstacleSpec>;
}

/// Obstacle types indexed by [`ObstacleKind`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleSpecTable {
    specs: Vec<ObstacleSpec>,
}

impl ObstacleSpecTable {
    pub fn new(specs: Vec<ObstacleSpec>) -> Self {
        Self { specs }
    }

    /// Appends a spec and returns its kind.
    pub fn push(&mut self, spec: ObstacleSpec) -> ObstacleKind {
        self.specs.push(spec);
        ObstacleKind((self.specs.len() - 1) as u16)
    }

    /// Kind of the first spec called `name`.
    pub fn find(&self, name: &str) -> Option<ObstacleKind> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .map(|index| ObstacleKind(index as u16))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl ObstacleOracle for ObstacleSpecTable {
    fn obstacle_spec(&self, kind: ObstacleKind) -> Option<&ObstacleSpec> {
        self.specs.get(kind.0 as usize)
    }
}
