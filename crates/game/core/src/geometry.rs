//! Planar geometry shared by the collision engine and the bot state machine.
//!
//! Coordinates are continuous tile units inside one level. A [`Gps`] adds the
//! level index; positions expressed in another level's frame are produced by
//! [`crate::colldet::update_virtual_position`].
use core::fmt;
use core::ops::{Add, AddAssign, Mul, Sub};

use crate::config::SimConfig;

/// Index of a level inside the ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelId(pub u16);

impl LevelId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Continuous in-level position (also used as a 2D vector).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Centre of the tile at integer coordinates `(x, y)`.
    pub fn tile_center(x: i32, y: i32) -> Self {
        Self::new(x as f32 + 0.5, y as f32 + 0.5)
    }

    #[inline]
    pub fn sq_distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(self, other: Point) -> f32 {
        self.sq_distance(other).sqrt()
    }

    #[inline]
    pub fn sq_length(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.sq_length().sqrt()
    }

    /// Rotates the vector clockwise (screen convention) by `degrees`.
    pub fn rotated(self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: sin * self.y + cos * self.x,
            y: cos * self.y - sin * self.x,
        }
    }

    pub fn with_level(self, z: LevelId) -> Gps {
        Gps::new(self.x, self.y, z)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Position on a specific level.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gps {
    pub x: f32,
    pub y: f32,
    pub z: LevelId,
}

impl Gps {
    pub const fn new(x: f32, y: f32, z: LevelId) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn point(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn with_point(self, p: Point) -> Self {
        Self::new(p.x, p.y, self.z)
    }
}

impl fmt::Display for Gps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}/{:.2}@{}", self.x, self.y, self.z)
    }
}

bitflags::bitflags! {
    /// Where a point lies relative to a [`Rect`]; empty means inside.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct OutCode: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const UP    = 1 << 2;
        const DOWN  = 1 << 3;
    }
}

/// Axis-aligned rectangle in level coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Grows the rectangle outward by `margin` on every side.
    #[must_use]
    pub fn inflated(self, margin: f32) -> Self {
        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Classifies `p` against the rectangle. Points on an edge count as
    /// outside, so only strictly interior points yield an empty code.
    pub fn outcode(&self, p: Point) -> OutCode {
        let mut code = OutCode::empty();
        if p.x <= self.min.x {
            code |= OutCode::LEFT;
        } else if p.x >= self.max.x {
            code |= OutCode::RIGHT;
        }
        if p.y <= self.min.y {
            code |= OutCode::DOWN;
        } else if p.y >= self.max.y {
            code |= OutCode::UP;
        }
        code
    }

    #[inline]
    pub fn contains_strict(&self, p: Point) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    /// Whether the segment `[p1, p2]` touches the interior of the rectangle.
    ///
    /// Trivial accept/reject comes from the outcodes; the ambiguous case tests
    /// whether all four corners lie in the same half-plane of the line.
    pub fn intersects_segment(&self, p1: Point, p2: Point) -> bool {
        let c1 = self.outcode(p1);
        let c2 = self.outcode(p2);
        if c1.intersects(c2) {
            return false;
        }
        if c1.is_empty() || c2.is_empty() {
            return true;
        }
        if p1 == p2 {
            return false;
        }

        // a*x + b*y + c = 0 through p1 and p2
        let a = -(p1.y - p2.y);
        let b = p1.x - p2.x;
        let c = p2.x * p1.y - p2.y * p1.x;
        let side = |x: f32, y: f32| a * x + b * y + c > 0.0;

        let first = side(self.min.x, self.min.y);
        first != side(self.max.x, self.min.y)
            || first != side(self.max.x, self.max.y)
            || first != side(self.min.x, self.max.y)
    }

    /// Inclusive integer tile range `(x0, y0, x1, y1)` overlapped by the rectangle.
    pub fn tile_span(&self) -> (i32, i32, i32, i32) {
        (
            self.min.x.floor() as i32,
            self.min.y.floor() as i32,
            self.max.x.floor() as i32,
            self.max.y.floor() as i32,
        )
    }
}

/// Approximate `1 / sqrt(v)`: bit-level initial guess plus one Newton-Raphson pass.
#[inline]
pub fn fast_inverse_sqrt(v: f32) -> f32 {
    const MAGIC: u32 = 0x5f37_59df;
    let half = v * 0.5;
    let guess = f32::from_bits(MAGIC.wrapping_sub(v.to_bits() >> 1));
    guess * (1.5 - half * guess * guess)
}

/// Moves `target` so that `origin -> target` has unit length.
///
/// Returns `None` for a degenerate vector (squared length within
/// [`SimConfig::NORMALIZE_EPSILON`] of zero); the caller keeps its point.
pub fn normalize_towards(origin: Point, target: Point) -> Option<Point> {
    let len2 = origin.sq_distance(target);
    if len2 == 1.0 {
        return Some(target);
    }
    if len2.abs() < SimConfig::NORMALIZE_EPSILON {
        return None;
    }
    let inv = fast_inverse_sqrt(len2);
    Some(Point::new(
        origin.x + (target.x - origin.x) * inv,
        origin.y + (target.y - origin.y) * inv,
    ))
}

/// Squared distance from `p` to the segment `[p1, p2]`.
///
/// `p2n` is `p2` moved by [`normalize_towards`] from `p1`; it lets the
/// perpendicular case use the cross product without a square root.
pub fn point_segment_sq_distance(p1: Point, p2: Point, p2n: Point, p: Point) -> f32 {
    let dot = (p2.x - p1.x) * (p.x - p1.x) + (p2.y - p1.y) * (p.y - p1.y);
    let seg_len2 = p1.sq_distance(p2);

    if dot > 0.0 && dot < seg_len2 {
        let cross = (p1.y - p2n.y) * p.x + (p2n.x - p1.x) * p.y + (p1.x * p2n.y - p2n.x * p1.y);
        cross * cross
    } else if dot <= 0.0 {
        p.sq_distance(p1)
    } else {
        p.sq_distance(p2)
    }
}

/// Screen bearing from `from` towards `to` (0° faces down, clockwise offsets),
/// folded into `(-180, 180]`.
pub fn bearing_to(from: Point, to: Point) -> f32 {
    let mut angle = (-(to.y - from.y)).atan2(to.x - from.x).to_degrees() + 90.0;
    if angle > 180.0 {
        angle -= 360.0;
    }
    angle
}

/// Folds an angle difference into `(-180, 180]`.
#[inline]
pub fn wrap_angle_delta(mut delta: f32) -> f32 {
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}
