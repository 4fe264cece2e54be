use crate::env::{ObstacleFlags, ObstacleSpec};
use crate::geometry::LevelId;

/// What a single filter node lets through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterKind {
    /// Ignores obstacles characters can walk over.
    Walkable,
    /// Ignores ground-level obstacles (bullets fly over them).
    Flyable,
    /// Ignores everything that does not block vision.
    Visible,
    /// Ignores one specific obstacle.
    ObstacleById { level: LevelId, index: usize },
}

/// Chain of "ignore this obstacle" predicates combined with logical OR.
///
/// An obstacle is transparent for a query when any node of the chain ignores
/// it. The head's `extra_margin` inflates every remaining obstacle rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionFilter {
    kind: FilterKind,
    next: Option<Box<CollisionFilter>>,
    extra_margin: f32,
}

impl CollisionFilter {
    pub const WALKABLE: Self = Self::single(FilterKind::Walkable);
    pub const FLYABLE: Self = Self::single(FilterKind::Flyable);
    pub const VISIBLE: Self = Self::single(FilterKind::Visible);

    pub const fn single(kind: FilterKind) -> Self {
        Self {
            kind,
            next: None,
            extra_margin: 0.0,
        }
    }

    pub const fn obstacle_by_id(level: LevelId, index: usize) -> Self {
        Self::single(FilterKind::ObstacleById { level, index })
    }

    /// Excludes one obstacle, then applies the walkable rules.
    pub fn walkable_except(level: LevelId, index: usize) -> Self {
        Self::obstacle_by_id(level, index).then(Self::WALKABLE)
    }

    /// Excludes one obstacle, then applies the flyable rules.
    pub fn flyable_except(level: LevelId, index: usize) -> Self {
        Self::obstacle_by_id(level, index).then(Self::FLYABLE)
    }

    /// Appends `next` at the end of the chain.
    #[must_use]
    pub fn then(mut self, next: CollisionFilter) -> Self {
        self.append(next);
        self
    }

    fn append(&mut self, next: CollisionFilter) {
        if let Some(node) = self.next.as_deref_mut() {
            node.append(next);
        } else {
            self.next = Some(Box::new(next));
        }
    }

    #[must_use]
    pub fn with_margin(mut self, extra_margin: f32) -> Self {
        self.extra_margin = extra_margin;
        self
    }

    #[inline]
    pub fn extra_margin(&self) -> f32 {
        self.extra_margin
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Whether the obstacle at `index` on `level` is transparent for this chain.
    pub fn ignores(&self, spec: &ObstacleSpec, level: LevelId, index: usize) -> bool {
        let own = match self.kind {
            FilterKind::Walkable => spec.flags.contains(ObstacleFlags::IS_WALKABLE),
            FilterKind::Flyable => spec.flags.contains(ObstacleFlags::GROUND_LEVEL),
            FilterKind::Visible => !spec.flags.contains(ObstacleFlags::BLOCKS_VISION_TOO),
            FilterKind::ObstacleById {
                level: target_level,
                index: target,
            } => target_level == level && target == index,
        };
        own || self
            .next
            .as_deref()
            .is_some_and(|next| next.ignores(spec, level, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(flags: ObstacleFlags) -> ObstacleSpec {
        ObstacleSpec::solid_square("x", 0.5).with_flags(flags)
    }

    #[test]
    fn pass_filters_match_their_flag() {
        let door = spec(ObstacleFlags::IS_WALKABLE);
        let water = spec(ObstacleFlags::GROUND_LEVEL);
        let wall = spec(ObstacleFlags::BLOCKS_VISION_TOO);
        let z = LevelId(0);

        assert!(CollisionFilter::WALKABLE.ignores(&door, z, 0));
        assert!(!CollisionFilter::WALKABLE.ignores(&water, z, 0));
        assert!(CollisionFilter::FLYABLE.ignores(&water, z, 0));
        assert!(!CollisionFilter::FLYABLE.ignores(&wall, z, 0));
        assert!(CollisionFilter::VISIBLE.ignores(&door, z, 0));
        assert!(!CollisionFilter::VISIBLE.ignores(&wall, z, 0));
    }

    #[test]
    fn chain_is_logical_or() {
        let wall = spec(ObstacleFlags::BLOCKS_VISION_TOO);
        let door = spec(ObstacleFlags::IS_WALKABLE);
        let z = LevelId(1);
        let chain = CollisionFilter::walkable_except(z, 7);

        assert!(chain.ignores(&wall, z, 7));
        assert!(!chain.ignores(&wall, z, 8));
        assert!(!chain.ignores(&wall, LevelId(2), 7));
        assert!(chain.ignores(&door, z, 8));
    }

    #[test]
    fn then_appends_at_the_tail() {
        let chain = CollisionFilter::obstacle_by_id(LevelId(0), 1)
            .then(CollisionFilter::obstacle_by_id(LevelId(0), 2))
            .then(CollisionFilter::VISIBLE);
        let wall = spec(ObstacleFlags::BLOCKS_VISION_TOO);
        let rug = spec(ObstacleFlags::empty());
        assert!(chain.ignores(&wall, LevelId(0), 1));
        assert!(chain.ignores(&wall, LevelId(0), 2));
        assert!(chain.ignores(&rug, LevelId(0), 3));
        assert!(!chain.ignores(&wall, LevelId(0), 3));
    }
}
