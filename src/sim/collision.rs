//! Collision detection between the player and falling expressions
//!
//! Both sides are axis-aligned boxes. Overlap is strict: boxes that only
//! share an edge do not collide.

use glam::Vec2;

use super::state::FallingExpression;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size / 2.0,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

/// IDs of falling expressions overlapping `player`, in spawn order
pub fn collisions(player: &Aabb, falling: &[FallingExpression]) -> Vec<u32> {
    let mut hits: Vec<u32> = falling
        .iter()
        .filter(|f| player.overlaps(&f.bounds()))
        .map(|f| f.id)
        .collect();
    hits.sort_unstable();
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expression;
    use crate::sim::state::ShapeKind;

    fn falling(id: u32, x: f32, y: f32) -> FallingExpression {
        FallingExpression {
            id,
            expression: Expression::fallback(),
            shape: ShapeKind::Square,
            pos: Vec2::new(x, y),
            size: Vec2::splat(40.0),
            speed: 0.0,
        }
    }

    #[test]
    fn test_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(8.0, 8.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_collisions_sorted_by_id() {
        let player = Aabb::new(Vec2::new(100.0, 100.0), Vec2::new(100.0, 120.0));
        let items = vec![
            falling(9, 110.0, 90.0),
            falling(2, 300.0, 100.0), // miss
            falling(4, 80.0, 60.0),
        ];
        assert_eq!(collisions(&player, &items), vec![4, 9]);
    }

    #[test]
    fn test_no_collisions() {
        let player = Aabb::new(Vec2::new(100.0, 500.0), Vec2::new(100.0, 120.0));
        assert!(collisions(&player, &[falling(1, 100.0, 0.0)]).is_empty());
        assert!(collisions(&player, &[]).is_empty());
    }
}
