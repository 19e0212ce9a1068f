//! Axis-aligned bounding boxes for sprite collision
//!
//! Every entity collides as a rectangle anchored at its top-left corner:
//! - pos: top-left corner in screen pixels (y grows downward)
//! - size: width/height taken from the entity's fixed sprite size

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A screen-space rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: IVec2,
    /// Width and height
    pub size: IVec2,
}

impl Rect {
    pub const fn new(pos: IVec2, size: IVec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// Center point (rounded toward the top-left)
    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// Overlap test; rectangles that only share an edge do not collide
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(IVec2::new(x, y), IVec2::new(w, h))
    }

    #[test]
    fn test_rect_intersects_overlap() {
        let a = rect(0, 0, 10, 10);
        let b = rect(5, 5, 10, 10);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_rect_touching_edges_do_not_intersect() {
        let a = rect(0, 0, 10, 10);
        assert!(!a.intersects(&rect(10, 0, 10, 10)));
        assert!(!a.intersects(&rect(0, 10, 10, 10)));
    }

    #[test]
    fn test_rect_contained_intersects() {
        let outer = rect(0, 0, 40, 35);
        let inner = rect(10, 10, 5, 15);
        assert!(outer.intersects(&inner));
        assert!(inner.intersects(&outer));
    }
}
