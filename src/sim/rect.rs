//! Axis-aligned rectangle geometry for the bucket and raindrops
//!
//! World space is y-up: `(x, y)` is the bottom-left corner, so `y` is the
//! bottom edge and `y + height` the top edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_span;

/// An axis-aligned rectangle in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge (y-up world)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Top edge (y-up world)
    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.top()
            && self.top() > other.y
    }

    /// Keep the rectangle horizontally inside `[0, limit]`
    pub fn clamp_x(&mut self, limit: f32) {
        self.x = clamp_span(self.x, self.width, limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_touching() {
        let a = Rect::new(0.0, 0.0, 64.0, 64.0);
        let b = Rect::new(32.0, 32.0, 64.0, 64.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        // Sharing only an edge is not an overlap
        let right = Rect::new(64.0, 0.0, 64.0, 64.0);
        assert!(!a.overlaps(&right));
        let above = Rect::new(0.0, 64.0, 64.0, 64.0);
        assert!(!a.overlaps(&above));
    }

    #[test]
    fn test_clamp_x() {
        let mut r = Rect::new(-10.0, 20.0, 64.0, 64.0);
        r.clamp_x(800.0);
        assert_eq!(r.x, 0.0);

        r.x = 790.0;
        r.clamp_x(800.0);
        assert_eq!(r.x, 736.0);

        r.x = 300.0;
        r.clamp_x(800.0);
        assert_eq!(r.x, 300.0);
    }

    #[test]
    fn test_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 64.0, 32.0);
        assert_eq!(r.bottom(), 20.0);
        assert_eq!(r.top(), 52.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 74.0);
        assert_eq!(r.center(), Vec2::new(42.0, 36.0));
    }
}
