//! Axis-aligned rectangles and circles
//!
//! Platforms are stored by their center, but every overlap test works on
//! top-left anchored rectangles, so both shapes expose `align()`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width, self.height) / 2.0
    }

    /// Top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.pos,
            Vec2::new(self.right(), self.pos.y),
            Vec2::new(self.pos.x, self.bottom()),
            Vec2::new(self.right(), self.bottom()),
        ]
    }

    /// Closed overlap test (touching edges count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x <= other.right()
            && other.pos.x <= self.right()
            && self.pos.y <= other.bottom()
            && other.pos.y <= self.bottom()
    }

    /// Closest point inside the rectangle to `point`
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.pos.x, self.right()),
            point.y.clamp(self.pos.y, self.bottom()),
        )
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let min = self.pos.min(other.pos);
        let max = Vec2::new(self.right(), self.bottom()).max(Vec2::new(other.right(), other.bottom()));
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(
            self.pos.x - margin,
            self.pos.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub pos: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self { pos, radius }
    }

    /// Bounding box
    pub fn align(&self) -> Rect {
        Rect::new(
            self.pos.x - self.radius,
            self.pos.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_align() {
        let rect = Circle::new(Vec2::new(10.0, -20.0), 5.0).align();
        assert_eq!(rect, Rect::new(5.0, -25.0, 10.0, 10.0));
    }

    #[test]
    fn test_rect_overlaps_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 1.0, 1.0)));
        assert!(!a.overlaps(&Rect::new(10.5, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, -6.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rect_clamp_and_union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(a.clamp_point(Vec2::new(-5.0, 4.0)), Vec2::new(0.0, 4.0));
        assert_eq!(a.clamp_point(Vec2::new(15.0, 20.0)), Vec2::new(10.0, 10.0));

        let b = Rect::new(-5.0, 5.0, 3.0, 20.0);
        assert_eq!(a.union(&b), Rect::new(-5.0, 0.0, 15.0, 25.0));
        assert_eq!(a.expand(1.0), Rect::new(-1.0, -1.0, 12.0, 12.0));
        assert_eq!(a.center(), Vec2::new(5.0, 5.0));
    }
}
