//! Integer pixel rectangles.
//!
//! World coordinates are whole pixels with y growing downward, matching the
//! sprite sheets and the canvas the game composites into.

use glam::IVec2;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn top_left(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Move the rectangle so its bottom edge sits at `bottom`.
    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    /// Move the rectangle so its top edge sits at `top`.
    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Strict overlap: rectangles that only share an edge do not collide, and
    /// a rectangle with no area never collides.
    pub fn collides(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_position_and_size() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 40);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.top_left(), IVec2::new(10, 20));
    }

    #[test]
    fn set_bottom_keeps_height() {
        let mut r = Rect::new(0, 0, 8, 16);
        r.set_bottom(100);
        assert_eq!(r.y, 84);
        assert_eq!(r.h, 16);
    }

    #[test]
    fn touching_rects_do_not_collide() {
        let a = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        let below = Rect::new(0, 10, 10, 10);
        assert!(!a.collides(&right));
        assert!(!a.collides(&below));
    }

    #[test]
    fn overlapping_rects_collide_both_ways() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(9, 9, 10, 10);
        assert!(a.collides(&b));
        assert!(b.collides(&a));
    }

    #[test]
    fn empty_rect_never_collides() {
        let a = Rect::new(0, 0, 0, 10);
        let b = Rect::new(-5, -5, 20, 20);
        assert!(!a.collides(&b));
        assert!(!b.collides(&a));
    }
}
