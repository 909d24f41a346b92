#![forbid(unsafe_code)]

//! Pixel-space geometry value types.
//!
//! Coordinates are signed: a widget dragged past the left or top edge of
//! its window has a negative position, and the designer's pixel-to-cell
//! resolution must be able to represent "before the first track".

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// True if the rectangle has no area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// True if the point lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

// ---------------------------------------------------------------------------
// Margin
// ---------------------------------------------------------------------------

/// Outer margins offsetting a grid's tracks from its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Margin {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margin {
    /// Create a margin from the four edges.
    #[inline]
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The same margin on all four edges.
    #[inline]
    #[must_use]
    pub const fn uniform(m: i32) -> Self {
        Self::new(m, m, m, m)
    }

    /// True if every edge is zero (the serialization default).
    #[inline]
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.right(), 40);
        assert_eq!(r.bottom(), 60);
        assert!(!r.is_empty());
        assert!(r.contains(10, 20));
        assert!(r.contains(39, 59));
        assert!(!r.contains(40, 20));
    }

    #[test]
    fn empty_rects() {
        assert!(Rect::new(0, 0, 0, 10).is_empty());
        assert!(Rect::new(5, 5, 10, -1).is_empty());
        assert!(Rect::default().is_empty());
    }

    #[test]
    fn margin_zero_detection() {
        assert!(Margin::default().is_zero());
        assert!(!Margin::uniform(2).is_zero());
        assert!(!Margin::new(0, 0, 0, 1).is_zero());
    }
}
