#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are CSS pixels relative to the viewport's top-left corner
//! (i.e. post-scroll, the same space `getBoundingClientRect` reports).

use serde::{Deserialize, Serialize};

/// A point in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Grow both dimensions by `amount`.
    #[inline]
    pub fn grow(self, amount: f64) -> Self {
        Self::new(self.width + amount, self.height + amount)
    }
}

/// An axis-aligned rectangle.
///
/// Used both for the bounding box of a highlighted element and for the
/// animated stage shape. Widths and heights are never negative when produced
/// by this crate, but values read from a host are taken as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (right/bottom edges exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Grow the rectangle by `padding` on every side.
    #[inline]
    pub fn inflate(&self, padding: f64) -> Rect {
        Rect::new(
            self.x - padding,
            self.y - padding,
            self.width + padding * 2.0,
            self.height + padding * 2.0,
        )
    }

    /// Whether the rectangle lies entirely inside `[0, width] x [0, height]`.
    #[inline]
    pub fn is_within(&self, viewport: Size) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= viewport.width
            && self.bottom() <= viewport.height
    }

    /// Shift the rectangle so it fits inside the viewport, keeping its size.
    ///
    /// When the rectangle is larger than the viewport on an axis it is pinned
    /// to the origin on that axis.
    pub fn clamp_into(&self, viewport: Size) -> Rect {
        let max_x = (viewport.width - self.width).max(0.0);
        let max_y = (viewport.height - self.height).max(0.0);
        Rect::new(
            self.x.clamp(0.0, max_x),
            self.y.clamp(0.0, max_y),
            self.width,
            self.height,
        )
    }

    /// Compute the intersection with another rectangle, returning `None` if
    /// they do not overlap.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}
