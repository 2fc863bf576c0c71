//! Core wire protocol types
//!
//! These types represent the geometry exchanged across the request boundary.
//! They are kept minimal and close to the wire layout for efficiency.

use std::fmt;

/// Rectangle, half-open on the right and bottom edges.
///
/// A rectangle with `left >= right` or `top >= bottom` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// The canonical empty rectangle
    pub const EMPTY: Rect = Rect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rectangle from an origin and a size
    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Width, or 0 for an empty rectangle
    pub fn width(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.right.abs_diff(self.left) as u64
        }
    }

    /// Height, or 0 for an empty rectangle
    pub fn height(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.bottom.abs_diff(self.top) as u64
        }
    }

    /// Number of pixels covered; a full-plane rectangle still fits in `u64`
    pub fn area(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    /// Check whether a point lies inside (right/bottom exclusive)
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Check whether two rectangles share a non-empty area
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Intersection of two rectangles, or `None` when they do not overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let rect = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        if rect.is_empty() {
            None
        } else {
            Some(rect)
        }
    }

    /// Smallest rectangle enclosing both; empty operands are ignored
    pub fn bounding(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// Translate by `(dx, dy)`, returning `None` on coordinate overflow
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Rect> {
        Some(Rect::new(
            self.left.checked_add(dx)?,
            self.top.checked_add(dy)?,
            self.right.checked_add(dx)?,
            self.bottom.checked_add(dy)?,
        ))
    }

    /// Mirror horizontally inside the client area of a window.
    ///
    /// Only the width of `client_rect` matters: coordinates are relative to
    /// the client origin, so `left' = width - right` and `right' = width - left`.
    /// Returns `None` on coordinate overflow.
    pub fn mirror(&self, client_rect: &Rect) -> Option<Rect> {
        let width = client_rect.right.checked_sub(client_rect.left)?;
        Some(Rect::new(
            width.checked_sub(self.right)?,
            self.top,
            width.checked_sub(self.left)?,
            self.bottom,
        ))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Size in bytes of one rectangle record on the wire
pub const RECT_RECORD_SIZE: usize = 16;

/// Byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LSBFirst = 0,
    MSBFirst = 1,
}

impl ByteOrder {
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::LSBFirst
        } else {
            ByteOrder::MSBFirst
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::native()
    }
}
