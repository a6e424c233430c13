#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixel space.
//!
//! The rendering layer measures pane and tab elements with fractional pixel
//! bounds, so every coordinate here is an `f64`. Origin is the top-left corner
//! of the workbench; `y` grows downward.

/// A pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
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

    /// Component-wise difference `self - origin`.
    #[inline]
    pub fn delta_from(self, origin: Point) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// An axis-aligned rectangle used for hit testing and layout bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
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

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

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

    /// Horizontal midpoint.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical midpoint.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Check if a point lies inside the rectangle.
    ///
    /// Both edges are inclusive: a pointer resting on the right border of a
    /// pane still belongs to that pane.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Split off the leading `fraction` of the width.
    pub fn left_part(&self, fraction: f64) -> Rect {
        Rect::new(self.x, self.y, self.width * fraction.clamp(0.0, 1.0), self.height)
    }

    /// Split off the trailing `fraction` of the width.
    pub fn right_part(&self, fraction: f64) -> Rect {
        let width = self.width * fraction.clamp(0.0, 1.0);
        Rect::new(self.right() - width, self.y, width, self.height)
    }

    /// Split off the leading `fraction` of the height.
    pub fn top_part(&self, fraction: f64) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height * fraction.clamp(0.0, 1.0))
    }

    /// Split off the trailing `fraction` of the height.
    pub fn bottom_part(&self, fraction: f64) -> Rect {
        let height = self.height * fraction.clamp(0.0, 1.0);
        Rect::new(self.x, self.bottom() - height, self.width, height)
    }
}
