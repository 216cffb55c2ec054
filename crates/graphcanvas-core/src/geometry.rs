//! Geometric primitives for positioning laid-out graph elements.
//!
//! This module provides the geometric types shared by the layout pipeline and
//! the rendering sinks.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by its top-left corner and size
//! - [`Insets`] - Padding values for four sides
//! - [`PageFlip`] - Conversion from engine coordinates into canvas space
//!
//! # Coordinate System
//!
//! Canvas coordinates match SVG and most UI toolkits:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The layout engine instead places its origin at the bottom-left and
//! measures in [`Points`]. [`PageFlip`] performs `y' = page_height - y` and the
//! unit conversion in one step, so every [`Point`] in this crate is already
//! top-left based and in [`Pixels`].

use crate::units::{Pixels, Points};

/// A 2D point in canvas space, measured in device-independent pixels.
///
/// # Examples
///
/// ```
/// # use graphcanvas_core::geometry::Point;
/// let p1 = Point::from_px(10.0, 20.0);
/// let p2 = Point::from_px(5.0, 5.0);
///
/// let diff = p1.sub_point(p2);
/// assert_eq!(diff.x().value(), 5.0);
/// assert_eq!(diff.y().value(), 15.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: Pixels,
    y: Pixels,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: Pixels, y: Pixels) -> Self {
        Self { x, y }
    }

    /// Creates a new point from raw pixel values
    pub fn from_px(x: f32, y: f32) -> Self {
        Self::new(Pixels::new(x), Pixels::new(y))
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> Pixels {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> Pixels {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Euclidean distance to another point, in pixels
    pub fn distance(self, other: Point) -> f32 {
        let delta = self.sub_point(other);
        delta.x.value().hypot(delta.y.value())
    }

    /// Treats this point as a center and returns the top-left corner of a
    /// box of the given size around it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use graphcanvas_core::geometry::{Point, Size};
    /// let center = Point::from_px(50.0, 40.0);
    /// let corner = center.top_left_for(Size::from_px(20.0, 10.0));
    /// assert_eq!(corner, Point::from_px(40.0, 35.0));
    /// ```
    pub fn top_left_for(self, size: Size) -> Self {
        Self {
            x: self.x - size.width / 2,
            y: self.y - size.height / 2,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: Pixels,
    height: Pixels,
}

impl Size {
    pub fn new(width: Pixels, height: Pixels) -> Self {
        Self { width, height }
    }

    /// Creates a size from raw pixel values
    pub fn from_px(width: f32, height: f32) -> Self {
        Self::new(Pixels::new(width), Pixels::new(height))
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> Pixels {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> Pixels {
        self.height
    }

    /// Returns a new Size with padding added to both width and height
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + Pixels::new(insets.horizontal_sum()),
            height: self.height + Pixels::new(insets.vertical_sum()),
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width.value() == 0.0 && self.height.value() == 0.0
    }
}

/// A rectangle defined by its top-left corner and its size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    top_left: Point,
    size: Size,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new(top_left: Point, size: Size) -> Self {
        Self { top_left, size }
    }

    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        Self::new(center.top_left_for(size), size)
    }

    /// Returns the top-left corner
    pub fn top_left(self) -> Point {
        self.top_left
    }

    /// Returns the size of the bounds
    pub fn size(self) -> Size {
        self.size
    }

    /// Returns the width of the bounds
    pub fn width(self) -> Pixels {
        self.size.width
    }

    /// Returns the height of the bounds
    pub fn height(self) -> Pixels {
        self.size.height
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            self.top_left.x + self.size.width / 2,
            self.top_left.y + self.size.height / 2,
        )
    }

    /// Returns true if the point lies inside or on the edge of the bounds
    pub fn contains(self, point: Point) -> bool {
        let min = self.top_left;
        let max = Point::new(min.x + self.size.width, min.y + self.size.height);
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

/// Represents spacing around an element with potentially different values for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with the specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates new insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

/// Converts engine-native coordinates (bottom-left origin, points) into
/// canvas coordinates (top-left origin, pixels).
///
/// The page height is read from the engine's overall bounding box and must be
/// known before any other coordinate of the same layout is converted.
///
/// # Examples
///
/// ```
/// # use graphcanvas_core::{geometry::PageFlip, units::Points};
/// let flip = PageFlip::new(Points::new(72.0));
/// let p = flip.point(Points::new(0.0), Points::new(0.0));
/// // The engine's bottom-left corner is the canvas' bottom-left corner
/// assert_eq!(p.y().value(), 96.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFlip {
    page_height: Points,
}

impl PageFlip {
    /// Creates a flip for a page of the given height
    pub const fn new(page_height: Points) -> Self {
        Self { page_height }
    }

    /// Returns the page height this flip was built with
    pub fn page_height(self) -> Points {
        self.page_height
    }

    /// Mirrors a y-coordinate around the page, staying in points
    pub fn flip_y(self, y: Points) -> Points {
        self.page_height - y
    }

    /// Converts an engine coordinate pair into a canvas point
    pub fn point(self, x: Points, y: Points) -> Point {
        Point::new(Pixels::from(x), Pixels::from(self.flip_y(y)))
    }
}
