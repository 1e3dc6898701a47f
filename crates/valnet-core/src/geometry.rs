//! Geometric primitives for graph layout and rendering.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (also used as a displacement vector)
//! - [`Size`] - Width and height of a node box
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Axes`] - Which axes take part in a layout run
//!
//! # Coordinate System
//!
//! Valnet uses the SVG/screen convention:
//!
//! ```text
//!   (0,0) ────────► +X   (timeline direction)
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Node positions denote the center of the node box.

/// A 2D point in graph coordinate space.
///
/// # Examples
///
/// ```
/// # use valnet_core::geometry::Point;
/// let a = Point::new(10.0, 20.0);
/// let b = Point::new(5.0, 5.0);
///
/// let sum = a.add_point(b);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Checks that neither coordinate is NaN or infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
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

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean length of the vector from the origin to this point
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Treats this point as the center of a box of the given size.
    pub fn to_bounds(self, size: Size) -> Bounds {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;

        Bounds {
            min_x: self.x - half_width,
            min_y: self.y - half_height,
            max_x: self.x + half_width,
            max_y: self.y + half_height,
        }
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height of both sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Multiplies both dimensions by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// A rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from a top-left corner and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Smallest bounds containing both `self` and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Grows the bounds by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }
}

/// Mask selecting which axes participate in a force layout run.
///
/// Disabled axes contribute neither to the pairwise distance nor to the
/// displacement, so a run with [`Axes::Y`] never changes any x-coordinate.
///
/// # Examples
///
/// ```
/// # use valnet_core::geometry::{Axes, Point};
/// let delta = Point::new(3.0, 4.0);
/// assert_eq!(Axes::BOTH.restrict(delta), delta);
/// assert_eq!(Axes::X.restrict(delta), Point::new(3.0, 0.0));
/// assert!(Axes::NONE.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Axes {
    x: bool,
    y: bool,
}

impl Axes {
    /// Horizontal axis only.
    pub const X: Self = Self { x: true, y: false };
    /// Vertical axis only.
    pub const Y: Self = Self { x: false, y: true };
    /// Both axes.
    pub const BOTH: Self = Self { x: true, y: true };
    /// No axis; a layout run with this mask is a no-op.
    pub const NONE: Self = Self { x: false, y: false };

    /// Creates a mask from the two independent flags
    pub fn new(affect_x: bool, affect_y: bool) -> Self {
        Self {
            x: affect_x,
            y: affect_y,
        }
    }

    pub fn affects_x(self) -> bool {
        self.x
    }

    pub fn affects_y(self) -> bool {
        self.y
    }

    /// True when neither axis is enabled
    pub fn is_none(self) -> bool {
        !self.x && !self.y
    }

    /// Zeroes the components of `delta` on disabled axes.
    pub fn restrict(self, delta: Point) -> Point {
        Point {
            x: if self.x { delta.x } else { 0.0 },
            y: if self.y { delta.y } else { 0.0 },
        }
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::BOTH
    }
}

impl std::str::FromStr for Axes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "xy" | "both" => Ok(Self::BOTH),
            "none" => Ok(Self::NONE),
            _ => Err(format!(
                "invalid axes `{s}`, valid values: x, y, xy, both, none"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);

        assert_eq!(a.add_point(b), Point::new(5.0, 8.0));
        assert_eq!(b.sub_point(a), Point::new(3.0, 4.0));
        assert_eq!(b.sub_point(a).hypot(), 5.0);
        assert_eq!(a.scale(2.0), Point::new(2.0, 4.0));
        assert_eq!(a.midpoint(b), Point::new(2.5, 4.0));
    }

    #[test]
    fn test_point_with_axis() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(p.with_x(9.0), Point::new(9.0, 2.0));
        assert_eq!(p.with_y(9.0), Point::new(1.0, 9.0));
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, -1.0).is_finite());
        assert!(!Point::new(f32::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_point_to_bounds_is_centered() {
        let bounds = Point::new(100.0, 50.0).to_bounds(Size::new(150.0, 40.0));
        assert_eq!(bounds.min_x(), 25.0);
        assert_eq!(bounds.max_x(), 175.0);
        assert_eq!(bounds.min_y(), 30.0);
        assert_eq!(bounds.max_y(), 70.0);
        assert_eq!(bounds.to_size(), Size::new(150.0, 40.0));
    }

    #[test]
    fn test_bounds_merge_and_expand() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_top_left(Point::new(20.0, -5.0), Size::new(5.0, 5.0));

        let merged = a.merge(&b);
        assert_eq!(merged.min_point(), Point::new(0.0, -5.0));
        assert_eq!(merged.max_x(), 25.0);
        assert_eq!(merged.max_y(), 10.0);

        let expanded = merged.expand(5.0);
        assert_eq!(expanded.width(), 35.0);
        assert_eq!(expanded.height(), 25.0);
    }

    #[test]
    fn test_size_helpers() {
        let s = Size::new(2.0, 3.0);
        assert_eq!(s.max(Size::new(1.0, 5.0)), Size::new(2.0, 5.0));
        assert_eq!(s.scale(2.0), Size::new(4.0, 6.0));
        assert!(Size::default().is_zero());
    }

    #[test]
    fn test_axes_restrict() {
        let delta = Point::new(-3.0, 7.0);
        assert_eq!(Axes::X.restrict(delta), Point::new(-3.0, 0.0));
        assert_eq!(Axes::Y.restrict(delta), Point::new(0.0, 7.0));
        assert_eq!(Axes::BOTH.restrict(delta), delta);
        assert!(Axes::NONE.restrict(delta).is_zero());
    }

    #[test]
    fn test_axes_from_str() {
        assert_eq!(Axes::from_str("x").unwrap(), Axes::X);
        assert_eq!(Axes::from_str("y").unwrap(), Axes::Y);
        assert_eq!(Axes::from_str("xy").unwrap(), Axes::BOTH);
        assert_eq!(Axes::from_str("both").unwrap(), Axes::BOTH);
        assert_eq!(Axes::from_str("none").unwrap(), Axes::NONE);

        let err = Axes::from_str("z").unwrap_err();
        assert!(err.contains("invalid axes"));
    }

    #[test]
    fn test_axes_new_matches_constants() {
        assert_eq!(Axes::new(true, false), Axes::X);
        assert_eq!(Axes::new(false, true), Axes::Y);
        assert!(Axes::new(false, false).is_none());
        assert!(Axes::default().affects_x() && Axes::default().affects_y());
    }
}
