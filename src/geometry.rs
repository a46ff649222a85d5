//! Fixed-point geometry types for layout and pagination
//!
//! All layout math in this crate runs on integral fixed-point units so that
//! repeated additions over a long flow stay reproducible and rounding-stable.
//! One point is divided into [`Fixed::SUBUNITS_PER_PT`] subunits
//! (centipoints). Conversion to and from floating-point display units happens
//! only at the renderer boundary, never inside layout arithmetic.
//!
//! # Coordinate System
//!
//! The coordinate system has its origin at the top-left corner:
//! - Positive X extends to the right
//! - Positive Y extends downward

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A length in integral fixed-point subunits (1/100 pt).
///
/// `Fixed` is the only numeric type layout code computes with. Arithmetic
/// saturates instead of wrapping so a degenerate document cannot corrupt
/// geometry through overflow.
///
/// # Examples
///
/// ```
/// use reportflow::Fixed;
///
/// let a = Fixed::from_pt(12.5);
/// let b = Fixed::from_subunits(50);
/// assert_eq!(a + b, Fixed::from_pt(13.0));
/// assert_eq!((a + b).to_pt(), 13.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i64);

impl Fixed {
  /// Subunits per typographic point.
  pub const SUBUNITS_PER_PT: i64 = 100;

  /// Zero length.
  pub const ZERO: Self = Self(0);

  /// Largest representable length.
  pub const MAX: Self = Self(i64::MAX);

  /// Creates a length from a raw subunit count.
  pub const fn from_subunits(subunits: i64) -> Self {
    Self(subunits)
  }

  /// Creates a length from whole points.
  pub const fn from_pts(pts: i64) -> Self {
    Self(pts * Self::SUBUNITS_PER_PT)
  }

  /// Converts a floating-point point value, rounding to the nearest subunit.
  ///
  /// This is a boundary conversion; callers inside layout code should never
  /// need it.
  pub fn from_pt(pt: f64) -> Self {
    Self((pt * Self::SUBUNITS_PER_PT as f64).round() as i64)
  }

  /// Returns the raw subunit count.
  pub const fn subunits(self) -> i64 {
    self.0
  }

  /// Converts to floating-point points for display-unit consumers.
  pub fn to_pt(self) -> f64 {
    self.0 as f64 / Self::SUBUNITS_PER_PT as f64
  }

  /// Multiplies by an integer ratio, rounding to the nearest subunit.
  ///
  /// Used for percentage resolution and fill-weight splits so that no
  /// float enters the width pass.
  ///
  /// # Examples
  ///
  /// ```
  /// use reportflow::Fixed;
  ///
  /// let w = Fixed::from_pts(300);
  /// assert_eq!(w.mul_ratio(1, 3), Fixed::from_pts(100));
  /// ```
  pub fn mul_ratio(self, num: i64, den: i64) -> Self {
    if den == 0 {
      return Self::ZERO;
    }
    let product = (self.0 as i128) * (num as i128);
    let den = den as i128;
    // Round half away from zero.
    let rounded = if (product >= 0) == (den >= 0) {
      (product + den / 2) / den
    } else {
      (product - den / 2) / den
    };
    Self(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
  }

  /// Returns the smaller of two lengths.
  pub fn min(self, other: Self) -> Self {
    Self(self.0.min(other.0))
  }

  /// Returns the larger of two lengths.
  pub fn max(self, other: Self) -> Self {
    Self(self.0.max(other.0))
  }

  /// Clamps a negative length to zero.
  pub fn clamp_non_negative(self) -> Self {
    Self(self.0.max(0))
  }

  /// Returns true if the length is negative.
  pub const fn is_negative(self) -> bool {
    self.0 < 0
  }
}

impl Add for Fixed {
  type Output = Self;
  fn add(self, rhs: Self) -> Self {
    Self(self.0.saturating_add(rhs.0))
  }
}

impl AddAssign for Fixed {
  fn add_assign(&mut self, rhs: Self) {
    *self = *self + rhs;
  }
}

impl Sub for Fixed {
  type Output = Self;
  fn sub(self, rhs: Self) -> Self {
    Self(self.0.saturating_sub(rhs.0))
  }
}

impl SubAssign for Fixed {
  fn sub_assign(&mut self, rhs: Self) {
    *self = *self - rhs;
  }
}

impl Mul<i64> for Fixed {
  type Output = Self;
  fn mul(self, rhs: i64) -> Self {
    Self(self.0.saturating_mul(rhs))
  }
}

impl Div<i64> for Fixed {
  type Output = Self;
  fn div(self, rhs: i64) -> Self {
    if rhs == 0 {
      Self::ZERO
    } else {
      Self(self.0 / rhs)
    }
  }
}

impl Neg for Fixed {
  type Output = Self;
  fn neg(self) -> Self {
    Self(self.0.saturating_neg())
  }
}

impl Sum for Fixed {
  fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
    iter.fold(Self::ZERO, Add::add)
  }
}

impl fmt::Display for Fixed {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}pt", self.to_pt())
  }
}

/// A 2D point in fixed-point flow space
///
/// The origin (0, 0) is at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
  /// X coordinate (horizontal position, increases to the right)
  pub x: Fixed,
  /// Y coordinate (vertical position, increases downward)
  pub y: Fixed,
}

impl Point {
  /// The zero point at the origin (0, 0)
  pub const ZERO: Self = Self {
    x: Fixed::ZERO,
    y: Fixed::ZERO,
  };

  /// Creates a new point at the given coordinates
  pub const fn new(x: Fixed, y: Fixed) -> Self {
    Self { x, y }
  }

  /// Translates this point by another point's coordinates
  pub fn translate(self, other: Point) -> Self {
    Self {
      x: self.x + other.x,
      y: self.y + other.y,
    }
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// A 2D size in fixed-point units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
  /// Width (horizontal extent)
  pub width: Fixed,
  /// Height (vertical extent)
  pub height: Fixed,
}

impl Size {
  /// A size with zero width and height
  pub const ZERO: Self = Self {
    width: Fixed::ZERO,
    height: Fixed::ZERO,
  };

  /// Creates a new size with the given dimensions
  pub const fn new(width: Fixed, height: Fixed) -> Self {
    Self { width, height }
  }

  /// Returns true if either width or height is zero or negative
  pub fn is_empty(self) -> bool {
    self.width <= Fixed::ZERO || self.height <= Fixed::ZERO
  }
}

impl fmt::Display for Size {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}×{}", self.width, self.height)
  }
}

/// An axis-aligned rectangle in fixed-point flow space
///
/// Defined by an origin point (top-left corner) and a size.
///
/// # Examples
///
/// ```
/// use reportflow::{Fixed, Point, Rect, Size};
///
/// let rect = Rect::from_xywh(
///   Fixed::from_pts(10),
///   Fixed::from_pts(20),
///   Fixed::from_pts(100),
///   Fixed::from_pts(50),
/// );
/// assert_eq!(rect.max_y(), Fixed::from_pts(70));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
  /// The top-left corner of the rectangle
  pub origin: Point,
  /// The size (width and height) of the rectangle
  pub size: Size,
}

impl Rect {
  /// A zero-sized rectangle at the origin
  pub const ZERO: Self = Self {
    origin: Point::ZERO,
    size: Size::ZERO,
  };

  /// Creates a new rectangle from an origin point and size
  pub const fn new(origin: Point, size: Size) -> Self {
    Self { origin, size }
  }

  /// Creates a rectangle from x, y, width, height components
  pub const fn from_xywh(x: Fixed, y: Fixed, width: Fixed, height: Fixed) -> Self {
    Self {
      origin: Point::new(x, y),
      size: Size::new(width, height),
    }
  }

  /// Returns the x coordinate of the left edge
  pub fn x(self) -> Fixed {
    self.origin.x
  }

  /// Returns the y coordinate of the top edge
  pub fn y(self) -> Fixed {
    self.origin.y
  }

  /// Returns the width
  pub fn width(self) -> Fixed {
    self.size.width
  }

  /// Returns the height
  pub fn height(self) -> Fixed {
    self.size.height
  }

  /// Returns the x coordinate of the right edge
  pub fn max_x(self) -> Fixed {
    self.origin.x + self.size.width
  }

  /// Returns the y coordinate of the bottom edge
  pub fn max_y(self) -> Fixed {
    self.origin.y + self.size.height
  }

  /// Returns true if this rectangle intersects another rectangle
  pub fn intersects(self, other: Rect) -> bool {
    self.x() <= other.max_x()
      && self.max_x() >= other.x()
      && self.y() <= other.max_y()
      && self.max_y() >= other.y()
  }

  /// Computes the intersection of two rectangles
  ///
  /// Returns `None` if the rectangles don't intersect.
  pub fn intersection(self, other: Rect) -> Option<Rect> {
    if !self.intersects(other) {
      return None;
    }

    let min_x = self.x().max(other.x());
    let min_y = self.y().max(other.y());
    let max_x = self.max_x().min(other.max_x());
    let max_y = self.max_y().min(other.max_y());

    Some(Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y))
  }

  /// Translates this rectangle by an offset
  pub fn translate(self, offset: Point) -> Rect {
    Rect {
      origin: self.origin.translate(offset),
      size: self.size,
    }
  }
}

impl fmt::Display for Rect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} @ {}", self.size, self.origin)
  }
}

/// Edge offsets representing spacing on all four sides
///
/// Used for padding and page margins. Follows box-model convention:
/// top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeOffsets {
  /// Top edge offset
  pub top: Fixed,
  /// Right edge offset
  pub right: Fixed,
  /// Bottom edge offset
  pub bottom: Fixed,
  /// Left edge offset
  pub left: Fixed,
}

impl EdgeOffsets {
  /// Zero offsets on all sides
  pub const ZERO: Self = Self {
    top: Fixed::ZERO,
    right: Fixed::ZERO,
    bottom: Fixed::ZERO,
    left: Fixed::ZERO,
  };

  /// Creates edge offsets with the same value on all sides
  pub const fn all(value: Fixed) -> Self {
    Self {
      top: value,
      right: value,
      bottom: value,
      left: value,
    }
  }

  /// Creates edge offsets with individual values for each side
  pub const fn new(top: Fixed, right: Fixed, bottom: Fixed, left: Fixed) -> Self {
    Self {
      top,
      right,
      bottom,
      left,
    }
  }

  /// Returns the sum of left and right offsets
  pub fn horizontal(self) -> Fixed {
    self.left + self.right
  }

  /// Returns the sum of top and bottom offsets
  pub fn vertical(self) -> Fixed {
    self.top + self.bottom
  }
}

impl fmt::Display for EdgeOffsets {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "[t:{}, r:{}, b:{}, l:{}]",
      self.top, self.right, self.bottom, self.left
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fixed_pt_conversions() {
    assert_eq!(Fixed::from_pts(12), Fixed::from_subunits(1200));
    assert_eq!(Fixed::from_pt(12.345), Fixed::from_subunits(1235));
    assert_eq!(Fixed::from_subunits(1235).to_pt(), 12.35);
  }

  #[test]
  fn test_fixed_saturating_arithmetic() {
    assert_eq!(Fixed::MAX + Fixed::from_pts(1), Fixed::MAX);
    assert_eq!(
      Fixed::from_subunits(i64::MIN) - Fixed::from_pts(1),
      Fixed::from_subunits(i64::MIN)
    );
  }

  #[test]
  fn test_fixed_mul_ratio_rounds_to_nearest() {
    let w = Fixed::from_subunits(100);
    assert_eq!(w.mul_ratio(1, 3), Fixed::from_subunits(33));
    assert_eq!(w.mul_ratio(2, 3), Fixed::from_subunits(67));
    assert_eq!(w.mul_ratio(1, 0), Fixed::ZERO);
  }

  #[test]
  fn test_fixed_mul_ratio_negative() {
    let w = Fixed::from_subunits(-100);
    assert_eq!(w.mul_ratio(1, 3), Fixed::from_subunits(-33));
  }

  #[test]
  fn test_fixed_clamp_non_negative() {
    assert_eq!(Fixed::from_pts(-5).clamp_non_negative(), Fixed::ZERO);
    assert_eq!(Fixed::from_pts(5).clamp_non_negative(), Fixed::from_pts(5));
  }

  #[test]
  fn test_fixed_sum() {
    let total: Fixed = [Fixed::from_pts(1), Fixed::from_pts(2), Fixed::from_pts(3)]
      .into_iter()
      .sum();
    assert_eq!(total, Fixed::from_pts(6));
  }

  #[test]
  fn test_point_translate() {
    let p1 = Point::new(Fixed::from_pts(10), Fixed::from_pts(20));
    let p2 = Point::new(Fixed::from_pts(5), Fixed::from_pts(3));
    assert_eq!(
      p1.translate(p2),
      Point::new(Fixed::from_pts(15), Fixed::from_pts(23))
    );
  }

  #[test]
  fn test_size_is_empty() {
    assert!(Size::ZERO.is_empty());
    assert!(Size::new(Fixed::ZERO, Fixed::from_pts(10)).is_empty());
    assert!(!Size::new(Fixed::from_pts(10), Fixed::from_pts(10)).is_empty());
  }

  #[test]
  fn test_rect_accessors() {
    let rect = Rect::from_xywh(
      Fixed::from_pts(10),
      Fixed::from_pts(20),
      Fixed::from_pts(100),
      Fixed::from_pts(50),
    );
    assert_eq!(rect.max_x(), Fixed::from_pts(110));
    assert_eq!(rect.max_y(), Fixed::from_pts(70));
  }

  #[test]
  fn test_rect_intersection() {
    let a = Rect::from_xywh(
      Fixed::ZERO,
      Fixed::ZERO,
      Fixed::from_pts(10),
      Fixed::from_pts(10),
    );
    let b = Rect::from_xywh(
      Fixed::from_pts(5),
      Fixed::from_pts(5),
      Fixed::from_pts(10),
      Fixed::from_pts(10),
    );
    let c = Rect::from_xywh(
      Fixed::from_pts(20),
      Fixed::from_pts(20),
      Fixed::from_pts(10),
      Fixed::from_pts(10),
    );

    assert_eq!(
      a.intersection(b),
      Some(Rect::from_xywh(
        Fixed::from_pts(5),
        Fixed::from_pts(5),
        Fixed::from_pts(5),
        Fixed::from_pts(5),
      ))
    );
    assert_eq!(a.intersection(c), None);
  }

  #[test]
  fn test_rect_translate() {
    let rect = Rect::from_xywh(
      Fixed::from_pts(10),
      Fixed::from_pts(10),
      Fixed::from_pts(20),
      Fixed::from_pts(20),
    );
    let moved = rect.translate(Point::new(Fixed::from_pts(5), Fixed::from_pts(3)));
    assert_eq!(
      moved,
      Rect::from_xywh(
        Fixed::from_pts(15),
        Fixed::from_pts(13),
        Fixed::from_pts(20),
        Fixed::from_pts(20),
      )
    );
  }

  #[test]
  fn test_edge_offsets_sums() {
    let offsets = EdgeOffsets::new(
      Fixed::from_pts(5),
      Fixed::from_pts(10),
      Fixed::from_pts(5),
      Fixed::from_pts(15),
    );
    assert_eq!(offsets.horizontal(), Fixed::from_pts(25));
    assert_eq!(offsets.vertical(), Fixed::from_pts(10));
  }
}
