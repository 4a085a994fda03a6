//! Geometry primitives shared by canvas space and pixel space.
//!
//! [`Rect`] is floating point and is used for everything up to the moment a
//! crop happens. [`PixelRect`] is the integer rectangle handed to a
//! [`PixelBuffer`](super::PixelBuffer) for cropping.

use std::fmt;

/// Values closer than this to an integer are treated as that integer when
/// rounding to pixels.
pub const PIXEL_EPSILON: f64 = 1e-6;

/// A point in canvas or pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with a top-left origin.
///
/// Width and height may be zero or negative. Such a rectangle is *empty* and
/// stands for "no intersection" or "no grid"; it is never an error to hold one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The zero rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A rectangle of the given size centered on `center`.
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Area, or zero for an empty rectangle.
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// True when the rectangle covers no area (or holds non-finite values).
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.x.is_finite()
            || !self.y.is_finite()
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    /// The overlapping region, or [`Rect::zero`] when the two are disjoint.
    pub fn intersection(&self, other: &Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::zero();
        }

        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());

        if x1 <= x0 || y1 <= y0 {
            return Rect::zero();
        }

        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// True when the two rectangles share a region of positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Half-open containment: the min edges are inside, the max edges are not.
    pub fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x >= self.x
            && point.x < self.max_x()
            && point.y >= self.y
            && point.y < self.max_y()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Scale origin and size about the coordinate origin.
    pub fn scaled(&self, factor: f64) -> Rect {
        Rect::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Pull every edge inside `bounds`. Disjoint input collapses to zero size
    /// on the nearest bound edge.
    pub fn clamped_to(&self, bounds: &Rect) -> Rect {
        let x0 = self.x.clamp(bounds.x, bounds.max_x());
        let y0 = self.y.clamp(bounds.y, bounds.max_y());
        let x1 = self.max_x().clamp(bounds.x, bounds.max_x());
        let y1 = self.max_y().clamp(bounds.y, bounds.max_y());

        Rect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }
}

/// An integer crop rectangle in a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The smallest pixel rectangle covering `rect`, clamped to a
    /// `width` x `height` buffer.
    ///
    /// The origin is floored and the far edge ceiled so partial pixels are
    /// kept; clamping happens after rounding. Returns `None` when nothing of
    /// the buffer remains.
    pub fn enclosing(rect: &Rect, width: u32, height: u32) -> Option<PixelRect> {
        if rect.is_empty() {
            return None;
        }

        let x0 = floor_px(rect.x).clamp(0.0, f64::from(width));
        let y0 = floor_px(rect.y).clamp(0.0, f64::from(height));
        let x1 = ceil_px(rect.max_x()).clamp(0.0, f64::from(width));
        let y1 = ceil_px(rect.max_y()).clamp(0.0, f64::from(height));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        // All four values are integral and inside the buffer after clamping.
        Some(PixelRect::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }

    pub fn max_x(&self) -> u32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the rectangle lies entirely inside a `width` x `height` buffer.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

fn floor_px(v: f64) -> f64 {
    (v + PIXEL_EPSILON).floor()
}

fn ceil_px(v: f64) -> f64 {
    (v - PIXEL_EPSILON).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center() {
        let r = Rect::from_center(Point::ORIGIN, 400.0, 200.0);
        assert_eq!(r, Rect::new(-200.0, -100.0, 400.0, 200.0));
        assert_eq!(r.center(), Point::ORIGIN);
    }

    #[test]
    fn test_intersection_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Rect::new(5.0, 5.0, 5.0, 5.0));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_intersection_disjoint_is_zero() {
        let a = Rect::new(-200.0, -200.0, 400.0, 400.0);
        let b = Rect::new(300.0, 300.0, 400.0, 400.0);
        assert_eq!(a.intersection(&b), Rect::zero());
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_is_empty() {
        assert!(Rect::zero().is_empty());
        assert!(Rect::new(0.0, 0.0, -1.0, 5.0).is_empty());
        assert!(Rect::new(0.0, 0.0, f64::NAN, 5.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
        assert_eq!(Rect::new(0.0, 0.0, -3.0, 4.0).area(), 0.0);
    }

    #[test]
    fn test_contains_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(9.5, 9.5)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
        assert!(!r.contains(Point::new(-0.1, 5.0)));
    }

    #[test]
    fn test_translated_and_scaled() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.translated(-10.0, 5.0), Rect::new(0.0, 25.0, 30.0, 40.0));
        assert_eq!(r.scaled(0.5), Rect::new(5.0, 10.0, 15.0, 20.0));
    }

    #[test]
    fn test_clamped_to() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let r = Rect::new(-5.0, 90.0, 20.0, 20.0);
        assert_eq!(r.clamped_to(&bounds), Rect::new(0.0, 90.0, 15.0, 10.0));

        let outside = Rect::new(150.0, 150.0, 10.0, 10.0);
        assert!(outside.clamped_to(&bounds).is_empty());
    }

    #[test]
    fn test_enclosing_rounds_outward() {
        let r = Rect::new(10.4, 20.6, 5.2, 5.0);
        let px = PixelRect::enclosing(&r, 100, 100).unwrap();
        assert_eq!(px, PixelRect::new(10, 20, 6, 6));
    }

    #[test]
    fn test_enclosing_snaps_rounding_noise() {
        // 0.1 + 0.2 style noise must not grow the crop by a pixel.
        let r = Rect::new(5.0, 5.0, 100.0 / 3.0 * 3.0 - 10.000000001, 90.0);
        let px = PixelRect::enclosing(&r, 300, 300).unwrap();
        assert_eq!(px, PixelRect::new(5, 5, 90, 90));
    }

    #[test]
    fn test_enclosing_clamps_after_rounding() {
        let r = Rect::new(-0.5, 98.2, 50.0, 10.0);
        let px = PixelRect::enclosing(&r, 100, 100).unwrap();
        assert_eq!(px, PixelRect::new(0, 98, 50, 2));
        assert!(px.fits_within(100, 100));
    }

    #[test]
    fn test_enclosing_outside_is_none() {
        let r = Rect::new(120.0, 0.0, 10.0, 10.0);
        assert_eq!(PixelRect::enclosing(&r, 100, 100), None);
        assert_eq!(PixelRect::enclosing(&Rect::zero(), 100, 100), None);
    }

    #[test]
    fn test_pixel_rect_display() {
        assert_eq!(PixelRect::new(1, 2, 3, 4).to_string(), "3x4 at (1, 2)");
    }
}
