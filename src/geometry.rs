//! Plain 2-D value types shared by layout, routing and rendering.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Point) -> f64 {
        other.sub(self).length()
    }

    /// Unit vector in the same direction, or `fallback` for a zero vector.
    pub fn normalize_or(self, fallback: Point) -> Self {
        let len = self.length();
        if len < 1e-9 {
            fallback
        } else {
            Self::new(self.x / len, self.y / len)
        }
    }

    /// Counter-clockwise perpendicular.
    pub fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// True when the interiors intersect; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.origin.x < other.right()
            && other.origin.x < self.right()
            && self.origin.y < other.bottom()
            && other.origin.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_vector_uses_fallback() {
        let v = Point::new(0.0, 0.0).normalize_or(Point::new(1.0, 0.0));
        assert_eq!(v, Point::new(1.0, 0.0));
    }

    #[test]
    fn test_normalize_length() {
        let v = Point::new(3.0, 4.0).normalize_or(Point::default());
        assert!((v.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rect_touching_edges_do_not_overlap() {
        let a = Rect::new(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Rect::new(Point::new(10.0, 0.0), Size::new(10.0, 10.0));
        let c = Rect::new(Point::new(5.0, 5.0), Size::new(10.0, 10.0));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }
}
