// src/utils/geometry.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, delta: Vector2D) -> Point2D {
        Point2D::new(self.x + delta.x, self.y + delta.y)
    }

    /// Vector pointing from `self` to `other`.
    pub fn to(&self, other: &Point2D) -> Vector2D {
        Vector2D::new(other.x - self.x, other.y - self.y)
    }

    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Vector2D {
        let length = self.length();
        if length == 0.0 {
            return *self;
        }
        Vector2D::new(self.x / length, self.y / length)
    }

    /// Counter-clockwise perpendicular.
    pub fn perp(&self) -> Vector2D {
        Vector2D::new(-self.y, self.x)
    }

    pub fn scale(&self, factor: f32) -> Vector2D {
        Vector2D::new(self.x * factor, self.y * factor)
    }
}

/// Axis-aligned placement rectangle of a room node, in canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point2D,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(min: Point2D, width: f32, height: f32) -> Self {
        Self { min, width, height }
    }

    pub fn max(&self) -> Point2D {
        Point2D::new(self.min.x + self.width, self.min.y + self.height)
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.min.x + self.width / 2.0, self.min.y + self.height / 2.0)
    }

    /// Half-open containment test: the min edges are inside, the max edges are not.
    pub fn contains(&self, point: Point2D) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }

    pub fn translate(&mut self, delta: Vector2D) {
        self.min = self.min.offset(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(Point2D::new(10.0, 10.0), 160.0, 75.0);
        assert!(rect.contains(Point2D::new(10.0, 10.0)));
        assert!(rect.contains(Point2D::new(100.0, 50.0)));
        assert!(!rect.contains(Point2D::new(170.0, 50.0)));
        assert!(!rect.contains(Point2D::new(9.9, 50.0)));
    }

    #[test]
    fn test_rect_center_and_translate() {
        let mut rect = Rect::new(Point2D::new(0.0, 0.0), 160.0, 75.0);
        assert_approx_eq!(rect.center().x, 80.0);
        assert_approx_eq!(rect.center().y, 37.5);
        rect.translate(Vector2D::new(5.5, -2.0));
        assert_approx_eq!(rect.min.x, 5.5);
        assert_approx_eq!(rect.min.y, -2.0);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let v = Vector2D::new(0.0, 0.0).normalize();
        assert_eq!(v, Vector2D::new(0.0, 0.0));
        let n = Vector2D::new(3.0, 4.0).normalize();
        assert_approx_eq!(n.length(), 1.0);
    }
}
