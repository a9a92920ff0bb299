use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Represents a bounding box in screen/pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Creates new bounds from two points
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates bounds from two arbitrary corners, ordering them
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(
            Point::new(a.x.min(b.x), a.y.min(b.y)),
            Point::new(a.x.max(b.x), a.y.max(b.y)),
        )
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Creates bounds from a top-left origin and a size
    pub fn from_origin_and_size(origin: Point, size: Point) -> Self {
        Self::new(origin, origin.add(&size))
    }

    /// Gets the width of the bounds
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Gets the height of the bounds
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Gets the size as a Point
    pub fn size(&self) -> Point {
        Point::new(self.width(), self.height())
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Checks if the bounds intersect with another bounds
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y)
    }

    /// Translates the bounds by an offset
    pub fn translate(&self, offset: &Point) -> Bounds {
        Bounds::new(self.min.add(offset), self.max.add(offset))
    }

    /// Checks if the bounds are valid (min <= max)
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_creation() {
        let bounds = Bounds::from_coords(10.0, 20.0, 30.0, 40.0);
        assert_eq!(bounds.width(), 20.0);
        assert_eq!(bounds.height(), 20.0);
        assert_eq!(bounds.center(), Point::new(20.0, 30.0));
    }

    #[test]
    fn test_bounds_from_corners() {
        let bounds = Bounds::from_corners(Point::new(30.0, 5.0), Point::new(10.0, 25.0));
        assert_eq!(bounds.min, Point::new(10.0, 5.0));
        assert_eq!(bounds.max, Point::new(30.0, 25.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::from_origin_and_size(Point::new(10.0, 10.0), Point::new(34.0, 34.0));
        assert!(bounds.contains(&Point::new(15.0, 25.0)));
        assert!(bounds.contains(&Point::new(44.0, 44.0)));
        assert!(!bounds.contains(&Point::new(5.0, 25.0)));
    }

    #[test]
    fn test_bounds_translate() {
        let bounds = Bounds::from_coords(0.0, 0.0, 10.0, 10.0).translate(&Point::new(5.0, -5.0));
        assert_eq!(bounds, Bounds::from_coords(5.0, -5.0, 15.0, 5.0));
        assert!(bounds.intersects(&Bounds::from_coords(14.0, 4.0, 20.0, 20.0)));
    }
}
