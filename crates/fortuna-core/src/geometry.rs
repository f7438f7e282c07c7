//! Geometric primitives for wheel layout.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center`, `degrees` clockwise from 12 o'clock.
    #[must_use]
    pub fn on_circle(center: Self, radius: f64, degrees: f64) -> Self {
        let rad = (degrees - 90.0).to_radians();
        Self::new(
            radius.mul_add(rad.cos(), center.x),
            radius.mul_add(rad.sin(), center.y),
        )
    }

    /// Calculate distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let n = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if n >= 360.0 {
        0.0
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_on_circle_cardinal_points() {
        let c = Point::new(350.0, 350.0);
        let top = Point::on_circle(c, 100.0, 0.0);
        assert!((top.x - 350.0).abs() < 1e-9);
        assert!((top.y - 250.0).abs() < 1e-9);

        let right = Point::on_circle(c, 100.0, 90.0);
        assert!((right.x - 450.0).abs() < 1e-9);
        assert!((right.y - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_ops() {
        let p = Point::new(1.0, 2.0) + Point::new(3.0, 4.0);
        assert_eq!(p, Point::new(4.0, 6.0));
        assert_eq!(p - Point::new(4.0, 6.0), Point::ORIGIN);
        assert!((Point::ORIGIN.distance(&Point::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
    }

    proptest! {
        #[test]
        fn prop_normalize_in_range(deg in -1.0e6f64..1.0e6) {
            let n = normalize_degrees(deg);
            prop_assert!((0.0..360.0).contains(&n));
        }

        #[test]
        fn prop_on_circle_keeps_radius(r in 0.0f64..1000.0, deg in 0.0f64..360.0) {
            let c = Point::new(10.0, -5.0);
            let p = Point::on_circle(c, r, deg);
            prop_assert!((p.distance(&c) - r).abs() < 1e-6);
        }
    }
}
