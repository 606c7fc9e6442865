//! 3D point type used for vertex positions and segment endpoints.

use serde::Serialize;

/// A position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns `self * (1 - t) + other * t`.
    pub fn lerp(self, other: Point3, t: f64) -> Point3 {
        Point3 {
            x: self.x * (1.0 - t) + other.x * t,
            y: self.y * (1.0 - t) + other.y * t,
            z: self.z * (1.0 - t) + other.z * t,
        }
    }

    /// Unweighted average of the given points, `None` if there are none.
    pub fn centroid<I: IntoIterator<Item = Point3>>(points: I) -> Option<Point3> {
        let mut sum = Point3::default();
        let mut count = 0usize;
        for p in points {
            sum.x += p.x;
            sum.y += p.y;
            sum.z += p.z;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Point3::new(sum.x / n, sum.y / n, sum.z / n))
    }

    /// Euclidean distance to the origin.
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}
