//! Pseudo-spherical projection: planar x, y become longitude and latitude,
//! z becomes the radius.

use crate::layout::Point3;

/// Axis-aligned bounds of a set of points, per axis `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
    pub z: (f64, f64),
}

impl SphereBounds {
    /// Computes the bounds of `points`, `None` if there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = SphereBounds {
            x: (first.x, first.x),
            y: (first.y, first.y),
            z: (first.z, first.z),
        };
        for p in iter {
            extend(&mut bounds.x, p.x);
            extend(&mut bounds.y, p.y);
            extend(&mut bounds.z, p.z);
        }
        Some(bounds)
    }

    /// Projects a point onto the pseudo-sphere.
    ///
    /// x is mapped onto `longitude_limits`, y onto `latitude_limits` (radians),
    /// z onto its own bounds as radius.
    pub fn project(
        &self,
        p: Point3,
        longitude_limits: (f64, f64),
        latitude_limits: (f64, f64),
    ) -> Point3 {
        let longitude = rescale(p.x, self.x, longitude_limits);
        let latitude = rescale(p.y, self.y, latitude_limits);
        let radius = rescale(p.z, self.z, self.z);
        lat_long_to_xyz(latitude, longitude, radius)
    }
}

fn extend(range: &mut (f64, f64), value: f64) {
    range.0 = range.0.min(value);
    range.1 = range.1.max(value);
}

/// Linearly maps `value` from `current` onto `target`.
///
/// A degenerate `current` range maps everything to the centre of `target`.
pub fn rescale(value: f64, current: (f64, f64), target: (f64, f64)) -> f64 {
    let span = current.1 - current.0;
    if span == 0.0 {
        return (target.0 + target.1) / 2.0;
    }
    target.0 + (value - current.0) / span * (target.1 - target.0)
}

/// Converts latitude and longitude (radians) at radius `r` to Cartesian.
pub fn lat_long_to_xyz(latitude: f64, longitude: f64, r: f64) -> Point3 {
    Point3::new(
        r * latitude.cos() * longitude.cos(),
        r * latitude.cos() * longitude.sin(),
        r * latitude.sin(),
    )
}
