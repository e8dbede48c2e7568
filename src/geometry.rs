//! Planar and elevated geometry primitives shared by the noise engine.
//!
//! Points live in noise space; `z` carries elevation. All distance queries
//! work on the planar (x, y) projection.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

// =============================================================================
// POINTS
// =============================================================================

/// A point in the plane
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Lift into 3D with the given elevation
    pub fn with_z(self, z: f64) -> Point3D {
        Point3D::new(self.x, self.y, z)
    }
}

/// A point in the plane plus an elevation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Drop the elevation
    pub fn projection_z(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Linear interpolation towards `other`
    pub fn lerp(&self, other: Point3D, t: f64) -> Point3D {
        *self + (other - *self) * t
    }
}

impl Add for Point3D {
    type Output = Point3D;

    fn add(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Point3D;

    fn sub(self, rhs: Point3D) -> Point3D {
        Point3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3D {
    type Output = Point3D;

    fn mul(self, rhs: f64) -> Point3D {
        Point3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Point3D> for f64 {
    type Output = Point3D;

    fn mul(self, rhs: Point3D) -> Point3D {
        rhs * self
    }
}

// =============================================================================
// SEGMENTS
// =============================================================================

/// Directed segment from `a` to `b`. `a == b` marks a local minimum.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Segment3D {
    pub a: Point3D,
    pub b: Point3D,
}

impl Segment3D {
    pub const fn new(a: Point3D, b: Point3D) -> Self {
        Self { a, b }
    }

    pub fn is_zero_length(&self) -> bool {
        self.a == self.b
    }

    /// Planar length
    pub fn length(&self) -> f64 {
        self.a.projection_z().distance(self.b.projection_z())
    }

    /// Point at parameter `t` (0 = a, 1 = b), elevation included
    pub fn lerp(&self, t: f64) -> Point3D {
        self.a.lerp(self.b, t)
    }

    /// Unclamped projection parameter of `p` on the segment's supporting line.
    ///
    /// A zero-length segment projects everything onto its start (0).
    pub fn projection(&self, p: Point2D) -> f64 {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            return 0.0;
        }
        ((p.x - self.a.x) * dx + (p.y - self.a.y) * dy) / len2
    }

    /// Planar distance from `p` to the closest point of the segment
    pub fn distance(&self, p: Point2D) -> f64 {
        let t = self.projection(p).clamp(0.0, 1.0);
        let closest = self.lerp(t).projection_z();
        p.distance(closest)
    }

    /// Elevation interpolated at the projection of `p`, clamped to the segment
    pub fn elevation_at(&self, p: Point2D) -> f64 {
        lerp_clamp(self.a.z, self.b.z, self.projection(p))
    }
}

/// Segment closest to `p` and its distance.
///
/// Ties keep the earliest segment in iteration order.
pub fn nearest_segment<'a, I>(p: Point2D, segments: I) -> Option<(Segment3D, f64)>
where
    I: IntoIterator<Item = &'a Segment3D>,
{
    let mut best: Option<(Segment3D, f64)> = None;
    for segment in segments {
        let dist = segment.distance(p);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((*segment, dist)),
        }
    }
    best
}

// =============================================================================
// SCALAR HELPERS
// =============================================================================

/// Linear interpolation with `t` clamped to [0, 1]
pub fn lerp_clamp(a: f64, b: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Map `value` from [a, b] to [c, d]
pub fn remap(value: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    c + (value - a) * (d - c) / (b - a)
}

/// Map `value` from [a, b] to [c, d], clamping the result into the target range
pub fn remap_clamp(value: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    let (lo, hi) = if c <= d { (c, d) } else { (d, c) };
    remap(value, a, b, c, d).clamp(lo, hi)
}

/// Uniform Catmull-Rom spline through p1..p2 evaluated at t = 0.5
pub fn catmull_rom_midpoint(p0: Point3D, p1: Point3D, p2: Point3D, p3: Point3D) -> Point3D {
    (9.0 * (p1 + p2) - (p0 + p3)) * (1.0 / 16.0)
}
