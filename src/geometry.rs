//! Plane and space geometry: 2D vectors, 3D vectors and planes.
//!
//! # Examples
//!
//! ```
//! use la_calc::geometry::{Plane3D, PlaneEquation, Vector3D};
//!
//! let plane = Plane3D::from_points(
//!     Vector3D::new(0.0, -1.0, 1.0),
//!     Vector3D::new(2.0, 0.0, 2.0),
//!     Vector3D::new(1.0, 2.0, -1.0),
//! );
//! let eq = plane.to_standard_form();
//! assert_eq!(eq, PlaneEquation { a: -5.0, b: 5.0, c: 5.0, d: 0.0 });
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

// ============================================================================
// 2D
// ============================================================================

/// A vector in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Builds a vector from an angle in radians and a magnitude.
    pub fn from_polar(angle: f64, magnitude: f64) -> Self {
        Self {
            x: magnitude * angle.cos(),
            y: magnitude * angle.sin(),
        }
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Direction in radians, in `[-π, π]`.
    pub fn direction_rad(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Direction in radians, in `[0, 2π)`.
    pub fn direction_rad_0_to_2pi(&self) -> f64 {
        wrap(self.direction_rad(), 2.0 * PI)
    }

    /// Direction in degrees, in `[-180, 180]`.
    pub fn direction_deg(&self) -> f64 {
        self.direction_rad().to_degrees()
    }

    /// Direction in degrees, in `[0, 360)`.
    pub fn direction_deg_0_to_360(&self) -> f64 {
        wrap(self.direction_deg(), 360.0)
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, c: f64) -> Self {
        Self::new(self.x * c, self.y * c)
    }
}

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

/// A vector anchored at `start` and ending at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectedVector2D {
    pub start: Point2D,
    pub end: Point2D,
}

impl DirectedVector2D {
    /// Free vector from `start` to `end`.
    pub fn direction(&self) -> Vector2D {
        Vector2D::new(self.end.x - self.start.x, self.end.y - self.start.y)
    }

    /// Distance between the end points.
    pub fn length(&self) -> f64 {
        self.direction().length()
    }
}

// ============================================================================
// 3D
// ============================================================================

/// A vector in space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Cross product `self × v`.
    pub fn cross(&self, v: &Self) -> Self {
        Self::new(
            self.y * v.z - self.z * v.y,
            self.z * v.x - self.x * v.z,
            self.x * v.y - self.y * v.x,
        )
    }

    pub fn dot(&self, v: &Self) -> f64 {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Plane in standard form `a·x + b·y + c·z = d`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneEquation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl PlaneEquation {
    /// Normal vector `(a, b, c)`.
    pub fn normal(&self) -> Vector3D {
        Vector3D::new(self.a, self.b, self.c)
    }

    /// Coefficient-wise comparison within an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.a - other.a).abs() < eps
            && (self.b - other.b).abs() < eps
            && (self.c - other.c).abs() < eps
            && (self.d - other.d).abs() < eps
    }
}

impl fmt::Display for PlaneEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x + {}y + {}z = {}", self.a, self.b, self.c, self.d)
    }
}

/// Plane through `point` spanned by `u` and `v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane3D {
    pub point: Vector3D,
    pub u: Vector3D,
    pub v: Vector3D,
}

impl Plane3D {
    pub fn new(point: Vector3D, u: Vector3D, v: Vector3D) -> Self {
        Self { point, u, v }
    }

    /// Plane through three points.
    pub fn from_points(p: Vector3D, q: Vector3D, r: Vector3D) -> Self {
        Self::new(p, q - p, r - p)
    }

    /// Standard form with normal `u × v`. No normalization is applied.
    pub fn to_standard_form(&self) -> PlaneEquation {
        let n = self.u.cross(&self.v);
        PlaneEquation {
            a: n.x,
            b: n.y,
            c: n.z,
            d: n.dot(&self.point),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

/// `angle` shifted into `[0, full)`. A tiny negative angle rounds up to
/// `full` when shifted and is folded back to zero.
fn wrap(angle: f64, full: f64) -> f64 {
    let wrapped = angle.rem_euclid(full);
    if wrapped >= full {
        0.0
    } else {
        wrapped
    }
}
