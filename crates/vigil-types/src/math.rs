//! Minimal 3-D vector math for the geometry evaluator.
//!
//! The perception engine only needs a handful of vector operations
//! (difference, dot product, length, normalization), so this module defines
//! them directly instead of pulling in a linear-algebra crate. All values
//! are world-space `f64` coordinates.
//!
//! Normalization is fallible by design: a zero-length or non-finite vector
//! has no direction, and callers must decide what that means for them
//! rather than receive a NaN-filled result.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Length below which a vector is considered to have no usable direction.
pub const DIRECTION_EPSILON: f64 = 1e-9;

/// A world-space 3-D vector (or point).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// East-west axis.
    pub x: f64,
    /// Vertical axis.
    pub y: f64,
    /// North-south axis.
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Return this vector scaled by `factor`.
    pub const fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    /// Dot product with another vector.
    pub const fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared length. Cheaper than [`Vec3::length`]; prefer it for
    /// comparisons.
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Squared distance to another point.
    pub const fn distance_squared(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Unit vector in the same direction, or `None` when the vector is too
    /// short (or not finite) to carry a direction.
    pub fn normalized(self) -> Option<Self> {
        if !self.is_finite() {
            return None;
        }
        let len = self.length();
        if len < DIRECTION_EPSILON {
            return None;
        }
        Some(self.scaled(1.0 / len))
    }

    /// Whether all components are finite (no NaN, no infinities).
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dot_of_orthogonal_vectors_is_zero() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        assert!(a.dot(b).abs() < f64::EPSILON);
    }

    #[test]
    fn length_of_unit_axes() {
        assert!((Vec3::new(0.0, 0.0, 1.0).length() - 1.0).abs() < 1e-12);
        assert!((Vec3::new(3.0, 4.0, 0.0).length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn normalized_zero_vector_is_none() {
        assert!(Vec3::ZERO.normalized().is_none());
    }

    #[test]
    fn normalized_nan_vector_is_none() {
        assert!(Vec3::new(f64::NAN, 0.0, 0.0).normalized().is_none());
    }

    #[test]
    fn normalized_vector_has_unit_length() {
        let v = Vec3::new(2.0, -3.0, 6.0).normalized().unwrap();
        assert!((v.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn distance_squared_matches_subtraction() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 6.0, 3.0);
        assert!((a.distance_squared(b) - 25.0).abs() < 1e-12);
    }
}
