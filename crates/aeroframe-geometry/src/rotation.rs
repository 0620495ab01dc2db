//! Quaternion and vector primitives.
//!
//! The Euler convention throughout is fixed-axis XYZ (equivalently intrinsic
//! Z·Y·X): `from_euler(roll, pitch, yaw)` builds the rotation
//! `qz(yaw) * qy(pitch) * qx(roll)`.  This matches the convention the pose
//! estimator's calibration constants were derived against; see the config
//! defaults in `aeroframe-types`.
//!
//! Every quaternion returned by a constructor other than [`Quaternion::new`]
//! is unit-norm to within [`UNIT_EPS`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance for the unit-norm invariant: a quaternion is considered unit
/// when `|‖q‖ - 1| <= UNIT_EPS`.
pub const UNIT_EPS: f64 = 1e-6;

/// Norms below this are treated as degenerate (not normalizable).
const MIN_NORM: f64 = 1e-9;

/// Rotation-algebra failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A quaternion with ~0 norm cannot represent a rotation.
    #[error("degenerate quaternion: norm {norm} below {MIN_NORM}")]
    DegenerateNorm { norm: f64 },
}

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

/// A 3-D translation vector (linear units).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise negation, used to flip "body position in world" into
    /// "world origin as seen from body".
    pub fn negated(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Quaternion
// ─────────────────────────────────────────────────────────────────────────────

/// A rotation quaternion in x, y, z, w field order (the wire order used by
/// the pose-estimate and transform interfaces).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Raw constructor.  The caller is responsible for the unit-norm
    /// invariant; use [`Quaternion::normalized`] when the components come
    /// from an external source.
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Build a unit quaternion from fixed-axis XYZ roll/pitch/yaw (radians).
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();

        Self {
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
            w: cr * cp * cy + sr * sp * sy,
        }
    }

    /// Recover `(roll, pitch, yaw)` in the [`from_euler`][Self::from_euler]
    /// convention.  Diagnostic output only; never used for control decisions.
    pub fn to_euler(self) -> (f64, f64, f64) {
        let roll = (2.0 * (self.w * self.x + self.y * self.z))
            .atan2(1.0 - 2.0 * (self.x * self.x + self.y * self.y));
        // Clamp against fp drift at the gimbal poles.
        let pitch = (2.0 * (self.w * self.y - self.z * self.x)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (self.w * self.z + self.x * self.y))
            .atan2(1.0 - 2.0 * (self.y * self.y + self.z * self.z));
        (roll, pitch, yaw)
    }

    /// Euclidean norm over all four components.
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Whether the unit-norm invariant holds within `eps`.
    pub fn is_unit(self, eps: f64) -> bool {
        (self.norm() - 1.0).abs() <= eps
    }

    /// Rescale to unit norm.
    ///
    /// # Errors
    ///
    /// [`GeometryError::DegenerateNorm`] when the norm is ~0 and the
    /// quaternion cannot represent any rotation.
    pub fn normalized(self) -> Result<Self, GeometryError> {
        let n = self.norm();
        if n < MIN_NORM {
            return Err(GeometryError::DegenerateNorm { norm: n });
        }
        Ok(Self::new(self.x / n, self.y / n, self.z / n, self.w / n))
    }

    /// Conjugate: negate the vector part, keep the scalar part.  For a unit
    /// quaternion this is the inverse rotation, and it is the operation that
    /// flips a "world-frame orientation of body" estimate into the
    /// "body-frame orientation of world" direction the transform chain needs.
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Hamilton product `self * rhs`: apply `rhs` first, then `self`, in the
    /// parent frame.
    pub fn hamilton(self, rhs: Self) -> Self {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
