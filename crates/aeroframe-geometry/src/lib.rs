//! `aeroframe-geometry` – rigid-body rotation algebra.
//!
//! Pure quaternion and vector math for the transform relay: construction
//! from roll/pitch/yaw, Hamilton composition, conjugation (the body↔world
//! sign flip), normalization and unit-norm checks.  No state, no I/O.
//!
//! # Modules
//!
//! - [`rotation`] – [`Vec3`][rotation::Vec3] and
//!   [`Quaternion`][rotation::Quaternion] with the Euler conventions used by
//!   the rest of the stack.

pub mod rotation;

pub use rotation::{GeometryError, Quaternion, Vec3, UNIT_EPS};
