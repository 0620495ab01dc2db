//! Error taxonomy for the relay.
//!
//! Only [`FrameError::Config`] is fatal, and only at startup.  Everything
//! else is recoverable per-message: the affected output is skipped with a
//! diagnostic and the next message is processed normally.

use aeroframe_geometry::GeometryError;
use thiserror::Error;

/// Errors spanning configuration, degenerate inputs, payload bounds and
/// bus delivery.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum FrameError {
    /// Malformed or missing frame name / calibration constant.  Fatal at
    /// startup: the process refuses to publish rather than emit edges with
    /// empty or default names.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A rotation that cannot be normalized (norm ~0) or that failed the
    /// unit-norm check at publication time.
    #[error("degenerate rotation: quaternion norm {norm}")]
    DegenerateRotation { norm: f64 },

    /// Incoming image does not match the fixed configured resolution.
    #[error("image geometry mismatch: expected {expected_pixels} px, got {width}x{height}")]
    ImageGeometry {
        expected_pixels: u64,
        width: u32,
        height: u32,
    },

    /// Payload buffer shorter than its declared size; detected before any
    /// out-of-bounds read.
    #[error("payload shorter than declared: need {expected} bytes, have {actual}")]
    ShortBuffer { expected: usize, actual: usize },

    /// Bounding-box center outside the configured image bounds.
    #[error("detection center ({x}, {y}) outside image bounds")]
    CenterOutOfBounds { x: f64, y: f64 },

    /// The publish call itself failed.  Logged, non-fatal; the handler
    /// completes and stays ready for the next message.
    #[error("bus delivery failed: {0}")]
    Channel(String),
}

impl From<GeometryError> for FrameError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::DegenerateNorm { norm } => Self::DegenerateRotation { norm },
        }
    }
}
