//! Message types carried on the event bus.
//!
//! Timestamps are always the originating sensor's stamp, copied forward
//! unmodified by every relay.  Nothing in this crate reads a wall clock.

use aeroframe_geometry::{Quaternion, Vec3};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Header
// ─────────────────────────────────────────────────────────────────────────────

/// An integer second/nanosecond timestamp.  Negative seconds are legal and
/// pass through the relays untouched; no clock correction happens anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stamp {
    pub sec: i32,
    pub nsec: u32,
}

impl Stamp {
    /// The fixed stamp carried by static transform edges.
    pub const ZERO: Self = Self { sec: 0, nsec: 0 };

    pub fn new(sec: i32, nsec: u32) -> Self {
        Self { sec, nsec }
    }
}

/// Standard message header: stamp plus the frame the payload is expressed in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Header {
    pub stamp: Stamp,
    pub frame_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Transform edge
// ─────────────────────────────────────────────────────────────────────────────

/// A directed, timestamped rigid transform from `header.frame_id` (parent)
/// to `child_frame_id`.  The rotation must be unit-norm before publication;
/// the transform broadcaster in `aeroframe-middleware` enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStamped {
    pub header: Header,
    pub child_frame_id: String,
    pub translation: Vec3,
    pub rotation: Quaternion,
}

impl TransformStamped {
    /// Build an edge `parent -> child` at `stamp`.
    pub fn new(
        parent: impl Into<String>,
        child: impl Into<String>,
        stamp: Stamp,
        translation: Vec3,
        rotation: Quaternion,
    ) -> Self {
        Self {
            header: Header {
                stamp,
                frame_id: parent.into(),
            },
            child_frame_id: child.into(),
            translation,
            rotation,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pose estimate
// ─────────────────────────────────────────────────────────────────────────────

/// One record from the external pose estimator: where the vehicle body is in
/// the estimator's world frame, and which way it points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseEstimate {
    pub stamp: Stamp,
    pub position: Vec3,
    pub orientation: Quaternion,
}

/// An orientation-plus-position record derived for downstream consumers
/// (output of the detection-to-heading channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseStamped {
    pub header: Header,
    pub position: Vec3,
    pub orientation: Quaternion,
}

// ─────────────────────────────────────────────────────────────────────────────
// Point cloud
// ─────────────────────────────────────────────────────────────────────────────

/// Layout of one field inside a point record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointField {
    pub name: String,
    pub offset: u32,
    pub datatype: u8,
    pub count: u32,
}

/// An opaque structured point-cloud payload.  The relay never interprets
/// `data`; it only rewrites the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud2 {
    pub header: Header,
    pub height: u32,
    pub width: u32,
    pub fields: Vec<PointField>,
    pub is_bigendian: bool,
    pub point_step: u32,
    pub row_step: u32,
    pub data: Vec<u8>,
    pub is_dense: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Image
// ─────────────────────────────────────────────────────────────────────────────

/// A raw image frame, one or three bytes per pixel depending on `encoding`
/// (`"mono8"` in, `"rgb8"` out of the channel expander).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub header: Header,
    pub height: u32,
    pub width: u32,
    pub encoding: String,
    pub is_bigendian: bool,
    /// Row stride in bytes.
    pub step: u32,
    pub data: Vec<u8>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Detections
// ─────────────────────────────────────────────────────────────────────────────

/// A 2-D bounding box in image-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection2D {
    pub center_x: f64,
    pub center_y: f64,
    pub size_x: f64,
    pub size_y: f64,
}

/// One frame's worth of detections, in the detector's own ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionArray {
    pub header: Header,
    pub detections: Vec<Detection2D>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Bus payload
// ─────────────────────────────────────────────────────────────────────────────

/// Unified payload routed over the event bus; each topic lane carries exactly
/// one variant in practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SensorEvent {
    Pose(PoseEstimate),
    Cloud(PointCloud2),
    Image(ImageFrame),
    Detections(DetectionArray),
    Transform(TransformStamped),
    Heading(PoseStamped),
}
