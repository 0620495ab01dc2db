//! Relay configuration: the frame-name table and calibration constants.
//!
//! Built once at startup, validated before the first static publication, and
//! passed by reference to every component.  Components never read frame
//! names from shared global state; a typo'd or empty frame name is caught
//! here instead of silently splitting the transform graph.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::FrameError;

// ─────────────────────────────────────────────────────────────────────────────
// Frame-name table
// ─────────────────────────────────────────────────────────────────────────────

/// The five frame names of the transform graph.  Fixed at startup; no frame
/// is ever added or removed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGraph {
    /// The depth sensor's optical frame.
    #[serde(default = "default_sensor_frame")]
    pub sensor: String,
    /// The vehicle body frame.
    #[serde(default = "default_body_frame")]
    pub body: String,
    /// Intermediate rotation-only frame between body and world.
    #[serde(default = "default_world_reference_frame")]
    pub world_reference: String,
    /// The world/map frame the estimator reports poses in.
    #[serde(default = "default_world_final_frame")]
    pub world_final: String,
    /// Standard north-east-down world frame.
    #[serde(default = "default_world_ned_frame")]
    pub world_ned: String,
}

fn default_sensor_frame() -> String {
    "cam_frame".to_string()
}
fn default_body_frame() -> String {
    "base_link".to_string()
}
fn default_world_reference_frame() -> String {
    "odom".to_string()
}
fn default_world_final_frame() -> String {
    "map".to_string()
}
fn default_world_ned_frame() -> String {
    "map_ned".to_string()
}

impl Default for FrameGraph {
    fn default() -> Self {
        Self {
            sensor: default_sensor_frame(),
            body: default_body_frame(),
            world_reference: default_world_reference_frame(),
            world_final: default_world_final_frame(),
            world_ned: default_world_ned_frame(),
        }
    }
}

impl FrameGraph {
    /// Reject empty or duplicated frame names.
    pub fn validate(&self) -> Result<(), FrameError> {
        let names = [
            ("sensor", &self.sensor),
            ("body", &self.body),
            ("world_reference", &self.world_reference),
            ("world_final", &self.world_final),
            ("world_ned", &self.world_ned),
        ];
        for (field, name) in &names {
            if name.trim().is_empty() {
                return Err(FrameError::Config(format!("frame name `{field}` is empty")));
            }
        }
        for i in 0..names.len() {
            for (field_j, name_j) in names.iter().skip(i + 1) {
                let (field_i, name_i) = &names[i];
                if name_i == name_j {
                    return Err(FrameError::Config(format!(
                        "frame names `{field_i}` and `{field_j}` both resolve to \"{name_i}\""
                    )));
                }
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Full relay configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Complete load-time configuration.  Nothing in here is runtime-mutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub frames: FrameGraph,

    /// Roll/pitch/yaw (radians) of the fixed `sensor -> body` mount edge.
    /// Default: the sensor's yaw axis is offset 180° from the body's.
    #[serde(default = "default_mount_rpy")]
    pub mount_rpy: [f64; 3],

    /// Roll/pitch/yaw (radians) of the fixed `world_final -> world_ned`
    /// convention edge.  Default converts an east-north-up map frame to
    /// north-east-down.
    #[serde(default = "default_world_ned_rpy")]
    pub world_ned_rpy: [f64; 3],

    /// Fixed image width in pixels for the channel expander and the
    /// detection-to-heading converter.  Must match the detector's input
    /// resolution.
    #[serde(default = "default_image_width")]
    pub image_width: u32,

    /// Fixed image height in pixels.
    #[serde(default = "default_image_height")]
    pub image_height: u32,
}

fn default_mount_rpy() -> [f64; 3] {
    [0.0, 0.0, PI]
}
fn default_world_ned_rpy() -> [f64; 3] {
    [PI, 0.0, FRAC_PI_2]
}
fn default_image_width() -> u32 {
    640
}
fn default_image_height() -> u32 {
    480
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            frames: FrameGraph::default(),
            mount_rpy: default_mount_rpy(),
            world_ned_rpy: default_world_ned_rpy(),
            image_width: default_image_width(),
            image_height: default_image_height(),
        }
    }
}

impl RelayConfig {
    /// Validate every constant the relay will bake into its edges.  Called
    /// once at startup; failure refuses the whole process.
    pub fn validate(&self) -> Result<(), FrameError> {
        self.frames.validate()?;

        for angle in self.mount_rpy.iter().chain(self.world_ned_rpy.iter()) {
            if !angle.is_finite() {
                return Err(FrameError::Config(format!(
                    "static rotation angle {angle} is not finite"
                )));
            }
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(FrameError::Config(format!(
                "image resolution {}x{} is degenerate",
                self.image_width, self.image_height
            )));
        }
        Ok(())
    }

    /// Declared pixel count of the fixed camera resolution.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.image_width) * u64::from(self.image_height)
    }
}
