//! `aeroframe-types` – shared messages, configuration and errors.
//!
//! The leaf crate every other `aeroframe` crate depends on.
//!
//! # Modules
//!
//! - [`msg`] – sensor and transform message types ([`msg::PoseEstimate`],
//!   [`msg::PointCloud2`], [`msg::ImageFrame`], [`msg::DetectionArray`],
//!   [`msg::TransformStamped`]) plus the [`msg::SensorEvent`] bus payload.
//! - [`config`] – the [`config::FrameGraph`] frame-name table and the
//!   [`config::RelayConfig`] calibration constants, built once at startup and
//!   passed by reference to every component.
//! - [`error`] – the [`error::FrameError`] taxonomy.

pub mod config;
pub mod error;
pub mod msg;

pub use config::{FrameGraph, RelayConfig};
pub use error::FrameError;
