//! `aeroframe-nodes` – the relay components.
//!
//! Each node is an independent handler bound to one input lane of the
//! [`EventBus`][aeroframe_middleware::EventBus].  They share only the
//! read-only configuration; the static edges are published once at startup
//! before any dynamic handler runs.
//!
//! # Modules
//!
//! - [`static_frames`] – [`StaticFramePublisher`]: the two fixed mounting /
//!   convention edges, published once with stamp zero.
//! - [`pose_relay`] – [`PoseRelay`]: turns each pose estimate into the
//!   chained rotation-only and translation-only dynamic edges.
//! - [`cloud_relay`] – [`CloudRelay`]: point-cloud re-stamper.
//! - [`image_relay`] – [`ImageRelay`]: mono-to-3-channel image expander.
//! - [`detection_relay`] – [`DetectionRelay`]: bounding-box to heading
//!   converter.

pub mod cloud_relay;
pub mod detection_relay;
pub mod image_relay;
pub mod pose_relay;
pub mod static_frames;

pub use cloud_relay::CloudRelay;
pub use detection_relay::DetectionRelay;
pub use image_relay::ImageRelay;
pub use pose_relay::PoseRelay;
pub use static_frames::StaticFramePublisher;
