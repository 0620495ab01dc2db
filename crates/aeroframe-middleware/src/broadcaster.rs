//! Transform-broadcast sink.
//!
//! The only way a transform edge leaves the process.  Both entry points
//! enforce the unit-norm invariant: a non-unit rotation is a correctness bug
//! upstream, never a tolerated state, so it is refused here rather than
//! forwarded.

use aeroframe_geometry::UNIT_EPS;
use aeroframe_types::{
    msg::{SensorEvent, TransformStamped},
    FrameError,
};
use tracing::warn;

use crate::bus::{EventBus, Topic};

/// Publishes transform edges onto the bus lanes external TF consumers attach
/// to.
#[derive(Clone, Debug)]
pub struct TfBroadcaster {
    bus: EventBus,
}

impl TfBroadcaster {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    /// Publish a static edge.  Called exactly once per edge, at startup.
    pub fn send_static_transform(&self, tf: TransformStamped) -> Result<usize, FrameError> {
        self.send(Topic::StaticTransforms, tf)
    }

    /// Publish a dynamic edge, once per incoming pose message.
    pub fn send_transform(&self, tf: TransformStamped) -> Result<usize, FrameError> {
        self.send(Topic::Transforms, tf)
    }

    fn send(&self, topic: Topic, tf: TransformStamped) -> Result<usize, FrameError> {
        if !tf.rotation.is_unit(UNIT_EPS) {
            let norm = tf.rotation.norm();
            warn!(
                parent = %tf.header.frame_id,
                child = %tf.child_frame_id,
                norm,
                "refusing non-unit rotation"
            );
            return Err(FrameError::DegenerateRotation { norm });
        }
        self.bus.publish_to(topic, SensorEvent::Transform(tf))
    }
}
