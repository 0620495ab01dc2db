//! Dynamic frame publisher.
//!
//! Turns each pose estimate into the two chained dynamic edges of the graph:
//!
//! * `body -> world_reference` – rotation only.  The estimate reports the
//!   body's orientation *in* the world, but the edge points the other way,
//!   so the quaternion is conjugated (vector part negated) and re-normalized
//!   before publication.
//! * `world_reference -> world_final` – translation only.  Same direction
//!   flip: the edge carries the world origin as seen from the body, i.e. the
//!   negated estimate position, under an identity rotation.
//!
//! Splitting rotation and translation across two edges keeps the two sign
//! fixes independent and lets a diagnostic consumer watch orientation drift
//! in isolation.  Stamps are copied from the estimate as-is; negative or
//! stale stamps are not corrected here.

use aeroframe_geometry::{Quaternion, Vec3};
use aeroframe_middleware::{EventBus, RelayNode, TfBroadcaster, Topic};
use aeroframe_types::{
    msg::{PoseEstimate, SensorEvent, TransformStamped},
    FrameError, RelayConfig,
};
use async_trait::async_trait;
use tokio::sync::{broadcast::error::RecvError, watch};
use tracing::{debug, info, warn};

/// Consumes the pose-estimate lane and broadcasts the two dynamic edges.
#[derive(Debug, Clone)]
pub struct PoseRelay {
    body: String,
    world_reference: String,
    world_final: String,
}

impl PoseRelay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            body: config.frames.body.clone(),
            world_reference: config.frames.world_reference.clone(),
            world_final: config.frames.world_final.clone(),
        }
    }

    /// Derive the rotation-only and translation-only edges, in publication
    /// order.
    ///
    /// # Errors
    ///
    /// [`FrameError::DegenerateRotation`] when the estimate's orientation has
    /// ~0 norm; the caller skips the update and continues.
    pub fn relay(&self, pose: &PoseEstimate) -> Result<[TransformStamped; 2], FrameError> {
        let rotation = pose.orientation.conjugate().normalized()?;

        let rotation_edge = TransformStamped::new(
            &self.body,
            &self.world_reference,
            pose.stamp,
            Vec3::ZERO,
            rotation,
        );
        let translation_edge = TransformStamped::new(
            &self.world_reference,
            &self.world_final,
            pose.stamp,
            pose.position.negated(),
            Quaternion::IDENTITY,
        );
        Ok([rotation_edge, translation_edge])
    }

    fn handle(&self, broadcaster: &TfBroadcaster, pose: &PoseEstimate) {
        let edges = match self.relay(pose) {
            Ok(edges) => edges,
            Err(err) => {
                warn!(%err, sec = pose.stamp.sec, "skipping pose update");
                return;
            }
        };
        // Diagnostic only; never feeds a control decision.
        let (roll, pitch, yaw) = edges[0].rotation.to_euler();
        debug!(
            sec = pose.stamp.sec,
            nsec = pose.stamp.nsec,
            roll, pitch, yaw,
            "pose relayed"
        );

        // Rotation edge first, then translation edge.
        for edge in edges {
            if let Err(err) = broadcaster.send_transform(edge) {
                warn!(%err, "dynamic edge not delivered");
            }
        }
    }
}

#[async_trait]
impl RelayNode for PoseRelay {
    fn name(&self) -> &'static str {
        "pose_relay"
    }

    async fn run(self: Box<Self>, bus: EventBus, mut shutdown: watch::Receiver<bool>) {
        let mut rx = bus.subscribe_to(Topic::PoseEstimates);
        let broadcaster = TfBroadcaster::new(bus);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                incoming = rx.recv() => match incoming {
                    Ok(SensorEvent::Pose(pose)) => self.handle(&broadcaster, &pose),
                    Ok(other) => warn!(node = self.name(), ?other, "unexpected event on pose lane"),
                    Err(RecvError::Lagged(n)) => {
                        warn!(node = self.name(), dropped = n, "subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        info!(node = self.name(), "stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeroframe_geometry::UNIT_EPS;
    use aeroframe_types::msg::Stamp;

    fn estimate(orientation: Quaternion) -> PoseEstimate {
        PoseEstimate {
            stamp: Stamp::new(42, 7),
            position: Vec3::new(1.0, -2.5, 3.0),
            orientation,
        }
    }

    #[test]
    fn rotation_edge_is_conjugated_and_translation_free() {
        let relay = PoseRelay::new(&RelayConfig::default());
        let q = Quaternion::from_euler(0.1, -0.2, 0.9);
        let [rot, _] = relay.relay(&estimate(q)).unwrap();

        assert_eq!(rot.header.frame_id, "base_link");
        assert_eq!(rot.child_frame_id, "odom");
        assert_eq!(rot.translation, Vec3::ZERO);
        assert!(rot.rotation.is_unit(UNIT_EPS));

        // Composing the published rotation with the original must cancel.
        let prod = rot.rotation.hamilton(q);
        assert!((prod.w - 1.0).abs() < 1e-9);
        assert!(prod.x.abs() < 1e-9 && prod.y.abs() < 1e-9 && prod.z.abs() < 1e-9);
    }

    #[test]
    fn translation_edge_negates_position_under_identity_rotation() {
        let relay = PoseRelay::new(&RelayConfig::default());
        let pose = estimate(Quaternion::IDENTITY);
        let [_, trans] = relay.relay(&pose).unwrap();

        assert_eq!(trans.header.frame_id, "odom");
        assert_eq!(trans.child_frame_id, "map");
        assert_eq!(trans.translation, pose.position.negated());
        assert_eq!(trans.rotation, Quaternion::IDENTITY);
    }

    #[test]
    fn both_edges_copy_the_estimate_stamp() {
        let relay = PoseRelay::new(&RelayConfig::default());
        let mut pose = estimate(Quaternion::IDENTITY);
        pose.stamp = Stamp::new(-5, 123);

        let edges = relay.relay(&pose).unwrap();
        for edge in &edges {
            assert_eq!(edge.header.stamp, pose.stamp);
        }
    }

    #[test]
    fn non_unit_orientation_is_renormalized() {
        let relay = PoseRelay::new(&RelayConfig::default());
        let [rot, _] = relay
            .relay(&estimate(Quaternion::new(0.0, 0.0, 1.0, 1.0)))
            .unwrap();
        assert!(rot.rotation.is_unit(UNIT_EPS));
    }

    #[test]
    fn zero_norm_orientation_is_skipped() {
        let relay = PoseRelay::new(&RelayConfig::default());
        let result = relay.relay(&estimate(Quaternion::new(0.0, 0.0, 0.0, 0.0)));
        assert!(matches!(
            result,
            Err(FrameError::DegenerateRotation { .. })
        ));
    }

    /// End to end through the bus: one pose in, two edges out, rotation
    /// edge first.
    #[tokio::test]
    async fn run_publishes_rotation_then_translation() {
        let bus = EventBus::default();
        let mut tf_rx = bus.subscribe_to(Topic::Transforms);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let node = Box::new(PoseRelay::new(&RelayConfig::default()));
        let task = tokio::spawn(node.run(bus.clone(), shutdown_rx));
        // Let the node subscribe before anything is published.
        tokio::task::yield_now().await;

        bus.publish_to(
            Topic::PoseEstimates,
            SensorEvent::Pose(estimate(Quaternion::from_euler(0.0, 0.0, 0.4))),
        )
        .unwrap();

        let first = tf_rx.recv().await.unwrap();
        let second = tf_rx.recv().await.unwrap();
        match (first, second) {
            (SensorEvent::Transform(rot), SensorEvent::Transform(trans)) => {
                assert_eq!(rot.child_frame_id, "odom");
                assert_eq!(trans.child_frame_id, "map");
            }
            other => panic!("unexpected events: {other:?}"),
        }

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }
}
