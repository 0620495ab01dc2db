//! Static frame publisher.
//!
//! Emits, once at startup, the two fixed edges of the transform graph:
//!
//! * `sensor -> body` – the physical mounting geometry of the depth sensor.
//!   The default mount has the sensor's yaw axis offset 180° from the body's.
//! * `world_final -> world_ned` – the convention offset from the estimator's
//!   map frame to a standard north-east-down world frame.
//!
//! Both edges carry stamp zero and are never re-published or mutated; they
//! depend on configuration alone, never on any sensor input.

use aeroframe_geometry::{Quaternion, Vec3};
use aeroframe_middleware::TfBroadcaster;
use aeroframe_types::{
    msg::{Stamp, TransformStamped},
    FrameError, RelayConfig,
};
use tracing::{debug, info, warn};

/// Builds and publishes the invariant skeleton of the frame graph.
#[derive(Debug, Clone)]
pub struct StaticFramePublisher {
    mount_edge: TransformStamped,
    ned_edge: TransformStamped,
}

impl StaticFramePublisher {
    /// Construct both edges from validated configuration.  Identical config
    /// yields identical edges on every startup.
    pub fn new(config: &RelayConfig) -> Self {
        let [mr, mp, my] = config.mount_rpy;
        let mount_edge = TransformStamped::new(
            &config.frames.sensor,
            &config.frames.body,
            Stamp::ZERO,
            Vec3::ZERO,
            Quaternion::from_euler(mr, mp, my),
        );

        let [nr, np, ny] = config.world_ned_rpy;
        let ned_edge = TransformStamped::new(
            &config.frames.world_final,
            &config.frames.world_ned,
            Stamp::ZERO,
            Vec3::ZERO,
            Quaternion::from_euler(nr, np, ny),
        );

        Self {
            mount_edge,
            ned_edge,
        }
    }

    /// The two static edges, mount edge first.
    pub fn edges(&self) -> [&TransformStamped; 2] {
        [&self.mount_edge, &self.ned_edge]
    }

    /// Publish both edges through the transform-broadcast sink.  Called
    /// exactly once, before any dynamic handler is spawned.  A delivery
    /// failure on one edge is logged and never prevents the other edge's
    /// attempt.
    pub fn publish(&self, broadcaster: &TfBroadcaster) {
        for edge in self.edges() {
            match broadcaster.send_static_transform(edge.clone()) {
                Ok(_) => info!(
                    parent = %edge.header.frame_id,
                    child = %edge.child_frame_id,
                    "published static edge"
                ),
                // Nobody attached to the static lane yet is a delivery
                // detail, not a startup failure.
                Err(FrameError::Channel(reason)) => debug!(
                    parent = %edge.header.frame_id,
                    child = %edge.child_frame_id,
                    %reason,
                    "static edge had no consumers"
                ),
                Err(err) => warn!(
                    %err,
                    parent = %edge.header.frame_id,
                    child = %edge.child_frame_id,
                    "static edge not delivered"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeroframe_geometry::UNIT_EPS;
    use aeroframe_middleware::{EventBus, Topic};
    use aeroframe_types::msg::SensorEvent;
    use std::f64::consts::PI;

    #[test]
    fn edges_are_deterministic_across_constructions() {
        let cfg = RelayConfig::default();
        let a = StaticFramePublisher::new(&cfg);
        let b = StaticFramePublisher::new(&cfg);
        assert_eq!(a.edges()[0], b.edges()[0]);
        assert_eq!(a.edges()[1], b.edges()[1]);
    }

    #[test]
    fn edges_carry_stamp_zero_and_no_translation() {
        let publisher = StaticFramePublisher::new(&RelayConfig::default());
        for edge in publisher.edges() {
            assert_eq!(edge.header.stamp, Stamp::ZERO);
            assert_eq!(edge.translation, Vec3::ZERO);
            assert!(edge.rotation.is_unit(UNIT_EPS));
        }
    }

    #[test]
    fn mount_edge_links_sensor_to_body_with_yaw_pi() {
        let cfg = RelayConfig::default();
        let publisher = StaticFramePublisher::new(&cfg);
        let mount = publisher.edges()[0];

        assert_eq!(mount.header.frame_id, cfg.frames.sensor);
        assert_eq!(mount.child_frame_id, cfg.frames.body);

        let (_, _, yaw) = mount.rotation.to_euler();
        assert!((yaw.abs() - PI).abs() < 1e-9, "yaw was {yaw}");
    }

    #[test]
    fn ned_edge_links_world_final_to_world_ned() {
        let cfg = RelayConfig::default();
        let publisher = StaticFramePublisher::new(&cfg);
        let ned = publisher.edges()[1];

        assert_eq!(ned.header.frame_id, cfg.frames.world_final);
        assert_eq!(ned.child_frame_id, cfg.frames.world_ned);
    }

    /// The startup path: nothing listens on the static lane yet, so both
    /// sends fail to deliver.  Both edges must still be attempted, and a
    /// consumer attaching afterwards sees the full skeleton on the next
    /// pass.
    #[tokio::test]
    async fn publish_attempts_every_edge_without_subscribers() {
        let bus = EventBus::default();
        let broadcaster = TfBroadcaster::new(bus.clone());
        let cfg = RelayConfig::default();
        let publisher = StaticFramePublisher::new(&cfg);

        publisher.publish(&broadcaster);

        let mut rx = bus.subscribe_to(Topic::StaticTransforms);
        publisher.publish(&broadcaster);

        match rx.recv().await.unwrap() {
            SensorEvent::Transform(tf) => assert_eq!(tf.child_frame_id, cfg.frames.body),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            SensorEvent::Transform(tf) => {
                assert_eq!(tf.child_frame_id, cfg.frames.world_ned)
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn publish_emits_both_edges_in_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe_to(Topic::StaticTransforms);
        let broadcaster = TfBroadcaster::new(bus);

        let cfg = RelayConfig::default();
        StaticFramePublisher::new(&cfg).publish(&broadcaster);

        match rx.recv().await.unwrap() {
            SensorEvent::Transform(tf) => assert_eq!(tf.child_frame_id, cfg.frames.body),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            SensorEvent::Transform(tf) => {
                assert_eq!(tf.child_frame_id, cfg.frames.world_ned)
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
