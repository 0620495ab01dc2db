//! Typed, topic-based publish/subscribe event bus.
//!
//! Uses [`tokio::sync::broadcast`] channels under the hood so that every
//! subscriber receives every message without any single subscriber blocking
//! the others.  Messages on the *same* lane reach a subscriber in arrival
//! order; lanes interleave arbitrarily.
//!
//! # Topics
//!
//! | Topic | Traffic |
//! |---|---|
//! | [`Topic::PoseEstimates`] | External pose-estimation feed |
//! | [`Topic::PointClouds`] | Raw depth-sensor clouds |
//! | [`Topic::Images`] | Raw single-channel camera frames |
//! | [`Topic::Detections`] | External 2-D bounding-box detections |
//! | [`Topic::RestampedClouds`] | Clouds with corrected frame/stamp |
//! | [`Topic::ExpandedImages`] | 3-channel expanded frames |
//! | [`Topic::Headings`] | Detection-derived heading records |
//! | [`Topic::Transforms`] | Dynamic transform edges |
//! | [`Topic::StaticTransforms`] | Static transform edges |

use aeroframe_types::{msg::SensorEvent, FrameError};
use tokio::sync::broadcast;

/// Default per-lane capacity (buffered events before old ones are dropped
/// for slow subscribers).
const DEFAULT_CAPACITY: usize = 256;

/// Enumeration of all routing lanes on the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Incoming pose estimates (position + orientation + stamp).
    PoseEstimates,
    /// Incoming structured point clouds.
    PointClouds,
    /// Incoming single-channel images.
    Images,
    /// Incoming bounding-box detection sets.
    Detections,
    /// Re-stamped point clouds for downstream consumers.
    RestampedClouds,
    /// Channel-expanded 3-channel images.
    ExpandedImages,
    /// Heading records derived from detections.
    Headings,
    /// Dynamic (per-pose) transform edges.
    Transforms,
    /// Static (startup-only) transform edges.
    StaticTransforms,
}

/// Shared event bus.  Clone it cheaply; all clones share the same underlying
/// broadcast channels.
#[derive(Clone, Debug)]
pub struct EventBus {
    pose_estimates: broadcast::Sender<SensorEvent>,
    point_clouds: broadcast::Sender<SensorEvent>,
    images: broadcast::Sender<SensorEvent>,
    detections: broadcast::Sender<SensorEvent>,
    restamped_clouds: broadcast::Sender<SensorEvent>,
    expanded_images: broadcast::Sender<SensorEvent>,
    headings: broadcast::Sender<SensorEvent>,
    transforms: broadcast::Sender<SensorEvent>,
    static_transforms: broadcast::Sender<SensorEvent>,
}

impl EventBus {
    /// Create a new bus; `capacity` applies to every lane independently.
    pub fn new(capacity: usize) -> Self {
        let lane = || broadcast::channel(capacity).0;
        Self {
            pose_estimates: lane(),
            point_clouds: lane(),
            images: lane(),
            detections: lane(),
            restamped_clouds: lane(),
            expanded_images: lane(),
            headings: lane(),
            transforms: lane(),
            static_transforms: lane(),
        }
    }

    /// Publish `event` to the given [`Topic`] lane.
    ///
    /// Returns the number of active receivers the event reached.
    ///
    /// # Errors
    ///
    /// [`FrameError::Channel`] when no subscriber is currently listening on
    /// the lane.  Publishers treat this as a logged, non-fatal delivery
    /// failure and stay ready for the next message.
    pub fn publish_to(&self, topic: Topic, event: SensorEvent) -> Result<usize, FrameError> {
        self.lane_sender(topic)
            .send(event)
            .map_err(|_| FrameError::Channel(format!("no subscribers on lane {topic:?}")))
    }

    /// Subscribe to a [`Topic`] lane.
    pub fn subscribe_to(&self, topic: Topic) -> TopicReceiver {
        TopicReceiver {
            topic,
            receiver: self.lane_sender(topic).subscribe(),
        }
    }

    fn lane_sender(&self, topic: Topic) -> &broadcast::Sender<SensorEvent> {
        match topic {
            Topic::PoseEstimates => &self.pose_estimates,
            Topic::PointClouds => &self.point_clouds,
            Topic::Images => &self.images,
            Topic::Detections => &self.detections,
            Topic::RestampedClouds => &self.restamped_clouds,
            Topic::ExpandedImages => &self.expanded_images,
            Topic::Headings => &self.headings,
            Topic::Transforms => &self.transforms,
            Topic::StaticTransforms => &self.static_transforms,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Topic receiver
// ─────────────────────────────────────────────────────────────────────────────

/// An async receiver bound to a single [`Topic`] lane, obtained via
/// [`EventBus::subscribe_to`].
pub struct TopicReceiver {
    topic: Topic,
    receiver: broadcast::Receiver<SensorEvent>,
}

impl TopicReceiver {
    /// Wait for the next event on this lane.
    ///
    /// Returns:
    /// * `Ok(event)` – a successfully received event.
    /// * `Err(RecvError::Lagged(n))` – the subscriber fell behind and `n`
    ///   messages were dropped; the caller decides whether to continue.
    /// * `Err(RecvError::Closed)` – the bus has shut down.
    pub async fn recv(&mut self) -> Result<SensorEvent, broadcast::error::RecvError> {
        self.receiver.recv().await
    }

    /// The [`Topic`] this receiver is bound to.
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeroframe_types::msg::{PoseEstimate, Stamp};
    use aeroframe_geometry::{Quaternion, Vec3};

    fn pose_event(sec: i32) -> SensorEvent {
        SensorEvent::Pose(PoseEstimate {
            stamp: Stamp::new(sec, 0),
            position: Vec3::new(1.0, 2.0, 3.0),
            orientation: Quaternion::IDENTITY,
        })
    }

    #[tokio::test]
    async fn publish_and_receive() -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut rx = bus.subscribe_to(Topic::PoseEstimates);

        bus.publish_to(Topic::PoseEstimates, pose_event(5))?;

        match rx.recv().await? {
            SensorEvent::Pose(p) => assert_eq!(p.stamp.sec, 5),
            other => panic!("unexpected event: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe_to(Topic::Transforms);
        let mut rx2 = bus.subscribe_to(Topic::Transforms);

        let ev = pose_event(9);
        bus.publish_to(Topic::Transforms, ev.clone())?;

        assert_eq!(rx1.recv().await?, ev);
        assert_eq!(rx2.recv().await?, ev);
        Ok(())
    }

    /// A subscriber on one lane must not see traffic from another lane.
    #[tokio::test]
    async fn lanes_are_isolated() -> Result<(), Box<dyn std::error::Error>> {
        let bus = EventBus::default();
        let mut clouds = bus.subscribe_to(Topic::PointClouds);
        let _poses = bus.subscribe_to(Topic::PoseEstimates);

        bus.publish_to(Topic::PoseEstimates, pose_event(1))?;

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            clouds.recv(),
        )
        .await;
        assert!(result.is_err(), "cloud lane must stay silent");
        Ok(())
    }

    #[test]
    fn publish_without_subscribers_is_a_channel_error() {
        let bus = EventBus::default();
        let result = bus.publish_to(Topic::Headings, pose_event(0));
        assert!(matches!(result, Err(FrameError::Channel(_))));
    }

    /// Flooding a small lane while the subscriber sleeps surfaces `Lagged`
    /// rather than panicking or blocking.
    #[tokio::test]
    async fn slow_subscriber_observes_lag() {
        let bus = EventBus::new(8);
        let mut slow = bus.subscribe_to(Topic::Images);

        for i in 0..100 {
            let _ = bus.publish_to(Topic::Images, pose_event(i));
        }

        let result = slow.recv().await;
        assert!(
            matches!(result, Err(broadcast::error::RecvError::Lagged(_))),
            "expected Lagged, got {result:?}"
        );
    }

    #[test]
    fn receiver_reports_its_topic() {
        let bus = EventBus::default();
        let rx = bus.subscribe_to(Topic::StaticTransforms);
        assert_eq!(rx.topic(), Topic::StaticTransforms);
    }
}
