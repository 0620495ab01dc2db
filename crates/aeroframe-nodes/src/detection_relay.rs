//! Detection-to-heading converter.
//!
//! Turns one frame's bounding boxes into an orientation-only heading record
//! in the body frame.  Only the first detection in the detector's own
//! ordering is used; there is no score-based selection.  The vertical image
//! axis grows downward while the heading convention grows counter-clockwise,
//! hence the sign flip on the y term of the `atan2`.

use aeroframe_geometry::{Quaternion, Vec3};
use aeroframe_middleware::{EventBus, RelayNode, Topic};
use aeroframe_types::{
    msg::{Detection2D, DetectionArray, Header, PoseStamped, SensorEvent},
    FrameError, RelayConfig,
};
use async_trait::async_trait;
use tokio::sync::{broadcast::error::RecvError, watch};
use tracing::{debug, info, warn};

/// Consumes the detection lane and republishes heading records.
#[derive(Debug, Clone)]
pub struct DetectionRelay {
    body_frame: String,
    image_width: f64,
    image_height: f64,
}

impl DetectionRelay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            body_frame: config.frames.body.clone(),
            image_width: f64::from(config.image_width),
            image_height: f64::from(config.image_height),
        }
    }

    /// Derive the heading record for one detection set.
    ///
    /// Zero detections yield the identity orientation at zero position, with
    /// the input's own stamp.
    ///
    /// # Errors
    ///
    /// [`FrameError::CenterOutOfBounds`] when the first box's center falls
    /// outside the configured image bounds; the caller skips that message.
    pub fn heading(&self, dets: &DetectionArray) -> Result<PoseStamped, FrameError> {
        let header = Header {
            stamp: dets.header.stamp,
            frame_id: self.body_frame.clone(),
        };

        let orientation = match dets.detections.first() {
            None => Quaternion::IDENTITY,
            Some(first) => Quaternion::from_euler(0.0, 0.0, self.angle_to(first)?),
        };

        Ok(PoseStamped {
            header,
            position: Vec3::ZERO,
            orientation,
        })
    }

    /// Image-plane bearing of a box center, counter-clockwise from the +x
    /// image axis through the image center.
    fn angle_to(&self, det: &Detection2D) -> Result<f64, FrameError> {
        let in_bounds = (0.0..=self.image_width).contains(&det.center_x)
            && (0.0..=self.image_height).contains(&det.center_y);
        if !in_bounds {
            return Err(FrameError::CenterOutOfBounds {
                x: det.center_x,
                y: det.center_y,
            });
        }

        let dx = det.center_x - self.image_width / 2.0;
        // Image rows grow downward; headings grow counter-clockwise.
        let dy = -(det.center_y - self.image_height / 2.0);
        Ok(dy.atan2(dx))
    }
}

#[async_trait]
impl RelayNode for DetectionRelay {
    fn name(&self) -> &'static str {
        "detection_relay"
    }

    async fn run(self: Box<Self>, bus: EventBus, mut shutdown: watch::Receiver<bool>) {
        let mut rx = bus.subscribe_to(Topic::Detections);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                incoming = rx.recv() => match incoming {
                    Ok(SensorEvent::Detections(dets)) => match self.heading(&dets) {
                        Ok(out) => {
                            debug!(
                                boxes = dets.detections.len(),
                                sec = out.header.stamp.sec,
                                "heading derived"
                            );
                            if let Err(err) =
                                bus.publish_to(Topic::Headings, SensorEvent::Heading(out))
                            {
                                warn!(%err, "heading not delivered");
                            }
                        }
                        Err(err) => warn!(%err, "dropping detection set"),
                    },
                    Ok(other) => {
                        warn!(node = self.name(), ?other, "unexpected event on detection lane")
                    }
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
