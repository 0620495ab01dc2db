//! Point-cloud re-stamper.
//!
//! Byte-for-byte pass-through of the depth sensor's structured cloud; only
//! the header changes.  The frame id is rewritten to the sensor frame so
//! downstream consumers resolve the cloud through the static mount edge, and
//! the stamp is copied from the input message itself, never from a wall
//! clock.  No reordering, no coalescing, no recomputation of points.

use aeroframe_middleware::{EventBus, RelayNode, Topic};
use aeroframe_types::{
    msg::{Header, PointCloud2, SensorEvent},
    RelayConfig,
};
use async_trait::async_trait;
use tokio::sync::{broadcast::error::RecvError, watch};
use tracing::{debug, info, warn};

/// Consumes the raw cloud lane and republishes restamped clouds.
#[derive(Debug, Clone)]
pub struct CloudRelay {
    sensor_frame: String,
}

impl CloudRelay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            sensor_frame: config.frames.sensor.clone(),
        }
    }

    /// Rewrite the header, keep everything else untouched.
    pub fn restamp(&self, cloud: PointCloud2) -> PointCloud2 {
        PointCloud2 {
            header: Header {
                stamp: cloud.header.stamp,
                frame_id: self.sensor_frame.clone(),
            },
            ..cloud
        }
    }
}

#[async_trait]
impl RelayNode for CloudRelay {
    fn name(&self) -> &'static str {
        "cloud_relay"
    }

    async fn run(self: Box<Self>, bus: EventBus, mut shutdown: watch::Receiver<bool>) {
        let mut rx = bus.subscribe_to(Topic::PointClouds);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                incoming = rx.recv() => match incoming {
                    Ok(SensorEvent::Cloud(cloud)) => {
                        let out = self.restamp(cloud);
                        debug!(
                            points = out.width * out.height,
                            sec = out.header.stamp.sec,
                            "cloud restamped"
                        );
                        if let Err(err) =
                            bus.publish_to(Topic::RestampedClouds, SensorEvent::Cloud(out))
                        {
                            warn!(%err, "restamped cloud not delivered");
                        }
                    }
                    Ok(other) => warn!(node = self.name(), ?other, "unexpected event on cloud lane"),
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
