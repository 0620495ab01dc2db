//! Image channel expander.
//!
//! Replicates each pixel of a single-channel frame into three identical
//! channels (no color conversion) so consumers that expect 3-channel input
//! can run unmodified.  The frame must match the fixed configured
//! resolution, and the buffer length is checked up front: a short buffer is
//! rejected before any read, dropping that frame only.

use aeroframe_middleware::{EventBus, RelayNode, Topic};
use aeroframe_types::{
    msg::{Header, ImageFrame, SensorEvent},
    FrameError, RelayConfig,
};
use async_trait::async_trait;
use tokio::sync::{broadcast::error::RecvError, watch};
use tracing::{debug, info, warn};

/// Consumes the raw image lane and republishes 3-channel frames.
#[derive(Debug, Clone)]
pub struct ImageRelay {
    expected_pixels: u64,
}

impl ImageRelay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            expected_pixels: config.pixel_count(),
        }
    }

    /// Expand one mono frame into three channels.
    ///
    /// # Errors
    ///
    /// * [`FrameError::ImageGeometry`] when `height * width` differs from
    ///   the configured pixel count, or when the declared row step cannot
    ///   be tripled without overflowing.
    /// * [`FrameError::ShortBuffer`] when the buffer holds fewer bytes than
    ///   the declared pixel count; checked before any read.
    pub fn expand(&self, img: &ImageFrame) -> Result<ImageFrame, FrameError> {
        let declared = u64::from(img.height) * u64::from(img.width);
        if declared != self.expected_pixels {
            return Err(FrameError::ImageGeometry {
                expected_pixels: self.expected_pixels,
                width: img.width,
                height: img.height,
            });
        }

        let step = img.step.checked_mul(3).ok_or(FrameError::ImageGeometry {
            expected_pixels: self.expected_pixels,
            width: img.width,
            height: img.height,
        })?;

        let pixels = declared as usize;
        if img.data.len() < pixels {
            return Err(FrameError::ShortBuffer {
                expected: pixels,
                actual: img.data.len(),
            });
        }

        let mut data = Vec::with_capacity(pixels * 3);
        for &value in &img.data[..pixels] {
            data.extend_from_slice(&[value, value, value]);
        }

        Ok(ImageFrame {
            header: Header {
                stamp: img.header.stamp,
                frame_id: img.header.frame_id.clone(),
            },
            height: img.height,
            width: img.width,
            encoding: "rgb8".to_string(),
            is_bigendian: img.is_bigendian,
            step,
            data,
        })
    }
}

#[async_trait]
impl RelayNode for ImageRelay {
    fn name(&self) -> &'static str {
        "image_relay"
    }

    async fn run(self: Box<Self>, bus: EventBus, mut shutdown: watch::Receiver<bool>) {
        let mut rx = bus.subscribe_to(Topic::Images);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                incoming = rx.recv() => match incoming {
                    Ok(SensorEvent::Image(img)) => match self.expand(&img) {
                        Ok(out) => {
                            debug!(sec = out.header.stamp.sec, "image expanded");
                            if let Err(err) =
                                bus.publish_to(Topic::ExpandedImages, SensorEvent::Image(out))
                            {
                                warn!(%err, "expanded image not delivered");
                            }
                        }
                        Err(err) => warn!(%err, "dropping image frame"),
                    },
                    Ok(other) => warn!(node = self.name(), ?other, "unexpected event on image lane"),
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
    use aeroframe_types::msg::Stamp;

    /// A tiny fixed resolution keeps the fixtures readable.
    fn tiny_config() -> RelayConfig {
        let mut cfg = RelayConfig::default();
        cfg.image_width = 4;
        cfg.image_height = 2;
        cfg
    }

    fn mono_frame(data: Vec<u8>) -> ImageFrame {
        ImageFrame {
            header: Header {
                stamp: Stamp::new(8, 90),
                frame_id: "cam_frame".to_string(),
            },
            height: 2,
            width: 4,
            encoding: "mono8".to_string(),
            is_bigendian: false,
            step: 4,
            data,
        }
    }

    #[test]
    fn each_pixel_becomes_an_identical_triplet() {
        let relay = ImageRelay::new(&tiny_config());
        let input = mono_frame(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let out = relay.expand(&input).unwrap();

        assert_eq!(out.data.len(), 24);
        for (i, &v) in input.data.iter().enumerate() {
            assert_eq!(&out.data[3 * i..3 * i + 3], &[v, v, v]);
        }
        assert_eq!(out.step, input.step * 3);
        assert_eq!(out.encoding, "rgb8");
        assert_eq!(out.height, input.height);
        assert_eq!(out.width, input.width);
        assert_eq!(out.header.stamp, input.header.stamp);
    }

    #[test]
    fn exactly_the_declared_pixel_count_is_processed() {
        let relay = ImageRelay::new(&tiny_config());
        // Trailing padding bytes beyond height*width are ignored.
        let mut input = mono_frame(vec![9; 8]);
        input.data.extend_from_slice(&[0xFF; 4]);
        let out = relay.expand(&input).unwrap();
        assert_eq!(out.data.len(), 24);
        assert!(out.data.iter().all(|&b| b == 9));
    }

    #[test]
    fn short_buffer_is_rejected_before_reading() {
        let relay = ImageRelay::new(&tiny_config());
        let input = mono_frame(vec![1, 2, 3]);
        let err = relay.expand(&input).unwrap_err();
        assert_eq!(
            err,
            FrameError::ShortBuffer {
                expected: 8,
                actual: 3
            }
        );
    }

    #[test]
    fn step_that_cannot_triple_is_rejected() {
        let relay = ImageRelay::new(&tiny_config());
        let mut input = mono_frame(vec![0; 8]);
        input.step = u32::MAX;
        let err = relay.expand(&input).unwrap_err();
        assert!(matches!(err, FrameError::ImageGeometry { .. }));
    }

    #[test]
    fn wrong_resolution_is_rejected() {
        let relay = ImageRelay::new(&tiny_config());
        let mut input = mono_frame(vec![0; 8]);
        input.width = 2;
        let err = relay.expand(&input).unwrap_err();
        assert!(matches!(err, FrameError::ImageGeometry { .. }));
    }

    #[tokio::test]
    async fn run_drops_bad_frames_and_keeps_going() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe_to(Topic::ExpandedImages);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let node = Box::new(ImageRelay::new(&tiny_config()));
        let task = tokio::spawn(node.run(bus.clone(), shutdown_rx));
        // Let the node subscribe before anything is published.
        tokio::task::yield_now().await;

        // A truncated frame followed by a good one: only the good one
        // comes out, and the relay survives the bad one.
        bus.publish_to(Topic::Images, SensorEvent::Image(mono_frame(vec![1])))
            .unwrap();
        bus.publish_to(Topic::Images, SensorEvent::Image(mono_frame(vec![7; 8])))
            .unwrap();

        match rx.recv().await.unwrap() {
            SensorEvent::Image(img) => {
                assert_eq!(img.data.len(), 24);
                assert!(img.data.iter().all(|&b| b == 7));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }
}
