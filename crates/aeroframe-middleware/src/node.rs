//! The relay-node seam.
//!
//! Every component that consumes a bus lane implements [`RelayNode`]; the
//! binary spawns each one as an independent task.  Nodes share nothing
//! mutable: only the read-only configuration and the bus handles.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::bus::EventBus;

/// A stateless 1:1 message handler bound to one input lane.
///
/// # Contract
///
/// * `run` subscribes to the node's input lane and processes messages in
///   arrival order, one output set per input, until the shutdown signal
///   flips or the bus closes.  Handlers never block on anything but the
///   lane itself and never retry a message.
#[async_trait]
pub trait RelayNode: Send + Sync {
    /// Stable name used in log output, e.g. `"pose_relay"`.
    fn name(&self) -> &'static str;

    /// Consume the input lane until shutdown.
    async fn run(self: Box<Self>, bus: EventBus, shutdown: watch::Receiver<bool>);
}
