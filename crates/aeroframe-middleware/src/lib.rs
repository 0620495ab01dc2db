//! `aeroframe-middleware` – message routing between relay components.
//!
//! Components never talk to each other directly; they publish to and
//! subscribe from the in-process [`EventBus`]. External transports (DDS,
//! MAVLink, …) attach to the same lanes at the edges of the process.
//!
//! # Modules
//!
//! - [`bus`] – typed, topic-based publish/subscribe event bus built on
//!   Tokio broadcast channels.
//! - [`broadcaster`] – [`TfBroadcaster`]: the transform-broadcast sink that
//!   enforces the unit-norm invariant before any edge leaves the process.
//! - [`node`] – the [`RelayNode`] trait every relay component implements.

pub mod broadcaster;
pub mod bus;
pub mod node;

pub use broadcaster::TfBroadcaster;
pub use bus::{EventBus, Topic, TopicReceiver};
pub use node::RelayNode;
