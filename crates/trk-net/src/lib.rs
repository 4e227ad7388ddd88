//! `trk-net`: messages, queues, and the network bridge.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`message`]  | `MessageKind`, `Scalar`, `Message`                        |
//! | [`codec`]    | `encode`, `decode` (JSON array envelope)                  |
//! | [`queue`]    | `MessageQueue` (crossbeam channel handle)                 |
//! | [`address`]  | `ChannelAddress`, `ChannelKind`                           |
//! | [`listener`] | `NetListener` (UDP → queue)                               |
//! | [`sender`]   | `NetSender` (queue → UDP)                                 |
//! | [`bridge`]   | `BridgeHandle`, `BridgeSet`, `BridgeStats`                |
//! | [`error`]    | `NetError`, `QueueError`, `CodecError`                    |
//!
//! # Data flow
//!
//! ```text
//!  network ──UDP──► NetListener ──push──► MessageQueue ──try_pop──► control loop
//!  control loop ──push──► MessageQueue ──try_pop──► NetSender ──UDP──► network
//! ```
//!
//! Bridge tasks run on the Tokio runtime; the control loop only ever touches
//! queues, so a slow or silent network never stalls a tick.

pub mod address;
pub mod bridge;
pub mod codec;
pub mod error;
pub mod listener;
pub mod message;
pub mod queue;
pub mod sender;


pub use address::{ChannelAddress, ChannelKind};
pub use bridge::{BridgeHandle, BridgeSet, BridgeStats};
pub use codec::{decode, encode};
pub use error::{CodecError, NetError, NetResult, QueueError};
pub use listener::NetListener;
pub use message::{Message, MessageKind, Scalar};
pub use queue::MessageQueue;
pub use sender::NetSender;
