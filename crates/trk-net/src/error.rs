use std::net::SocketAddr;

use thiserror::Error;

use crate::Message;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr:   SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to join multicast group {group} on {interface}: {source}")]
    Multicast {
        group:     std::net::Ipv4Addr,
        interface: std::net::Ipv4Addr,
        #[source]
        source:    std::io::Error,
    },

    #[error("bridge task {name} did not shut down cleanly: {source}")]
    Join {
        name:   String,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetResult<T> = Result<T, NetError>;

/// A push that could not be queued.  The rejected message is handed back.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue full")]
    Full(Message),

    #[error("queue closed")]
    Closed(Message),
}

impl QueueError {
    pub fn into_message(self) -> Message {
        match self {
            QueueError::Full(m) | QueueError::Closed(m) => m,
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("frame is not a JSON array of scalars: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty frame")]
    Empty,

    #[error("message kind must be a 32-bit integer, got {0}")]
    BadKind(String),
}
