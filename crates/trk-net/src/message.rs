//! The message envelope exchanged between workers and peers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer tag of a message.
///
/// Any `i32` is legal on the wire; only the associated constants have
/// meaning to the control loop.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct MessageKind(pub i32);

impl MessageKind {
    pub const TERMINATE:    MessageKind = MessageKind(1);
    pub const RATE_CHANGE:  MessageKind = MessageKind(2);
    pub const FREEZE:       MessageKind = MessageKind(3);
    pub const UNFREEZE:     MessageKind = MessageKind(4);
    pub const TRACK_UPDATE: MessageKind = MessageKind(10);

    /// Name of a known kind, `None` for any other value.
    pub fn name(self) -> Option<&'static str> {
        match self {
            MessageKind::TERMINATE    => Some("terminate"),
            MessageKind::RATE_CHANGE  => Some("rate-change"),
            MessageKind::FREEZE       => Some("freeze"),
            MessageKind::UNFREEZE     => Some("unfreeze"),
            MessageKind::TRACK_UPDATE => Some("track-update"),
            _ => None,
        }
    }

    pub fn is_known(self) -> bool {
        self.name().is_some()
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}({})", self.0),
            None => write!(f, "kind({})", self.0),
        }
    }
}

/// One payload element.
///
/// JSON integers decode as `Int`, other numbers as `Float`, strings as `Text`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// A kind tag plus an ordered payload.
#[derive(Clone, PartialEq, Debug)]
pub struct Message {
    pub kind:    MessageKind,
    pub payload: Vec<Scalar>,
}

impl Message {
    pub fn new(kind: MessageKind, payload: Vec<Scalar>) -> Self {
        Self { kind, payload }
    }

    /// A message with no payload.
    pub fn bare(kind: MessageKind) -> Self {
        Self { kind, payload: Vec::new() }
    }

    pub fn terminate() -> Self {
        Self::bare(MessageKind::TERMINATE)
    }
}
