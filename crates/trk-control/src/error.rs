use thiserror::Error;

use trk_core::CoreError;
use trk_net::NetError;

use crate::LoopState;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{operation} is not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state:     LoopState,
    },

    #[error("control loop built without a {0}")]
    MissingCollaborator(&'static str),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("network bridge error: {0}")]
    Net(#[from] NetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ControlResult<T> = Result<T, ControlError>;
