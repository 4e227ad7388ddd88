use thiserror::Error;

use trk_core::FixId;

#[derive(Debug, Error)]
pub enum CoordsError {
    #[error("duplicate fix number {0}")]
    DuplicateFixId(FixId),

    #[error("duplicate fix indicator {indicator:?} (fixes {first} and {second})")]
    DuplicateIndicator {
        indicator: String,
        first:     FixId,
        second:    FixId,
    },

    #[error("fix table parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoordsResult<T> = Result<T, CoordsError>;
