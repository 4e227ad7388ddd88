use thiserror::Error;

#[derive(Debug, Error)]
pub enum PerfError {
    #[error("not a performance file (root element {0:?})")]
    NotAPerformanceFile(String),

    #[error("unsupported performance format {0:?}")]
    UnsupportedFormat(String),

    #[error("performance file has the wrong signature {0:?}")]
    BadSignature(String),

    #[error("performance {designator:?}: field {field} has invalid value {value:?}")]
    InvalidField {
        designator: String,
        field:      &'static str,
        value:      String,
    },

    #[error("performance document parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PerfResult<T> = Result<T, PerfError>;
