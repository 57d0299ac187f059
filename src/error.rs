//! Error types shared by the solvers and the harness.

use thiserror::Error;

/// Result type for coinreach operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Solver precondition violated (zero denomination, zero supply)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A reachability table disagreed with its own fill during reconstruction
    #[error("Inconsistent reachability table at value {value}")]
    InconsistentTable { value: usize },

    /// Integer arithmetic left the range of `usize`
    #[error("Arithmetic overflow while {0}")]
    Overflow(&'static str),

    /// An input row could not be turned into a test case
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub fn malformed_row<S: Into<String>>(line: usize, reason: S) -> Self {
        Error::MalformedRow {
            line,
            reason: reason.into(),
        }
    }
}
