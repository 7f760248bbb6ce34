//! Error types for U-Cutlist.

use thiserror::Error;

/// Result type alias for U-Cutlist operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a projection or packing run.
///
/// Degraded outcomes (time budget exceeded, unplaced parts) are not errors;
/// they are reported on the result itself.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Geometry collection is empty or malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No usable bar length once trim has been reserved.
    #[error("No stock available")]
    NoStockAvailable,

    /// The part list is empty.
    #[error("No parts requested")]
    NoPartsRequested,

    /// Kerf, trim or part lengths make packing degenerate.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Unexpected solver or boolean-library failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true for errors caused by the caller's input rather than the engine.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}
