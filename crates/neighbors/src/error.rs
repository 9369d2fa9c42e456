//! Error types for neighborhood building.
//!
//! Only malformed input is fatal. Users without enough co-rated items are
//! skipped where they are scored and never show up here.

use thiserror::Error;

/// Errors surfaced to callers of the recommendation core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// A rating collection is malformed or the active user's id is taken
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl RecommendError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
