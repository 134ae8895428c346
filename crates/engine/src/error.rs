//! Lifecycle engine error types.

use storage::RequestId;
use thiserror::Error;

/// Lifecycle engine errors.
///
/// Each variant is a distinct failure kind callers can branch on; adapters
/// map them onto their own status codes. `NotFound` deliberately covers both
/// an absent record and another owner's record, so existence never leaks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input is malformed: out-of-range copies, empty purpose.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The record is absent, or not visible to the requester.
    #[error("request {0} not found")]
    NotFound(RequestId),

    /// The record's current status forbids this mutation.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// The requester is authenticated but not permitted.
    #[error(transparent)]
    Policy(#[from] policy::Error),

    /// An error occurred in the storage layer.
    #[error(transparent)]
    Storage(#[from] storage::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
