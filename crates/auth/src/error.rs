//! Authentication error types.

use thiserror::Error;

/// Authentication errors.
///
/// Every variant maps to an `Unauthorized` outcome for the caller; the
/// variants exist so logs and tests can distinguish the cause.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The signing secret is empty.
    #[error("token secret must not be empty")]
    EmptySecret,

    /// No token was supplied.
    #[error("no token provided")]
    MissingToken,

    /// The token is not a well-formed signed payload.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The signature does not match the claims.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,

    /// The requested expiry is outside the permitted window.
    #[error("token lifetime must be between {min} and {max} days")]
    TtlOutOfRange { min: i64, max: i64 },

    /// Failed to serialize claims while issuing a token.
    #[error("token encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
