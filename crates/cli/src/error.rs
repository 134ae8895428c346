//! CLI error types.

use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The signing secret environment variable is not set.
    #[error("{0} is not set. Export a signing secret first")]
    MissingSecret(&'static str),

    /// Configuration is invalid or missing required fields.
    #[error("config error: {0}")]
    Config(String),

    /// Credential verification or token issuance failed.
    #[error(transparent)]
    Auth(#[from] auth::Error),

    /// An error occurred in the lifecycle engine.
    #[error(transparent)]
    Engine(#[from] engine::Error),

    /// An error occurred in the storage layer.
    #[error(transparent)]
    Storage(#[from] storage::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Output serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// The HTTP status an HTTP adapter would report for this failure.
    ///
    /// Mirrors the mapping of the original service: credential failures are
    /// 401, denied operations 403, invisible records 404, bad input and
    /// state-machine refusals 400, anything uncategorized 500.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Auth(_) => 401,
            Error::Engine(engine::Error::Policy(_)) => 403,
            Error::Engine(engine::Error::NotFound(_)) => 404,
            Error::Engine(engine::Error::Validation(_))
            | Error::Engine(engine::Error::InvalidTransition(_)) => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
