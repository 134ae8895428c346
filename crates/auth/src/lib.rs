//! Bearer-token authentication.
//!
//! Core principle: **identity is fully self-contained in the token.** A
//! verified token yields a subject id and role without any database lookup;
//! revocation before natural expiry is deliberately unsupported.

mod error;
mod identity;
mod token;

pub use error::{Error, Result};
pub use identity::{Identity, Role};
pub use token::{Claims, TokenKeeper, MAX_TTL_DAYS, MIN_TTL_DAYS};
