//! Role and ownership authorization checks.
//!
//! Core principle: **every mutating operation requires an explicit check.**
//! Checks are pure and run strictly after credential verification succeeds;
//! authentication always precedes authorization.

mod error;
mod gate;

pub use error::{Error, Result};
pub use gate::{require_owner, require_owner_or_role, require_role};
