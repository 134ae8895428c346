//! Request lifecycle engine.
//!
//! Owns the state machine for a document request's status and the mutation
//! rules tied to each state. Every operation takes a verified [`auth::Identity`],
//! runs the relevant `policy` check, and touches exactly one record in the
//! request store.

mod engine;
mod error;
mod lifecycle;

pub use engine::{NewRequest, RequestEngine, Stats};
pub use error::{Error, Result};
pub use lifecycle::transition_allowed;
