//! SQLite-backed persistence for document requests.
//!
//! This crate provides the single source of truth for request records. It
//! stores each request as one row and exposes the conditional-write
//! operations the lifecycle engine depends on.
//!
//! # Overview
//!
//! ## RequestStore
//!
//! The [`RequestStore`] wraps a SQLite database and provides inserts,
//! owner-scoped and global queries, and guarded updates. The guarded
//! operations ([`RequestStore::compare_and_update_status`],
//! [`RequestStore::update_fields_if_status`],
//! [`RequestStore::delete_if_status`]) only apply when the row's current
//! status still matches the caller's expectation, so a lost race is
//! reported rather than silently overwritten.
//!
//! ## DocumentRequest
//!
//! A [`DocumentRequest`] is one student's request for an official document:
//! an immutable id and owner, a [`DocumentType`], a free-text purpose, a
//! copy count, a [`Status`], and a creation timestamp.
//!
//! # Example
//!
//! ```no_run
//! use storage::{DocumentRequest, DocumentType, RequestStore, Status};
//!
//! let store = RequestStore::open("requests.db")?;
//!
//! let request = DocumentRequest::new("student-1", DocumentType::Transcript, "Job application", 2);
//! store.insert(&request)?;
//!
//! // Approve only if still pending.
//! let approved = store.compare_and_update_status(request.id, Status::Pending, Status::Approved)?;
//! assert!(approved);
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod request;
mod store;

pub use error::{Error, Result};
pub use request::{DocumentRequest, DocumentType, RequestId, RequestPatch, Status};
pub use store::RequestStore;
