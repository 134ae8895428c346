//! Lifecycle operations over the request store.

use auth::{Identity, Role};
use serde::{Deserialize, Serialize};
use storage::{DocumentRequest, DocumentType, RequestId, RequestPatch, RequestStore, Status};
use tracing::{info, warn};

use crate::lifecycle::transition_allowed;
use crate::{Error, Result};

const MIN_COPIES: u8 = 1;
const MAX_COPIES: u8 = 5;

/// Input for a new document request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    pub document_type: DocumentType,
    pub purpose: String,
    /// Defaults to 1 when unset.
    pub number_of_copies: Option<u8>,
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub declined: u64,
    pub ready: u64,
}

/// Executes gated lifecycle operations against the request store.
///
/// The engine never writes a status directly; every status change goes
/// through a compare-and-update so a lost race surfaces as an
/// [`Error::InvalidTransition`] instead of a silent overwrite.
pub struct RequestEngine {
    store: RequestStore,
}

impl RequestEngine {
    pub fn new(store: RequestStore) -> Self {
        Self { store }
    }

    /// Submit a new request on behalf of the requester.
    ///
    /// Students only. The record always starts `Pending`; nothing is
    /// persisted when validation fails.
    pub fn create(&self, requester: &Identity, new: NewRequest) -> Result<DocumentRequest> {
        policy::require_role(requester, Role::Student)?;

        let copies = new.number_of_copies.unwrap_or(MIN_COPIES);
        validate_copies(copies)?;
        let purpose = validate_purpose(&new.purpose)?;

        let request =
            DocumentRequest::new(requester.subject_id.clone(), new.document_type, purpose, copies);
        self.store.insert(&request)?;
        info!(id = %request.id, owner = %request.owner_id, "request created");
        Ok(request)
    }

    /// Fetch a single request visible to the requester.
    ///
    /// Visible means owned by the requester or requested by an admin; for
    /// anyone else the record is indistinguishable from a missing one.
    pub fn get(&self, requester: &Identity, id: RequestId) -> Result<DocumentRequest> {
        let record = self.store.find_by_id(id)?.ok_or(Error::NotFound(id))?;
        if policy::require_owner_or_role(requester, &record.owner_id, Role::Admin).is_err() {
            return Err(Error::NotFound(id));
        }
        Ok(record)
    }

    /// Apply a partial update to the requester's own pending request.
    pub fn edit(
        &self,
        requester: &Identity,
        id: RequestId,
        patch: RequestPatch,
    ) -> Result<DocumentRequest> {
        let record = self.load_owned(requester, id)?;
        require_pending(&record, "edit")?;

        if let Some(copies) = patch.number_of_copies {
            validate_copies(copies)?;
        }
        let patch = RequestPatch {
            purpose: patch.purpose.as_deref().map(validate_purpose).transpose()?,
            ..patch
        };

        match self
            .store
            .update_fields_if_status(id, &patch, Status::Pending)?
        {
            Some(updated) => {
                info!(id = %id, "request edited");
                Ok(updated)
            }
            // The precondition held when we read the record but not at write
            // time: the update lost a race with an admin transition.
            None => Err(self.recheck_failure(id, "edit")),
        }
    }

    /// Withdraw the requester's own pending request.
    pub fn delete(&self, requester: &Identity, id: RequestId) -> Result<()> {
        let record = self.load_owned(requester, id)?;
        require_pending(&record, "delete")?;

        if self.store.delete_if_status(id, Status::Pending)? {
            info!(id = %id, "request deleted");
            Ok(())
        } else {
            Err(self.recheck_failure(id, "delete"))
        }
    }

    /// Move a request to `target`. Admins only.
    ///
    /// Legal moves: `Pending` to `Approved` or `Declined`, `Approved` to
    /// `Ready`. Everything else, including re-applying the current status,
    /// is an invalid transition.
    pub fn transition(
        &self,
        requester: &Identity,
        id: RequestId,
        target: Status,
    ) -> Result<DocumentRequest> {
        policy::require_role(requester, Role::Admin)?;

        let record = self.store.find_by_id(id)?.ok_or(Error::NotFound(id))?;
        if !transition_allowed(record.status, target) {
            return Err(Error::InvalidTransition(format!(
                "cannot move a {} request to {target}",
                record.status
            )));
        }

        if !self
            .store
            .compare_and_update_status(id, record.status, target)?
        {
            warn!(id = %id, %target, "transition lost a concurrent update");
            return Err(self.recheck_failure(id, "transition"));
        }

        info!(id = %id, from = %record.status, to = %target, "request transitioned");
        self.store.find_by_id(id)?.ok_or(Error::NotFound(id))
    }

    /// The requester's own requests, most recent first.
    pub fn list_own(&self, requester: &Identity) -> Result<Vec<DocumentRequest>> {
        Ok(self.store.find_by_owner(&requester.subject_id)?)
    }

    /// Every request in the store, most recent first. Admins only.
    pub fn list_all(&self, requester: &Identity) -> Result<Vec<DocumentRequest>> {
        policy::require_role(requester, Role::Admin)?;
        Ok(self.store.find_all()?)
    }

    /// The most recent requests: across all owners for an admin, the
    /// requester's own otherwise.
    pub fn recent(&self, requester: &Identity, limit: usize) -> Result<Vec<DocumentRequest>> {
        let mut records = if requester.is_admin() {
            self.store.find_all()?
        } else {
            self.store.find_by_owner(&requester.subject_id)?
        };
        records.truncate(limit);
        Ok(records)
    }

    /// Store-wide counters for the admin dashboard.
    pub fn stats(&self, requester: &Identity) -> Result<Stats> {
        policy::require_role(requester, Role::Admin)?;
        Ok(Stats {
            total: self.store.count()?,
            pending: self.store.count_by_status(Status::Pending)?,
            approved: self.store.count_by_status(Status::Approved)?,
            declined: self.store.count_by_status(Status::Declined)?,
            ready: self.store.count_by_status(Status::Ready)?,
        })
    }

    /// Load a record the requester must own outright.
    ///
    /// A foreign record reads as `NotFound`, never as `Forbidden`, so a
    /// student cannot probe for the existence of another student's request.
    fn load_owned(&self, requester: &Identity, id: RequestId) -> Result<DocumentRequest> {
        let record = self.store.find_by_id(id)?.ok_or(Error::NotFound(id))?;
        if policy::require_owner(requester, &record.owner_id).is_err() {
            return Err(Error::NotFound(id));
        }
        Ok(record)
    }

    /// Classify a guarded write that did not apply.
    fn recheck_failure(&self, id: RequestId, op: &str) -> Error {
        match self.store.find_by_id(id) {
            Ok(Some(record)) => Error::InvalidTransition(format!(
                "cannot {op}: request is now {}",
                record.status
            )),
            Ok(None) => Error::NotFound(id),
            Err(e) => e.into(),
        }
    }
}

fn require_pending(record: &DocumentRequest, op: &str) -> Result<()> {
    if record.status == Status::Pending {
        Ok(())
    } else {
        Err(Error::InvalidTransition(format!(
            "cannot {op}: request is now {}",
            record.status
        )))
    }
}

fn validate_copies(copies: u8) -> Result<()> {
    if (MIN_COPIES..=MAX_COPIES).contains(&copies) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "number of copies must be between {MIN_COPIES} and {MAX_COPIES}, got {copies}"
        )))
    }
}

fn validate_purpose(purpose: &str) -> Result<String> {
    let trimmed = purpose.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("purpose must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
