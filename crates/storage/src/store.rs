//! SQLite request store implementation.

use rusqlite::{Connection, params};
use std::path::Path;

use crate::{DocumentRequest, Error, RequestId, RequestPatch, Result, Status};

const SELECT_COLUMNS: &str =
    "id, owner_id, document_type, purpose, number_of_copies, status, created_at";

/// SQLite-backed request store.
pub struct RequestStore {
    conn: Connection,
}

impl RequestStore {
    /// Open or create a request store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory request store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS requests (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                document_type TEXT NOT NULL,
                purpose TEXT NOT NULL,
                number_of_copies INTEGER NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_requests_owner
                ON requests(owner_id, created_at);
            "#,
        )?;
        Ok(())
    }

    /// Insert a new request record.
    pub fn insert(&self, request: &DocumentRequest) -> Result<()> {
        self.conn.execute(
            "INSERT INTO requests (id, owner_id, document_type, purpose, number_of_copies, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                request.id.to_string(),
                request.owner_id,
                request.document_type.as_str(),
                request.purpose,
                i64::from(request.number_of_copies),
                request.status.as_str(),
                request.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Load a single request by id.
    pub fn find_by_id(&self, id: RequestId) -> Result<Option<DocumentRequest>> {
        let mut rows = self.query(
            &format!("SELECT {SELECT_COLUMNS} FROM requests WHERE id = ?1"),
            params![id.to_string()],
        )?;
        Ok(rows.pop())
    }

    /// All requests created by one owner, most recent first.
    pub fn find_by_owner(&self, owner_id: &str) -> Result<Vec<DocumentRequest>> {
        self.query(
            &format!(
                "SELECT {SELECT_COLUMNS} FROM requests WHERE owner_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ),
            params![owner_id],
        )
    }

    /// All requests in the store, most recent first.
    pub fn find_all(&self) -> Result<Vec<DocumentRequest>> {
        self.query(
            &format!("SELECT {SELECT_COLUMNS} FROM requests ORDER BY created_at DESC, rowid DESC"),
            params![],
        )
    }

    /// Conditionally move a request's status from `expected` to `new`.
    ///
    /// Returns `true` iff the row existed and still held `expected` at write
    /// time. A `false` result means the caller lost the race (or the row is
    /// gone) and nothing was changed.
    pub fn compare_and_update_status(
        &self,
        id: RequestId,
        expected: Status,
        new: Status,
    ) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE requests SET status = ?1 WHERE id = ?2 AND status = ?3",
            params![new.as_str(), id.to_string(), expected.as_str()],
        )?;
        Ok(changed == 1)
    }

    /// Apply a partial field update, guarded on the current status.
    ///
    /// Absent patch fields retain their stored value. Returns the fresh row
    /// on success, `None` when the row is missing or its status no longer
    /// matches `expected`.
    pub fn update_fields_if_status(
        &self,
        id: RequestId,
        patch: &RequestPatch,
        expected: Status,
    ) -> Result<Option<DocumentRequest>> {
        let changed = self.conn.execute(
            "UPDATE requests SET
                document_type = COALESCE(?1, document_type),
                purpose = COALESCE(?2, purpose),
                number_of_copies = COALESCE(?3, number_of_copies)
             WHERE id = ?4 AND status = ?5",
            params![
                patch.document_type.map(|d| d.as_str()),
                patch.purpose.as_deref(),
                patch.number_of_copies.map(i64::from),
                id.to_string(),
                expected.as_str(),
            ],
        )?;

        if changed == 1 {
            self.find_by_id(id)
        } else {
            Ok(None)
        }
    }

    /// Delete a request, guarded on the current status.
    pub fn delete_if_status(&self, id: RequestId, expected: Status) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM requests WHERE id = ?1 AND status = ?2",
            params![id.to_string(), expected.as_str()],
        )?;
        Ok(deleted == 1)
    }

    /// Total number of requests.
    pub fn count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM requests", [], |row| row.get(0))?;
        Ok(n.unsigned_abs())
    }

    /// Number of requests currently in `status`.
    pub fn count_by_status(&self, status: Status) -> Result<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM requests WHERE status = ?1",
            params![status.as_str()],
            |row| row.get(0),
        )?;
        Ok(n.unsigned_abs())
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<DocumentRequest>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(decode_row).collect()
    }
}

fn decode_row(
    (id, owner_id, document_type, purpose, copies, status, created_at): (
        String,
        String,
        String,
        String,
        i64,
        String,
        String,
    ),
) -> Result<DocumentRequest> {
    Ok(DocumentRequest {
        id: id
            .parse()
            .map_err(|e| Error::Corrupt(format!("bad id: {e}")))?,
        owner_id,
        document_type: document_type
            .parse()
            .map_err(|e| Error::Corrupt(format!("bad document type: {e}")))?,
        purpose,
        number_of_copies: u8::try_from(copies)
            .map_err(|e| Error::Corrupt(format!("bad copy count: {e}")))?,
        status: status
            .parse()
            .map_err(|e| Error::Corrupt(format!("bad status: {e}")))?,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| Error::Corrupt(format!("bad timestamp: {e}")))?
            .with_timezone(&chrono::Utc),
    })
}

#[cfg(test)]
mod tests {
    use crate::DocumentType;

    use super::*;

    fn sample(owner: &str) -> DocumentRequest {
        DocumentRequest::new(owner, DocumentType::Transcript, "Job application", 2)
    }

    #[test]
    fn insert_then_find_roundtrip() {
        let store = RequestStore::in_memory().unwrap();
        let request = sample("s-1");
        store.insert(&request).unwrap();

        let loaded = store.find_by_id(request.id).unwrap().unwrap();
        assert_eq!(loaded.owner_id, "s-1");
        assert_eq!(loaded.document_type, DocumentType::Transcript);
        assert_eq!(loaded.number_of_copies, 2);
        assert_eq!(loaded.status, Status::Pending);
    }

    #[test]
    fn missing_id_is_none() {
        let store = RequestStore::in_memory().unwrap();
        assert!(store.find_by_id(RequestId::new()).unwrap().is_none());
    }

    #[test]
    fn find_by_owner_filters_and_orders_newest_first() {
        let store = RequestStore::in_memory().unwrap();
        let mut first = sample("s-1");
        first.created_at = chrono::Utc::now() - chrono::Duration::hours(1);
        let second = sample("s-1");
        let foreign = sample("s-2");
        store.insert(&first).unwrap();
        store.insert(&second).unwrap();
        store.insert(&foreign).unwrap();

        let mine = store.find_by_owner("s-1").unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, second.id);
        assert_eq!(mine[1].id, first.id);
    }

    #[test]
    fn find_all_sees_every_owner() {
        let store = RequestStore::in_memory().unwrap();
        store.insert(&sample("s-1")).unwrap();
        store.insert(&sample("s-2")).unwrap();
        assert_eq!(store.find_all().unwrap().len(), 2);
    }

    #[test]
    fn compare_and_update_applies_once() {
        let store = RequestStore::in_memory().unwrap();
        let request = sample("s-1");
        store.insert(&request).unwrap();

        assert!(
            store
                .compare_and_update_status(request.id, Status::Pending, Status::Approved)
                .unwrap()
        );
        // The precondition no longer holds; the write must not apply.
        assert!(
            !store
                .compare_and_update_status(request.id, Status::Pending, Status::Declined)
                .unwrap()
        );
        let loaded = store.find_by_id(request.id).unwrap().unwrap();
        assert_eq!(loaded.status, Status::Approved);
    }

    #[test]
    fn update_fields_keeps_absent_fields() {
        let store = RequestStore::in_memory().unwrap();
        let request = sample("s-1");
        store.insert(&request).unwrap();

        let patch = RequestPatch {
            purpose: Some("Scholarship".to_string()),
            ..RequestPatch::default()
        };
        let updated = store
            .update_fields_if_status(request.id, &patch, Status::Pending)
            .unwrap()
            .unwrap();
        assert_eq!(updated.purpose, "Scholarship");
        assert_eq!(updated.document_type, DocumentType::Transcript);
        assert_eq!(updated.number_of_copies, 2);
    }

    #[test]
    fn update_fields_refuses_wrong_status() {
        let store = RequestStore::in_memory().unwrap();
        let request = sample("s-1");
        store.insert(&request).unwrap();
        store
            .compare_and_update_status(request.id, Status::Pending, Status::Approved)
            .unwrap();

        let patch = RequestPatch {
            number_of_copies: Some(3),
            ..RequestPatch::default()
        };
        let updated = store
            .update_fields_if_status(request.id, &patch, Status::Pending)
            .unwrap();
        assert!(updated.is_none());
        let loaded = store.find_by_id(request.id).unwrap().unwrap();
        assert_eq!(loaded.number_of_copies, 2);
    }

    #[test]
    fn delete_is_guarded_on_status() {
        let store = RequestStore::in_memory().unwrap();
        let request = sample("s-1");
        store.insert(&request).unwrap();
        store
            .compare_and_update_status(request.id, Status::Pending, Status::Approved)
            .unwrap();

        assert!(!store.delete_if_status(request.id, Status::Pending).unwrap());
        assert!(store.find_by_id(request.id).unwrap().is_some());

        assert!(store.delete_if_status(request.id, Status::Approved).unwrap());
        assert!(store.find_by_id(request.id).unwrap().is_none());
    }

    #[test]
    fn counts_by_status() {
        let store = RequestStore::in_memory().unwrap();
        let a = sample("s-1");
        let b = sample("s-2");
        store.insert(&a).unwrap();
        store.insert(&b).unwrap();
        store
            .compare_and_update_status(a.id, Status::Pending, Status::Approved)
            .unwrap();

        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.count_by_status(Status::Pending).unwrap(), 1);
        assert_eq!(store.count_by_status(Status::Approved).unwrap(), 1);
    }
}
