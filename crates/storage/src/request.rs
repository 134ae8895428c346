//! Document request record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a document request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// The fixed set of documents a student may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Transcript,
    #[serde(rename = "Certificate of Enrollment")]
    EnrollmentCertificate,
    #[serde(rename = "Good Moral")]
    GoodMoral,
    Diploma,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Transcript => "Transcript",
            DocumentType::EnrollmentCertificate => "Certificate of Enrollment",
            DocumentType::GoodMoral => "Good Moral",
            DocumentType::Diploma => "Diploma",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Transcript" => Ok(DocumentType::Transcript),
            "Certificate of Enrollment" => Ok(DocumentType::EnrollmentCertificate),
            "Good Moral" => Ok(DocumentType::GoodMoral),
            "Diploma" => Ok(DocumentType::Diploma),
            other => Err(format!("unknown document type: {other}")),
        }
    }
}

/// Where a request sits in its lifecycle.
///
/// `Declined` and `Ready` are terminal; the legal transitions are owned by
/// the lifecycle engine, and the store never changes a status except through
/// a guarded update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Approved,
    Declined,
    Ready,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Approved => "Approved",
            Status::Declined => "Declined",
            Status::Ready => "Ready",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Status::Pending),
            "Approved" => Ok(Status::Approved),
            "Declined" => Ok(Status::Declined),
            "Ready" => Ok(Status::Ready),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// One student's request for an official document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub id: RequestId,
    pub owner_id: String,
    pub document_type: DocumentType,
    pub purpose: String,
    pub number_of_copies: u8,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl DocumentRequest {
    /// Build a fresh record in the initial `Pending` state.
    pub fn new(
        owner_id: impl Into<String>,
        document_type: DocumentType,
        purpose: impl Into<String>,
        number_of_copies: u8,
    ) -> Self {
        Self {
            id: RequestId::new(),
            owner_id: owner_id.into(),
            document_type,
            purpose: purpose.into(),
            number_of_copies,
            status: Status::Pending,
            created_at: Utc::now(),
        }
    }
}

/// A partial update to a pending request.
///
/// Fields left as `None` retain their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestPatch {
    pub document_type: Option<DocumentType>,
    pub purpose: Option<String>,
    pub number_of_copies: Option<u8>,
}

impl RequestPatch {
    pub fn is_empty(&self) -> bool {
        self.document_type.is_none() && self.purpose.is_none() && self.number_of_copies.is_none()
    }
}
