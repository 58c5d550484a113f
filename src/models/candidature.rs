use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One submitted application. Immutable after creation: there is no update
/// or delete path anywhere in the crate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidature {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub spi_number: String,
    pub phone: String,
    pub motivation: Option<String>,
    pub document_front: Option<String>,
    pub document_back: Option<String>,
    pub residence_proof: Option<String>,
    pub data_processing_consent: bool,
    pub documents_validity_confirmed: bool,
    pub submitted_at: DateTime<Utc>,
    pub source_ip: Option<String>,
}

impl Candidature {
    /// All three document references are present.
    pub fn has_complete_documents(&self) -> bool {
        self.document_front.is_some()
            && self.document_back.is_some()
            && self.residence_proof.is_some()
    }
}

/// Insert payload for a validated submission. Consent flags are not carried
/// here: a record only exists because both were already checked.
#[derive(Debug, Clone)]
pub struct NewCandidature {
    pub full_name: String,
    pub email: String,
    pub spi_number: String,
    pub phone: String,
    pub motivation: Option<String>,
    pub document_front: Option<String>,
    pub document_back: Option<String>,
    pub residence_proof: Option<String>,
    pub source_ip: Option<String>,
}
