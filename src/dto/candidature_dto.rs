use crate::models::candidature::Candidature;
use bytes::Bytes;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Internal names for the submission form fields. The public form was
/// originally shipped with French labels, so both spellings are accepted
/// and mapped onto the same field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FullName,
    Email,
    SpiNumber,
    Phone,
    Motivation,
    DataProcessingConsent,
    DocumentsValidityConfirmed,
    DocumentFront,
    DocumentBack,
    ResidenceProof,
}

impl FormField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "full_name" | "nom_complet" => Some(Self::FullName),
            "email" => Some(Self::Email),
            "spi_number" | "spi" => Some(Self::SpiNumber),
            "phone" | "telephone" => Some(Self::Phone),
            "motivation" => Some(Self::Motivation),
            "data_processing_consent" | "accepte_traitement_donnees" => {
                Some(Self::DataProcessingConsent)
            }
            "documents_validity_confirmed" | "confirme_validite_documents" => {
                Some(Self::DocumentsValidityConfirmed)
            }
            "document_front" | "photo_recto" => Some(Self::DocumentFront),
            "document_back" | "photo_verso" => Some(Self::DocumentBack),
            "residence_proof" | "justificatif_domicile" => Some(Self::ResidenceProof),
            _ => None,
        }
    }

    pub fn is_file(self) -> bool {
        matches!(
            self,
            Self::DocumentFront | Self::DocumentBack | Self::ResidenceProof
        )
    }
}

/// A file part lifted out of the multipart stream, still unvalidated.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub original_name: String,
    pub data: Bytes,
}

/// Typed view of one POSTed form, assembled at the HTTP boundary. Everything
/// is optional here; the submission service decides what is missing.
/// Consent values stay raw strings because the form sends the literal "true".
#[derive(Debug, Default)]
pub struct CandidatureSubmission {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub spi_number: Option<String>,
    pub phone: Option<String>,
    pub motivation: Option<String>,
    pub data_processing_consent: Option<String>,
    pub documents_validity_confirmed: Option<String>,
    pub document_front: Option<UploadedDocument>,
    pub document_back: Option<UploadedDocument>,
    pub residence_proof: Option<UploadedDocument>,
}

/// Required text fields after presence checks, validated for emptiness.
#[derive(Debug, Validate)]
pub struct CandidatureFields {
    #[validate(length(min = 1, message = "full_name must not be empty"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "spi_number must not be empty"))]
    pub spi_number: String,
    #[validate(length(min = 1, message = "phone must not be empty"))]
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub status: String,
    pub message: String,
    pub id: i64,
}

/// Structured data behind the admin report page. The HTML rendering lives in
/// `utils::report`; services only ever produce this.
#[derive(Debug, Serialize)]
pub struct AdminReport {
    pub candidatures: Vec<Candidature>,
    pub total: usize,
    pub complete_dossiers: usize,
    pub submitted_today: usize,
}

impl AdminReport {
    pub fn build(candidatures: Vec<Candidature>) -> Self {
        Self::build_for_date(candidatures, Local::now().date_naive())
    }

    /// "Today" is the server-local calendar date.
    pub fn build_for_date(candidatures: Vec<Candidature>, today: NaiveDate) -> Self {
        let total = candidatures.len();
        let complete_dossiers = candidatures
            .iter()
            .filter(|c| c.has_complete_documents())
            .count();
        let submitted_today = candidatures
            .iter()
            .filter(|c| c.submitted_at.with_timezone(&Local).date_naive() == today)
            .count();
        Self {
            candidatures,
            total,
            complete_dossiers,
            submitted_today,
        }
    }
}
