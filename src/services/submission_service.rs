use crate::dto::candidature_dto::{CandidatureFields, CandidatureSubmission, UploadedDocument};
use crate::error::{Error, Result};
use crate::models::candidature::{Candidature, NewCandidature};
use crate::services::{candidature_service::CandidatureService, upload_service::UploadService};
use validator::Validate;

/// Validates a submission and turns it into one stored candidature record.
/// Consent gates run before any file touches disk.
#[derive(Clone)]
pub struct SubmissionService {
    candidatures: CandidatureService,
    uploads: UploadService,
}

impl SubmissionService {
    pub fn new(candidatures: CandidatureService, uploads: UploadService) -> Self {
        Self {
            candidatures,
            uploads,
        }
    }

    pub async fn submit(
        &self,
        submission: CandidatureSubmission,
        source_ip: Option<String>,
    ) -> Result<Candidature> {
        let fields = CandidatureFields {
            full_name: required(submission.full_name, "full_name")?,
            email: required(submission.email, "email")?,
            spi_number: required(submission.spi_number, "spi_number")?,
            phone: required(submission.phone, "phone")?,
        };
        fields.validate()?;

        consent(
            submission.data_processing_consent,
            "data_processing_consent",
            "Vous devez accepter le traitement des données personnelles",
        )?;
        consent(
            submission.documents_validity_confirmed,
            "documents_validity_confirmed",
            "Vous devez confirmer la validité de vos documents",
        )?;

        let document_front = self.store_document(submission.document_front).await?;
        let document_back = self.store_document(submission.document_back).await?;
        let residence_proof = self.store_document(submission.residence_proof).await?;

        // If the INSERT fails, files written above stay behind as orphans.
        // Matches the original intake behavior; an offline sweep can reap them.
        self.candidatures
            .create(NewCandidature {
                full_name: fields.full_name,
                email: fields.email,
                spi_number: fields.spi_number,
                phone: fields.phone,
                motivation: submission.motivation.filter(|m| !m.is_empty()),
                document_front,
                document_back,
                residence_proof,
                source_ip,
            })
            .await
    }

    /// Stores one optional document. A disallowed extension does not fail the
    /// submission; the reference is simply left empty.
    async fn store_document(&self, document: Option<UploadedDocument>) -> Result<Option<String>> {
        let Some(document) = document else {
            return Ok(None);
        };
        match self.uploads.store(&document.original_name, &document.data).await {
            Ok(reference) => Ok(Some(reference)),
            Err(Error::UnsupportedFileType(ext)) => {
                tracing::warn!(
                    original_name = %document.original_name,
                    extension = %ext,
                    "skipping document with disallowed extension"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| Error::BadRequest(format!("Champ requis manquant: {}", name)))
}

fn consent(value: Option<String>, name: &str, message: &str) -> Result<()> {
    match value {
        None => Err(Error::BadRequest(format!("Champ requis manquant: {}", name))),
        Some(v) if v == "true" => Ok(()),
        Some(_) => Err(Error::BadRequest(message.to_string())),
    }
}
