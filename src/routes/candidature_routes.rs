use axum::{
    extract::{ConnectInfo, Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::net::SocketAddr;

use crate::dto::candidature_dto::{
    CandidatureSubmission, FormField, SubmissionResponse, UploadedDocument,
};
use crate::error::{Error, Result};
use crate::models::candidature::Candidature;
use crate::AppState;

pub async fn submit_candidature(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut submission = CandidatureSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        let Some(form_field) = FormField::from_name(&field_name) else {
            tracing::debug!(field = %field_name, "ignoring unknown form field");
            continue;
        };

        if form_field.is_file() {
            let original_name = field.file_name().unwrap_or_default().to_string();
            if original_name.is_empty() {
                // Browsers send an empty file part when the input is left blank.
                continue;
            }
            let document = UploadedDocument {
                original_name,
                data: field.bytes().await?,
            };
            match form_field {
                FormField::DocumentFront => submission.document_front = Some(document),
                FormField::DocumentBack => submission.document_back = Some(document),
                FormField::ResidenceProof => submission.residence_proof = Some(document),
                _ => {}
            }
        } else {
            let value = field.text().await?;
            match form_field {
                FormField::FullName => submission.full_name = Some(value),
                FormField::Email => submission.email = Some(value),
                FormField::SpiNumber => submission.spi_number = Some(value),
                FormField::Phone => submission.phone = Some(value),
                FormField::Motivation => submission.motivation = Some(value),
                FormField::DataProcessingConsent => {
                    submission.data_processing_consent = Some(value)
                }
                FormField::DocumentsValidityConfirmed => {
                    submission.documents_validity_confirmed = Some(value)
                }
                _ => {}
            }
        }
    }

    let source_ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let candidature = state.submission_service.submit(submission, source_ip).await?;

    tracing::info!(id = candidature.id, "candidature accepted");
    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            status: "success".to_string(),
            message: "Candidature soumise avec succès!".to_string(),
            id: candidature.id,
        }),
    ))
}

pub async fn list_candidatures(State(state): State<AppState>) -> Result<Json<Vec<Candidature>>> {
    let candidatures = state.candidature_service.list().await?;
    Ok(Json(candidatures))
}

pub async fn get_candidature(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Candidature>> {
    state
        .candidature_service
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("Candidature {} not found", id)))
}

/// Takes the first hop of `x-forwarded-for` when present (the service runs
/// behind a proxy in production), falling back to the peer address.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return Some(first.to_string());
            }
        }
    }
    peer.map(|addr| addr.ip().to_string())
}
