pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    candidature_service::CandidatureService, submission_service::SubmissionService,
    upload_service::UploadService,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub candidature_service: CandidatureService,
    pub submission_service: SubmissionService,
    pub upload_service: UploadService,
}

impl AppState {
    pub fn new(pool: SqlitePool, uploads_dir: impl Into<PathBuf>) -> Self {
        let candidature_service = CandidatureService::new(pool.clone());
        let upload_service = UploadService::new(uploads_dir);
        let submission_service =
            SubmissionService::new(candidature_service.clone(), upload_service.clone());

        Self {
            pool,
            candidature_service,
            submission_service,
            upload_service,
        }
    }
}

/// Builds the full application router: JSON API, admin report, upload
/// serving, plus the CORS / tracing / body-limit layers.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let uploads_dir = state.upload_service.upload_dir().to_path_buf();

    let api = Router::new()
        .route(
            "/api/candidatures",
            get(routes::candidature_routes::list_candidatures)
                .post(routes::candidature_routes::submit_candidature),
        )
        .route(
            "/api/candidatures/:id",
            get(routes::candidature_routes::get_candidature),
        )
        .route(
            "/api/admin/candidatures",
            get(routes::admin::admin_candidatures),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(api)
        .nest_service("/api/uploads", ServeDir::new(uploads_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
