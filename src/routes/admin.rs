use axum::{extract::State, response::Html};

use crate::dto::candidature_dto::AdminReport;
use crate::error::Result;
use crate::utils::report::render_admin_report;
use crate::AppState;

pub async fn admin_candidatures(State(state): State<AppState>) -> Result<Html<String>> {
    let candidatures = state.candidature_service.list().await?;
    let report = AdminReport::build(candidatures);
    Ok(Html(render_admin_report(&report)))
}
