//! Index (catalog home) endpoint with the per-session visit counter

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppResult, services::catalog::CatalogSummary};

/// Header carrying the visit-counter session id
pub const SESSION_HEADER: &str = "x-session-id";

/// Index view payload: catalog counts plus session visit count
#[derive(Serialize, ToSchema)]
pub struct IndexResponse {
    #[serde(flatten)]
    pub summary: CatalogSummary,
    /// Visits recorded for this session, including this one
    pub num_visits: i64,
    /// Session id to send back on the next visit
    pub session_id: String,
}

/// Catalog home: entity counts and the session visit counter. A session
/// is created on the first visit and kept alive by subsequent ones.
#[utoipa::path(
    get,
    path = "/",
    tag = "index",
    params(
        ("x-session-id" = Option<String>, Header, description = "Session id from a previous visit")
    ),
    responses(
        (status = 200, description = "Catalog summary", body = IndexResponse)
    )
)]
pub async fn index(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
) -> AppResult<Json<IndexResponse>> {
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let summary = state.services.catalog.summary().await?;
    let num_visits = state.services.sessions.record_visit(&session_id).await?;

    Ok(Json(IndexResponse {
        summary,
        num_visits,
        session_id,
    }))
}
