//! # HTTP Handlers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/taxes          JSON TaxRequest    ──► TaxResponse            │
//! │  GET  /api/taxes          query TaxRequest   ──► TaxResponse            │
//! │  POST /api/rules/reload   re-read rule file  ──► RulesStatus            │
//! │  GET  /health             liveness + rules   ──► HealthResponse         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::dto::{HealthResponse, RulesStatus, TaxRequest, TaxResponse};
use crate::error::{ApiError, ErrorCode};
use crate::state::AppState;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// POST /api/taxes
pub async fn taxes_post(
    State(state): State<AppState>,
    body: Result<Json<TaxRequest>, JsonRejection>,
) -> Result<Json<TaxResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::validation(e.body_text()))?;
    compute_taxes(&state, request)
}

/// GET /api/taxes
pub async fn taxes_get(
    State(state): State<AppState>,
    query: Result<Query<TaxRequest>, QueryRejection>,
) -> Result<Json<TaxResponse>, ApiError> {
    let Query(request) = query.map_err(|e| ApiError::validation(e.body_text()))?;
    compute_taxes(&state, request)
}

fn compute_taxes(state: &AppState, request: TaxRequest) -> Result<Json<TaxResponse>, ApiError> {
    let ctx = request.into_context()?;
    let breakdown = state.lookup_service().lookup(&ctx)?;
    Ok(Json(TaxResponse::new(&ctx, &breakdown)))
}

/// POST /api/rules/reload
pub async fn reload_rules(State(state): State<AppState>) -> Result<Json<RulesStatus>, ApiError> {
    if !state.allow_reload {
        return Err(ApiError::new(
            ErrorCode::ReloadDisabled,
            "Rule reload is disabled on this server",
        ));
    }

    // File read and parse stay off the async workers
    let rules = Arc::clone(&state.rules);
    let snapshot = tokio::task::spawn_blocking(move || rules.reload())
        .await
        .map_err(|e| {
            error!(error = %e, "Rule reload task did not complete");
            ApiError::internal("Rule reload did not complete")
        })??;
    Ok(Json(RulesStatus::from_snapshot(&snapshot)))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        rules: RulesStatus::from_snapshot(&state.rules.current()),
    })
}

/// Tags every request with a fresh id, logs it, and echoes the id back.
pub async fn request_id(request: Request, next: Next) -> Response {
    let id = Uuid::new_v4();
    let span = info_span!(
        "request",
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let mut response = next.run(request).await;
        info!(status = response.status().as_u16(), "Request completed");
        if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
