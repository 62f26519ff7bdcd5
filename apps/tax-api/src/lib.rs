//! # cess-api: HTTP Endpoint for the Cess Engine
//!
//! ## API Surface
//!
//! | Route                     | Handler                     |
//! |---------------------------|-----------------------------|
//! | `POST /api/taxes`         | [`routes::taxes_post`]      |
//! | `GET /api/taxes`          | [`routes::taxes_get`]       |
//! | `POST /api/rules/reload`  | [`routes::reload_rules`]    |
//! | `GET /health`             | [`routes::health`]          |
//!
//! Every request passes through [`routes::request_id`], which opens a
//! tracing span carrying a fresh `request_id`.

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/taxes", get(routes::taxes_get).post(routes::taxes_post))
        .route("/api/rules/reload", post(routes::reload_rules))
        .route("/health", get(routes::health))
        .layer(from_fn(routes::request_id))
        .with_state(state)
}
