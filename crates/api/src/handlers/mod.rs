//! Request handlers and the state they share.

pub mod executions;
pub mod health;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use engine::{EngineError, WorkflowEngine};

/// Shared by every request; cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: WorkflowEngine,
}

impl AppState {
    pub fn new(engine: WorkflowEngine) -> Self {
        Self { engine }
    }
}

/// Errors a handler turns into a `400 {"error": ...}` response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "NOT_FOUND" })))
}
