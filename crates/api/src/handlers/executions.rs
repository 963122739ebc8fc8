use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use engine::{ExecuteRequest, WorkflowExecutionResult};

use super::{ApiError, AppState};

/// Run a workflow synchronously and return its execution trace.
///
/// A run that ends `FAILED` is still a `200`; only an unreadable body or an
/// invalid definition is a `400`.
pub async fn execute(
    State(state): State<AppState>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<Json<WorkflowExecutionResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    info!(run_id = %request.run_id, "execute request received");

    let result = state.engine.execute_request(request).await?;
    Ok(Json(result))
}
