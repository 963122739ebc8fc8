//! Engine-level error types.

use thiserror::Error;

use crate::models::RunStatus;

/// Errors produced by the workflow engine (definition checks + fatal dispatch).
///
/// Ordinary step failures are not errors: they are recorded in the step's
/// `errorMessage` and the run ends `FAILED`.
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Definition errors ------

    /// The definition is not structurally a workflow.
    #[error("invalid workflow definition: {0}")]
    InvalidDefinition(#[from] serde_json::Error),

    /// The workflow declares no steps.
    #[error("workflow has no steps")]
    EmptyWorkflow,

    /// A required string field is empty.
    #[error("{field} must not be empty{}", step_suffix(.step_id))]
    MissingField {
        field: &'static str,
        step_id: Option<String>,
    },

    /// Two or more steps share the same ID.
    #[error("duplicate step ID: '{0}'")]
    DuplicateStepId(String),

    /// A retry policy is out of bounds.
    #[error("step '{step_id}' has an invalid policy: {reason}")]
    InvalidPolicy { step_id: String, reason: String },

    // ------ Execution errors ------

    /// No connector handles the step's `(connector, operation)`; the run is aborted.
    #[error("UNSUPPORTED_CONNECTOR_OPERATION:{connector}:{operation}")]
    UnsupportedOperation {
        step_id: String,
        connector: String,
        operation: String,
        attempt: u32,
    },

    /// A run status moved backwards or skipped a state.
    #[error("invalid run transition {from} -> {to}")]
    InvalidTransition { from: RunStatus, to: RunStatus },
}

fn step_suffix(step_id: &Option<String>) -> String {
    match step_id {
        Some(id) => format!(" (step '{id}')"),
        None => String::new(),
    }
}
