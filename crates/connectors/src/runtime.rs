//! The Connector Dispatch Contract — what the engine calls to run one step.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ConnectorError;

/// A single connector invocation, as issued by the step executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub connector: String,
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    /// Fully resolved step input.
    pub input: Map<String, Value>,
    /// `<runId>:<stepId>`, identical across every attempt of the same step.
    pub idempotency_key: String,
}

/// The value a connector produced for a successful call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionOutput {
    pub output: Map<String, Value>,
}

impl ActionOutput {
    pub fn new(output: Map<String, Value>) -> Self {
        Self { output }
    }
}

/// Routes a request to whatever performs the side effect.
///
/// Implementations are shared across concurrent runs and must not keep
/// per-run mutable state.
#[async_trait]
pub trait ConnectorRuntime: Send + Sync {
    async fn run_action(&self, request: ActionRequest) -> Result<ActionOutput, ConnectorError>;
}

/// Everything a single connector operation gets besides its input.
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub idempotency_key: String,
    pub connection_id: Option<String>,
}

/// One `(connector, operation)` capability held by the registry.
#[async_trait]
pub trait ConnectorAction: Send + Sync {
    async fn run(
        &self,
        ctx: &ActionContext,
        input: Map<String, Value>,
    ) -> Result<Map<String, Value>, ConnectorError>;
}
