//! Workflow engine: runs the steps of one workflow in declared order.
//!
//! The run environment starts as `{ trigger }` and gains `<stepId>.output`
//! after each succeeded step. The first failed step ends the run; steps that
//! already succeeded are not compensated.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, instrument};

use connectors::ConnectorRuntime;

use crate::context::ExecutionContext;
use crate::definition::parse_workflow;
use crate::executor::StepExecutor;
use crate::models::{RunStatus, StepExecutionResult, WorkflowDefinition, WorkflowExecutionResult};
use crate::EngineError;

/// Execute `workflow` once for `run_id`.
///
/// Never fails: step errors, including an unsupported connector operation,
/// end up in the returned logs with the run marked `FAILED`. Holds no state
/// between calls, so concurrent runs with different ids are independent.
#[instrument(skip(trigger, workflow, runtime), fields(workflow = %workflow.name, steps = workflow.steps.len()))]
pub async fn execute_workflow(
    run_id: &str,
    trigger: Map<String, Value>,
    workflow: &WorkflowDefinition,
    runtime: &dyn ConnectorRuntime,
) -> WorkflowExecutionResult {
    let started_at = Utc::now();
    let mut status = RunStatus::Pending;
    advance(&mut status, RunStatus::Running);
    info!("run started");

    let executor = StepExecutor::new(runtime);
    let mut env = ExecutionContext::new(trigger);
    let mut logs: Vec<StepExecutionResult> = Vec::with_capacity(workflow.steps.len());
    let mut failed = false;

    for step in &workflow.steps {
        let result = match executor.execute(step, &env, run_id).await {
            Ok(result) => result,
            Err(fatal) => {
                let attempt = match &fatal {
                    EngineError::UnsupportedOperation { attempt, .. } => *attempt,
                    _ => 1,
                };
                error!("run aborted at step '{}': {}", step.id, fatal);
                StepExecutionResult::failed(&step.id, attempt, fatal.to_string())
            }
        };

        let succeeded = result.is_success();
        if let (true, Some(output)) = (succeeded, &result.output) {
            env.bind_step_output(&step.id, output.clone());
        }
        logs.push(result);

        if !succeeded {
            failed = true;
            break;
        }
    }

    let outcome = if failed {
        RunStatus::Failed
    } else {
        RunStatus::Succeeded
    };
    advance(&mut status, outcome);
    info!(%status, attempted = logs.len(), "run finished");

    WorkflowExecutionResult {
        run_id: run_id.to_owned(),
        status,
        logs,
        started_at,
        finished_at: Utc::now(),
    }
}

fn advance(status: &mut RunStatus, next: RunStatus) {
    debug_assert!(status.can_transition_to(next), "{status} -> {next}");
    *status = next;
}

/// Body of a runner `execute` call: a run id, the trigger payload and the
/// raw, not yet validated, workflow definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub run_id: String,
    #[serde(default)]
    pub trigger: Map<String, Value>,
    pub dsl_json: Value,
}

/// Owns the connector runtime shared by every run of this process.
#[derive(Clone)]
pub struct WorkflowEngine {
    runtime: Arc<dyn ConnectorRuntime>,
}

impl WorkflowEngine {
    pub fn new(runtime: Arc<dyn ConnectorRuntime>) -> Self {
        Self { runtime }
    }

    /// Run an already validated definition. See [`execute_workflow`].
    pub async fn execute(
        &self,
        run_id: &str,
        trigger: Map<String, Value>,
        workflow: &WorkflowDefinition,
    ) -> WorkflowExecutionResult {
        execute_workflow(run_id, trigger, workflow, self.runtime.as_ref()).await
    }

    /// Parse and validate `request.dsl_json`, then run it.
    ///
    /// # Errors
    /// Returns a definition error when the workflow is malformed; nothing is
    /// executed in that case.
    pub async fn execute_request(
        &self,
        request: ExecuteRequest,
    ) -> Result<WorkflowExecutionResult, EngineError> {
        let workflow = parse_workflow(request.dsl_json)?;
        Ok(self.execute(&request.run_id, request.trigger, &workflow).await)
    }
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine").finish_non_exhaustive()
    }
}
