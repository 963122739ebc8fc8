//! Step executor: one step, under its timeout / retry / backoff policy.
//!
//! 1. Derives the idempotency key `<runId>:<stepId>`, shared by every attempt.
//! 2. Re-resolves the step input against the run environment on each attempt.
//! 3. Races the connector call against the step timeout; expiry is a failed attempt.
//! 4. Sleeps the constant backoff between failed attempts.
//! 5. Unsupported `(connector, operation)` pairs abort immediately as
//!    [`EngineError::UnsupportedOperation`], without spending the retry budget.

use tracing::{error, info, instrument, warn};

use connectors::{ActionOutput, ActionRequest, ConnectorError, ConnectorRuntime};

use crate::context::ExecutionContext;
use crate::models::{RetryPolicy, StepDefinition, StepExecutionResult};
use crate::template;
use crate::EngineError;

/// Key passed unchanged to the connector on every attempt of a step.
pub fn idempotency_key(run_id: &str, step_id: &str) -> String {
    format!("{run_id}:{step_id}")
}

/// Borrows the shared connector runtime for the duration of a run.
pub struct StepExecutor<'a> {
    runtime: &'a dyn ConnectorRuntime,
}

impl<'a> StepExecutor<'a> {
    pub fn new(runtime: &'a dyn ConnectorRuntime) -> Self {
        Self { runtime }
    }

    /// Run `step` to a terminal result.
    ///
    /// # Errors
    /// Only [`EngineError::UnsupportedOperation`]; every other failure is
    /// captured in the returned result.
    #[instrument(skip(self, step, env), fields(step_id = %step.id, connector = %step.connector))]
    pub async fn execute(
        &self,
        step: &StepDefinition,
        env: &ExecutionContext,
        run_id: &str,
    ) -> Result<StepExecutionResult, EngineError> {
        let policy = step.effective_policy();
        let max_attempts = policy.max_attempts.max(1);
        let idempotency_key = idempotency_key(run_id, &step.id);

        let mut attempt = 1u32;
        loop {
            let input = template::resolve_map(&step.input, env);
            if attempt == 1 {
                let missing = template::unresolved_paths(&step.input, env);
                if !missing.is_empty() {
                    warn!(?missing, "step input references unresolved paths");
                }
            }

            let request = ActionRequest {
                connector: step.connector.clone(),
                operation: step.operation.clone(),
                connection_id: step.connection_id.clone(),
                input,
                idempotency_key: idempotency_key.clone(),
            };

            match self.call(request, &policy).await {
                Ok(output) => {
                    info!(attempt, "step succeeded");
                    return Ok(StepExecutionResult::succeeded(&step.id, attempt, output.output));
                }

                Err(err) if err.is_fatal() => {
                    error!(attempt, "{err}");
                    return Err(EngineError::UnsupportedOperation {
                        step_id: step.id.clone(),
                        connector: step.connector.clone(),
                        operation: step.operation.clone(),
                        attempt,
                    });
                }

                Err(err) if attempt >= max_attempts => {
                    error!(attempt, max_attempts, "step failed: {err}");
                    return Ok(StepExecutionResult::failed(&step.id, attempt, err.to_string()));
                }

                Err(err) => {
                    let delay = policy.backoff();
                    warn!(
                        "step '{}' failed (attempt {}/{}), retrying in {:?}: {}",
                        step.id, attempt, max_attempts, delay, err
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    async fn call(
        &self,
        request: ActionRequest,
        policy: &RetryPolicy,
    ) -> Result<ActionOutput, ConnectorError> {
        let call = self.runtime.run_action(request);
        let Some(limit) = policy.timeout() else {
            return call.await;
        };
        tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(ConnectorError::Timeout {
                timeout_ms: limit.as_millis() as u64,
            })
        })
    }
}
