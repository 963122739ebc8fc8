//! Core domain models for the workflow engine.
//!
//! These are the wire shapes exchanged with the control plane: camelCase
//! field names, upper-case statuses.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::EngineError;

// ---------------------------------------------------------------------------
// Definition
// ---------------------------------------------------------------------------

/// How a workflow is started. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDefinition {
    #[serde(rename = "type")]
    pub trigger_type: String,
    #[serde(default)]
    pub config: Value,
}

/// Timeout / retry / backoff for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// `None` means the connector call is unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Constant delay between attempts.
    #[serde(default)]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    1
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_attempts: default_max_attempts(),
            backoff_ms: 0,
        }
    }
}

impl RetryPolicy {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// A single connector operation within a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    /// Unique within the workflow; also the template root for this step's output.
    pub id: String,
    pub connector: String,
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    /// String leaves may contain `{{path}}` placeholders.
    #[serde(default)]
    pub input: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<RetryPolicy>,
}

impl StepDefinition {
    /// The declared policy, or a single attempt with no timeout.
    pub fn effective_policy(&self) -> RetryPolicy {
        self.policy.clone().unwrap_or_default()
    }
}

/// A complete workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    pub trigger: TriggerDefinition,
    pub steps: Vec<StepDefinition>,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Succeeded,
    Failed,
}

/// Lifecycle of a run: `PENDING -> RUNNING -> {SUCCEEDED | FAILED}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn can_transition_to(self, next: RunStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running)
                | (Self::Running, Self::Succeeded)
                | (Self::Running, Self::Failed)
        )
    }

    /// Checked transition, for callers keeping their own run records.
    pub fn transition(self, next: RunStatus) -> Result<RunStatus, EngineError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(EngineError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Running => write!(f, "RUNNING"),
            Self::Succeeded => write!(f, "SUCCEEDED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of one step. `attempt` is the attempt that ended the retry loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepExecutionResult {
    pub step_id: String,
    pub attempt: u32,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl StepExecutionResult {
    pub fn succeeded(step_id: impl Into<String>, attempt: u32, output: Map<String, Value>) -> Self {
        Self {
            step_id: step_id.into(),
            attempt,
            status: StepStatus::Succeeded,
            output: Some(output),
            error_message: None,
        }
    }

    pub fn failed(step_id: impl Into<String>, attempt: u32, message: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            attempt,
            status: StepStatus::Failed,
            output: None,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Succeeded
    }
}

/// The result of running a full workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionResult {
    pub run_id: String,
    pub status: RunStatus,
    /// One entry per attempted step, in execution order.
    pub logs: Vec<StepExecutionResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_policy_is_single_attempt_unbounded() {
        let step: StepDefinition = serde_json::from_value(json!({
            "id": "s1", "connector": "core.case", "operation": "create"
        }))
        .unwrap();
        assert_eq!(
            step.effective_policy(),
            RetryPolicy { timeout_ms: None, max_attempts: 1, backoff_ms: 0 }
        );
        assert!(step.input.is_empty());
    }

    #[test]
    fn step_reads_connection_id_from_camel_case() {
        let step: StepDefinition = serde_json::from_value(json!({
            "id": "s1",
            "connector": "ir.sms",
            "operation": "send",
            "connectionId": "conn-1"
        }))
        .unwrap();
        assert_eq!(step.connection_id.as_deref(), Some("conn-1"));
    }

    #[test]
    fn policy_reads_camel_case_fields() {
        let policy: RetryPolicy =
            serde_json::from_value(json!({ "timeoutMs": 10000, "maxAttempts": 2, "backoffMs": 50 }))
                .unwrap();
        assert_eq!(policy.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.backoff(), Duration::from_millis(50));
    }

    #[test]
    fn run_status_only_moves_forward() {
        assert!(RunStatus::Pending.can_transition_to(RunStatus::Running));
        assert!(RunStatus::Running.can_transition_to(RunStatus::Failed));
        assert!(!RunStatus::Pending.can_transition_to(RunStatus::Succeeded));
        assert!(!RunStatus::Succeeded.can_transition_to(RunStatus::Running));
        assert!(matches!(
            RunStatus::Failed.transition(RunStatus::Running),
            Err(EngineError::InvalidTransition { .. })
        ));
        assert!(RunStatus::Succeeded.is_terminal());
    }

    #[test]
    fn step_result_serializes_camel_case() {
        let result = StepExecutionResult::failed("s2", 3, "boom");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "stepId": "s2", "attempt": 3, "status": "FAILED", "errorMessage": "boom" })
        );
    }
}
