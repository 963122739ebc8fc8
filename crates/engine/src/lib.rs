//! `engine` crate — workflow step-execution engine.
//!
//! Flow for one run: trigger payload → [`ExecutionContext`] → for each step,
//! [`template`] resolves its input, [`StepExecutor`] calls the connector under
//! the step's retry policy, and the output is bound back under the step id.

pub mod context;
pub mod definition;
pub mod error;
pub mod executor;
pub mod models;
pub mod template;
pub mod workflow;

pub use context::ExecutionContext;
pub use definition::{parse_workflow, validate_workflow};
pub use error::EngineError;
pub use executor::{idempotency_key, StepExecutor};
pub use models::{
    RetryPolicy, RunStatus, StepDefinition, StepExecutionResult, StepStatus, TriggerDefinition,
    WorkflowDefinition, WorkflowExecutionResult,
};
pub use workflow::{execute_workflow, ExecuteRequest, WorkflowEngine};
