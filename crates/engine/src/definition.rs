//! Workflow definition checks — run these before executing an untrusted definition.
//!
//! Rules enforced:
//! 1. The workflow has a name and at least one step.
//! 2. Every step has a non-empty `id`, `connector` and `operation`.
//! 3. Step IDs are unique within the workflow.
//! 4. `maxAttempts` is at least 1.
//!
//! The engine itself trusts its input; this is the boundary check used by the
//! runner service and the CLI.

use std::collections::HashSet;

use serde_json::Value;

use crate::models::WorkflowDefinition;
use crate::EngineError;

/// Deserialize `raw` and validate the result.
///
/// # Errors
/// [`EngineError::InvalidDefinition`] when `raw` has the wrong shape, otherwise
/// whatever [`validate_workflow`] reports.
pub fn parse_workflow(raw: Value) -> Result<WorkflowDefinition, EngineError> {
    let workflow: WorkflowDefinition = serde_json::from_value(raw)?;
    validate_workflow(&workflow)?;
    Ok(workflow)
}

/// Validate an already deserialized workflow.
///
/// # Errors
/// - [`EngineError::MissingField`] for an empty name, id, connector or operation.
/// - [`EngineError::EmptyWorkflow`] if there are no steps.
/// - [`EngineError::DuplicateStepId`] if two steps share an ID.
/// - [`EngineError::InvalidPolicy`] if `maxAttempts` is 0.
pub fn validate_workflow(workflow: &WorkflowDefinition) -> Result<(), EngineError> {
    // -----------------------------------------------------------------------
    // 1. Workflow-level fields
    // -----------------------------------------------------------------------
    if workflow.name.trim().is_empty() {
        return Err(EngineError::MissingField {
            field: "name",
            step_id: None,
        });
    }
    if workflow.steps.is_empty() {
        return Err(EngineError::EmptyWorkflow);
    }

    let mut seen_ids: HashSet<&str> = HashSet::new();
    for step in &workflow.steps {
        // -------------------------------------------------------------------
        // 2. Step fields
        // -------------------------------------------------------------------
        if step.id.trim().is_empty() {
            return Err(EngineError::MissingField {
                field: "id",
                step_id: None,
            });
        }
        for (field, value) in [("connector", &step.connector), ("operation", &step.operation)] {
            if value.trim().is_empty() {
                return Err(EngineError::MissingField {
                    field,
                    step_id: Some(step.id.clone()),
                });
            }
        }

        // -------------------------------------------------------------------
        // 3. Unique IDs
        // -------------------------------------------------------------------
        if !seen_ids.insert(step.id.as_str()) {
            return Err(EngineError::DuplicateStepId(step.id.clone()));
        }

        // -------------------------------------------------------------------
        // 4. Policy bounds
        // -------------------------------------------------------------------
        if let Some(policy) = &step.policy {
            if policy.max_attempts == 0 {
                return Err(EngineError::InvalidPolicy {
                    step_id: step.id.clone(),
                    reason: "maxAttempts must be at least 1".into(),
                });
            }
        }
    }

    Ok(())
}

/// Step IDs in execution order.
pub fn step_order(workflow: &WorkflowDefinition) -> Vec<&str> {
    workflow.steps.iter().map(|s| s.id.as_str()).collect()
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(id: &str) -> Value {
        json!({ "id": id, "connector": "core.case", "operation": "create", "input": {} })
    }

    fn workflow(steps: Vec<Value>) -> Value {
        json!({
            "name": "Order -> Invoice -> SMS",
            "trigger": { "type": "core.form.submit", "config": { "formId": "order_form_1" } },
            "steps": steps,
        })
    }

    #[test]
    fn valid_workflow_parses_in_declared_order() {
        let parsed = parse_workflow(workflow(vec![step("s1"), step("s2"), step("s3")]))
            .expect("should be valid");
        assert_eq!(step_order(&parsed), vec!["s1", "s2", "s3"]);
        assert_eq!(parsed.trigger.trigger_type, "core.form.submit");
    }

    #[test]
    fn wrong_shape_is_rejected() {
        assert!(matches!(
            parse_workflow(json!({ "name": "x", "steps": "nope" })),
            Err(EngineError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn duplicate_step_id_is_rejected() {
        assert!(matches!(
            parse_workflow(workflow(vec![step("a"), step("a")])),
            Err(EngineError::DuplicateStepId(id)) if id == "a"
        ));
    }

    #[test]
    fn empty_workflow_is_rejected() {
        assert!(matches!(
            parse_workflow(workflow(vec![])),
            Err(EngineError::EmptyWorkflow)
        ));
    }

    #[test]
    fn blank_connector_is_rejected() {
        let bad = json!({ "id": "s1", "connector": " ", "operation": "create" });
        let err = parse_workflow(workflow(vec![bad])).unwrap_err();
        assert!(matches!(err, EngineError::MissingField { field: "connector", .. }));
        assert_eq!(err.to_string(), "connector must not be empty (step 's1')");
    }

    #[test]
    fn zero_max_attempts_is_rejected() {
        let mut bad = step("s1");
        bad["policy"] = json!({ "maxAttempts": 0 });
        assert!(matches!(
            parse_workflow(workflow(vec![bad])),
            Err(EngineError::InvalidPolicy { step_id, .. }) if step_id == "s1"
        ));
    }
}
