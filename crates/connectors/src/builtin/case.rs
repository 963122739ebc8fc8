//! `core.case` / `create` — opens a case record in-process.

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::input::{into_map, string_field};
use crate::runtime::{ActionContext, ConnectorAction};
use crate::ConnectorError;

#[derive(Debug, Clone, PartialEq)]
pub struct CaseInput {
    pub case_type: String,
    pub data: Value,
}

impl CaseInput {
    pub fn from_input(input: &Map<String, Value>) -> Result<Self, ConnectorError> {
        let case_type = string_field(input, "type");
        if case_type.is_empty() {
            return Err(ConnectorError::InvalidInput(
                "core.case create requires a non-empty `type`".into(),
            ));
        }
        let data = match input.get("data") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(other) => other.clone(),
        };
        Ok(Self { case_type, data })
    }
}

/// The case id is derived from the idempotency key, so a retried attempt
/// yields the same case.
#[derive(Debug, Default)]
pub struct CreateCase;

#[async_trait]
impl ConnectorAction for CreateCase {
    async fn run(
        &self,
        ctx: &ActionContext,
        input: Map<String, Value>,
    ) -> Result<Map<String, Value>, ConnectorError> {
        let input = CaseInput::from_input(&input)?;
        let output = json!({
            "id": format!("case_{}", ctx.idempotency_key),
            "type": input.case_type,
            "data": input.data,
            "status": "OPEN",
        });
        Ok(into_map(output))
    }
}
