//! Explicit `(connector, operation)` dispatch table.
//!
//! Built once at process start and shared by reference with every run.
//! Unknown pairs fail with [`ConnectorError::UnsupportedOperation`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::builtin::{CreateCase, CreateInvoice, SendSms};
use crate::config::ConnectorConfig;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::runtime::{ActionContext, ActionOutput, ActionRequest, ConnectorAction, ConnectorRuntime};
use crate::ConnectorError;

type Key = (String, String);

#[derive(Default, Clone)]
pub struct ConnectorRegistry {
    handlers: HashMap<Key, Arc<dyn ConnectorAction>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `core.case`, `ir.sms` and `ir.payment` wired to a
    /// `reqwest` transport.
    pub fn builtin(config: ConnectorConfig) -> Self {
        Self::builtin_with_transport(config, Arc::new(ReqwestTransport::default()))
    }

    pub fn builtin_with_transport(
        config: ConnectorConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self::new()
            .with("core.case", "create", Arc::new(CreateCase))
            .with(
                "ir.sms",
                "send",
                Arc::new(SendSms::new(config.sms, transport.clone())),
            )
            .with(
                "ir.payment",
                "createInvoice",
                Arc::new(CreateInvoice::new(config.payment, transport)),
            )
    }

    /// Register (or replace) the handler for `connector`/`operation`.
    pub fn register(
        &mut self,
        connector: impl Into<String>,
        operation: impl Into<String>,
        action: Arc<dyn ConnectorAction>,
    ) {
        self.handlers
            .insert((connector.into(), operation.into()), action);
    }

    pub fn with(
        mut self,
        connector: impl Into<String>,
        operation: impl Into<String>,
        action: Arc<dyn ConnectorAction>,
    ) -> Self {
        self.register(connector, operation, action);
        self
    }

    pub fn get(&self, connector: &str, operation: &str) -> Option<&Arc<dyn ConnectorAction>> {
        self.handlers
            .get(&(connector.to_owned(), operation.to_owned()))
    }

    /// Registered pairs, sorted.
    pub fn operations(&self) -> Vec<(String, String)> {
        let mut keys: Vec<Key> = self.handlers.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("operations", &self.operations())
            .finish()
    }
}

#[async_trait]
impl ConnectorRuntime for ConnectorRegistry {
    async fn run_action(&self, request: ActionRequest) -> Result<ActionOutput, ConnectorError> {
        let action = self
            .get(&request.connector, &request.operation)
            .ok_or_else(|| ConnectorError::unsupported(&request.connector, &request.operation))?;

        debug!(
            connector = %request.connector,
            operation = %request.operation,
            idempotency_key = %request.idempotency_key,
            "dispatching connector action"
        );

        let ctx = ActionContext {
            idempotency_key: request.idempotency_key,
            connection_id: request.connection_id,
        };
        let output = action.run(&ctx, request.input).await?;
        Ok(ActionOutput::new(output))
    }
}
