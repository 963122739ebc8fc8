//! `MockConnector` — a test double for `ConnectorAction`.
//!
//! Useful in unit and integration tests where a real provider is either
//! unavailable or irrelevant.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::input::into_map;
use crate::runtime::{ActionContext, ConnectorAction};
use crate::ConnectorError;

/// Behaviour injected into `MockConnector` at construction time.
pub enum MockBehaviour {
    /// Return a specific JSON object.
    ReturnValue(Value),
    /// Always fail with a provider error.
    Fail(String),
    /// Fail the first `failures` calls, then return `value`.
    FailTimes {
        failures: usize,
        message: String,
        value: Value,
    },
    /// Never complete.
    Hang,
}

/// One call observed by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub idempotency_key: String,
    pub connection_id: Option<String>,
    pub input: Map<String, Value>,
}

/// A mock connector that records every call it receives and returns a
/// programmer-specified result.
pub struct MockConnector {
    name: String,
    pub behaviour: MockBehaviour,
    calls: Mutex<Vec<MockCall>>,
    seen: AtomicUsize,
}

impl MockConnector {
    fn with_behaviour(name: impl Into<String>, behaviour: MockBehaviour) -> Self {
        Self {
            name: name.into(),
            behaviour,
            calls: Mutex::new(Vec::new()),
            seen: AtomicUsize::new(0),
        }
    }

    /// Create a mock that always succeeds with the given object.
    pub fn returning(name: impl Into<String>, value: Value) -> Self {
        Self::with_behaviour(name, MockBehaviour::ReturnValue(value))
    }

    /// Create a mock that always fails.
    pub fn failing(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::with_behaviour(name, MockBehaviour::Fail(msg.into()))
    }

    /// Create a mock that fails `failures` times before succeeding.
    pub fn flaky(
        name: impl Into<String>,
        failures: usize,
        msg: impl Into<String>,
        value: Value,
    ) -> Self {
        Self::with_behaviour(
            name,
            MockBehaviour::FailTimes {
                failures,
                message: msg.into(),
                value,
            },
        )
    }

    /// Create a mock whose calls never complete.
    pub fn hanging(name: impl Into<String>) -> Self {
        Self::with_behaviour(name, MockBehaviour::Hang)
    }

    /// Every call seen so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of times this connector has been invoked.
    pub fn call_count(&self) -> usize {
        self.seen.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectorAction for MockConnector {
    async fn run(
        &self,
        ctx: &ActionContext,
        input: Map<String, Value>,
    ) -> Result<Map<String, Value>, ConnectorError> {
        let call_index = self.seen.fetch_add(1, Ordering::SeqCst);
        debug!(mock = %self.name, call = call_index + 1, "mock connector invoked");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockCall {
                idempotency_key: ctx.idempotency_key.clone(),
                connection_id: ctx.connection_id.clone(),
                input,
            });

        match &self.behaviour {
            MockBehaviour::ReturnValue(v) => Ok(into_map(v.clone())),
            MockBehaviour::Fail(msg) => Err(ConnectorError::Provider(msg.clone())),
            MockBehaviour::FailTimes {
                failures,
                message,
                value,
            } => {
                if call_index < *failures {
                    Err(ConnectorError::Provider(message.clone()))
                } else {
                    Ok(into_map(value.clone()))
                }
            }
            MockBehaviour::Hang => std::future::pending().await,
        }
    }
}
