//! `connectors` crate — the Connector Dispatch Contract and built-in connectors.
//!
//! The engine only ever sees [`ConnectorRuntime`]. [`ConnectorRegistry`] is the
//! standard implementation: an explicit `(connector, operation)` table of
//! [`ConnectorAction`] capability objects.

pub mod builtin;
pub mod config;
pub mod error;
pub mod http;
pub mod input;
pub mod mock;
pub mod registry;
pub mod runtime;

pub use config::{ConnectorConfig, PaymentConfig, SmsConfig};
pub use error::ConnectorError;
pub use registry::ConnectorRegistry;
pub use runtime::{ActionContext, ActionOutput, ActionRequest, ConnectorAction, ConnectorRuntime};
