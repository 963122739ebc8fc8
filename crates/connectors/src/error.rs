//! Connector-level error type.

use thiserror::Error;

/// Errors returned by a connector invocation.
///
/// The step executor uses the variant to decide retry behaviour:
/// - `UnsupportedOperation` — fatal; the run is aborted without retrying.
/// - everything else        — transient; retried up to the step's `maxAttempts`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// No handler is registered for the `(connector, operation)` pair.
    #[error("UNSUPPORTED_CONNECTOR_OPERATION:{connector}:{operation}")]
    UnsupportedOperation { connector: String, operation: String },

    /// The resolved input could not be converted into the connector's typed input.
    #[error("invalid connector input: {0}")]
    InvalidInput(String),

    /// The provider rejected the request. The message is the provider error code.
    #[error("{0}")]
    Provider(String),

    /// The HTTP call itself failed (connect, TLS, body decode, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The call did not complete within the step's timeout.
    #[error("connector call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl ConnectorError {
    pub fn unsupported(connector: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            connector: connector.into(),
            operation: operation.into(),
        }
    }

    /// Fatal errors abort the run and are never retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_operation_renders_error_code() {
        let err = ConnectorError::unsupported("ir.fax", "send");
        assert_eq!(err.to_string(), "UNSUPPORTED_CONNECTOR_OPERATION:ir.fax:send");
        assert!(err.is_fatal());
    }

    #[test]
    fn provider_errors_are_transient() {
        let err = ConnectorError::Provider("KAVENEGAR_SEND_FAILED:500".into());
        assert_eq!(err.to_string(), "KAVENEGAR_SEND_FAILED:500");
        assert!(!err.is_fatal());
        assert!(!ConnectorError::Timeout { timeout_ms: 10 }.is_fatal());
    }
}
