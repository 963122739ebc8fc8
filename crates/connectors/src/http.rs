//! Outbound HTTP for provider-backed connectors.
//!
//! Connectors talk to providers through [`HttpTransport`] so tests can swap
//! in a canned responder instead of hitting the network.

use async_trait::async_trait;
use serde_json::Value;

use crate::ConnectorError;

/// Status plus decoded JSON body. A body that is not JSON decodes to `Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` as `application/json`.
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, ConnectorError>;

    /// POST `form` as `application/x-www-form-urlencoded`.
    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<HttpResponse, ConnectorError>;
}

/// Default transport backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn decode(response: reqwest::Response) -> Result<HttpResponse, ConnectorError> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, ConnectorError> {
        let response = self.client.post(url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<HttpResponse, ConnectorError> {
        let response = self.client.post(url).form(form).send().await?;
        Self::decode(response).await
    }
}
