//! `ir.payment` / `createInvoice` — payment requests through Zarinpal.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Number, Value};
use tracing::debug;

use crate::config::PaymentConfig;
use crate::http::HttpTransport;
use crate::input::{into_map, map_field, number_field, optional_string_field};
use crate::runtime::{ActionContext, ConnectorAction};
use crate::ConnectorError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.zarinpal.com";
pub const DEFAULT_CALLBACK_URL: &str = "https://localhost/callback";
pub const DEFAULT_DESCRIPTION: &str = "workflow payment request";

const SUCCESS_CODE: i64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInput {
    pub amount: Number,
    pub description: Option<String>,
    pub meta: Map<String, Value>,
}

impl PaymentInput {
    pub fn from_input(input: &Map<String, Value>) -> Self {
        Self {
            amount: number_field(input, "amount"),
            description: optional_string_field(input, "description"),
            meta: map_field(input, "meta"),
        }
    }
}

pub struct CreateInvoice {
    config: PaymentConfig,
    transport: Arc<dyn HttpTransport>,
}

impl CreateInvoice {
    pub fn new(config: PaymentConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }
}

#[async_trait]
impl ConnectorAction for CreateInvoice {
    async fn run(
        &self,
        ctx: &ActionContext,
        input: Map<String, Value>,
    ) -> Result<Map<String, Value>, ConnectorError> {
        let input = PaymentInput::from_input(&input);

        let Some(merchant_id) = self.config.merchant_id.as_deref() else {
            debug!("no Zarinpal merchant id configured, using mock mode");
            return Ok(into_map(json!({
                "provider": "mock",
                "invoiceId": format!("inv_{}", ctx.idempotency_key),
                "payUrl": format!("https://local.pay/{}", input.amount),
            })));
        };

        let base_url = self
            .config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL);
        let endpoint = format!("{base_url}/pg/v4/payment/request.json");
        let payload = json!({
            "merchant_id": merchant_id,
            "amount": input.amount,
            "callback_url": self.config.callback_url.as_deref().unwrap_or(DEFAULT_CALLBACK_URL),
            "description": input.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION),
            "metadata": input.meta,
        });

        let response = self.transport.post_json(&endpoint, &payload).await?;
        let body = &response.body;
        let code = body
            .pointer("/data/code")
            .and_then(Value::as_i64)
            .or_else(|| body.pointer("/errors/code").and_then(Value::as_i64))
            .unwrap_or(i64::from(response.status));
        if code != SUCCESS_CODE {
            return Err(ConnectorError::Provider(format!("ZARINPAL_REQUEST_FAILED:{code}")));
        }

        let authority = body
            .pointer("/data/authority")
            .and_then(Value::as_str)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ConnectorError::Provider("ZARINPAL_REQUEST_FAILED:NO_AUTHORITY".into()))?;
        let fee = body.pointer("/data/fee").cloned().unwrap_or(json!(0));

        Ok(into_map(json!({
            "provider": "zarinpal",
            "invoiceId": authority,
            "payUrl": format!("https://www.zarinpal.com/pg/StartPay/{authority}"),
            "fee": fee,
        })))
    }
}
