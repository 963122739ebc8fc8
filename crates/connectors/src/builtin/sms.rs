//! `ir.sms` / `send` — text messages through Kavenegar.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::config::SmsConfig;
use crate::http::HttpTransport;
use crate::input::{into_map, optional_string_field, string_field};
use crate::runtime::{ActionContext, ConnectorAction};
use crate::ConnectorError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.kavenegar.com/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsInput {
    pub to: String,
    pub message: String,
    pub sender: Option<String>,
}

impl SmsInput {
    pub fn from_input(input: &Map<String, Value>) -> Self {
        Self {
            to: string_field(input, "to"),
            message: string_field(input, "message"),
            sender: optional_string_field(input, "sender"),
        }
    }
}

pub struct SendSms {
    config: SmsConfig,
    transport: Arc<dyn HttpTransport>,
}

impl SendSms {
    pub fn new(config: SmsConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    fn mock_output(ctx: &ActionContext, input: &SmsInput) -> Map<String, Value> {
        into_map(json!({
            "provider": "mock",
            "messageId": format!("sms_{}", ctx.idempotency_key),
            "to": input.to,
        }))
    }
}

#[async_trait]
impl ConnectorAction for SendSms {
    async fn run(
        &self,
        ctx: &ActionContext,
        input: Map<String, Value>,
    ) -> Result<Map<String, Value>, ConnectorError> {
        let input = SmsInput::from_input(&input);

        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("no Kavenegar API key configured, using mock mode");
            return Ok(Self::mock_output(ctx, &input));
        };

        let base_url = self
            .config
            .api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL);
        let endpoint = format!("{base_url}/{api_key}/sms/send.json");

        let mut form = vec![
            ("receptor".to_owned(), input.to.clone()),
            ("message".to_owned(), input.message.clone()),
        ];
        if let Some(sender) = &input.sender {
            form.push(("sender".to_owned(), sender.clone()));
        }

        let response = self.transport.post_form(&endpoint, &form).await?;
        let status = response
            .body
            .pointer("/return/status")
            .and_then(Value::as_i64)
            .unwrap_or(i64::from(response.status));
        if status != 200 {
            return Err(ConnectorError::Provider(format!("KAVENEGAR_SEND_FAILED:{status}")));
        }

        let message_id = match response.body.pointer("/entries/0/messageid") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => format!("sms_{}", ctx.idempotency_key),
        };

        Ok(into_map(json!({
            "provider": "kavenegar",
            "messageId": message_id,
            "to": input.to,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::testing::{CannedTransport, Sent};

    fn ctx() -> ActionContext {
        ActionContext {
            idempotency_key: "r1:s2".into(),
            connection_id: None,
        }
    }

    fn input() -> Map<String, Value> {
        into_map(json!({ "to": "0912", "message": "hello" }))
    }

    #[tokio::test]
    async fn mock_mode_without_api_key() {
        let transport = Arc::new(CannedTransport::new(500, Value::Null));
        let sms = SendSms::new(SmsConfig::default(), transport.clone());

        let output = sms.run(&ctx(), input()).await.unwrap();
        assert_eq!(output["provider"], "mock");
        assert_eq!(output["messageId"], "sms_r1:s2");
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn mock_mode_accepts_missing_recipient() {
        let transport = Arc::new(CannedTransport::new(500, Value::Null));
        let sms = SendSms::new(SmsConfig::default(), transport);

        let output = sms
            .run(&ctx(), into_map(json!({ "message": "hello" })))
            .await
            .unwrap();
        assert_eq!(output["provider"], "mock");
        assert_eq!(output["messageId"], "sms_r1:s2");
        assert_eq!(output["to"], "");
    }

    #[tokio::test]
    async fn maps_kavenegar_success_payload() {
        let transport = Arc::new(CannedTransport::new(
            200,
            json!({ "return": { "status": 200, "message": "ok" }, "entries": [{ "messageid": 7788 }] }),
        ));
        let config = SmsConfig {
            api_key: Some("test-key".into()),
            api_base_url: Some("https://kavenegar.local/v1".into()),
        };
        let sms = SendSms::new(config, transport.clone());

        let output = sms.run(&ctx(), input()).await.unwrap();
        assert_eq!(output["provider"], "kavenegar");
        assert_eq!(output["messageId"], "7788");

        let sent = transport.sent();
        assert_eq!(
            sent,
            vec![Sent::Form {
                url: "https://kavenegar.local/v1/test-key/sms/send.json".into(),
                form: vec![
                    ("receptor".into(), "0912".into()),
                    ("message".into(), "hello".into()),
                ],
            }]
        );
    }

    #[tokio::test]
    async fn provider_failure_status_is_an_error() {
        let transport = Arc::new(CannedTransport::new(
            500,
            json!({ "return": { "status": 500, "message": "failed" }, "entries": [] }),
        ));
        let config = SmsConfig {
            api_key: Some("test-key".into()),
            api_base_url: None,
        };
        let sms = SendSms::new(config, transport);

        let err = sms.run(&ctx(), input()).await.unwrap_err();
        assert_eq!(err, ConnectorError::Provider("KAVENEGAR_SEND_FAILED:500".into()));
    }

    #[test]
    fn numeric_recipient_is_stringified() {
        let parsed = SmsInput::from_input(&into_map(json!({ "to": 912, "message": 5 })));
        assert_eq!(parsed.to, "912");
        assert_eq!(parsed.message, "5");
        assert_eq!(parsed.sender, None);
    }
}
