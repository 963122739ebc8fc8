//! Provider credentials and endpoints for the built-in connectors.
//!
//! A missing credential switches the connector into its deterministic mock
//! mode. The library never reads the process environment; the binary maps its
//! flags (and their env fallbacks) onto these structs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
}

/// Kavenegar settings for `ir.sms`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmsConfig {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
}

/// Zarinpal settings for `ir.payment`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub merchant_id: Option<String>,
    pub callback_url: Option<String>,
    pub api_base_url: Option<String>,
}
