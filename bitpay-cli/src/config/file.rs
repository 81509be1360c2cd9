//! TOML file configuration structures.
//!
//! These structs directly map to the `bitpay.toml` file format.

use bitpay_sdk::config::{BodyEncoding, InvoiceOptions, default_api_url};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pos_data: PosDataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default values for the optional invoice fields.
    #[serde(default)]
    pub defaults: InvoiceOptions,
}

/// Provider access section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Merchant API key. May be left out and supplied through
    /// `BITPAY_API_KEY` instead.
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_api_url")]
    pub url: Url,
    #[serde(default)]
    pub body_encoding: BodyEncoding,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            url: default_api_url(),
            body_encoding: BodyEncoding::default(),
        }
    }
}

/// posData envelope section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosDataConfig {
    /// Attach and check the keyed hash.
    #[serde(default = "default_true")]
    pub verify: bool,
}

impl Default for PosDataConfig {
    fn default() -> Self {
        Self { verify: true }
    }
}

fn default_true() -> bool {
    true
}

/// Provider log file section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Log file path; empty or missing means `bplog.txt`.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitpay_sdk::TransactionSpeed;
    use bitpay_sdk::config::DEFAULT_API_URL;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[api]
key = "merchant-key"
url = "https://test.bitpay.com/api/"
body_encoding = "json"

[pos_data]
verify = false

[logging]
enabled = true
file = "logs/bplog.txt"

[defaults]
currency = "USD"
transaction_speed = "medium"
notification_url = "https://shop.example.com/ipn"
full_notifications = true
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.key, "merchant-key");
        assert_eq!(config.api.url.host_str(), Some("test.bitpay.com"));
        assert_eq!(config.api.body_encoding, BodyEncoding::Json);
        assert!(!config.pos_data.verify);
        assert!(config.logging.enabled);
        assert_eq!(config.logging.file, Some(PathBuf::from("logs/bplog.txt")));
        assert_eq!(config.defaults.currency.as_deref(), Some("USD"));
        assert_eq!(
            config.defaults.transaction_speed,
            Some(TransactionSpeed::Medium)
        );
        assert_eq!(config.defaults.full_notifications, Some(true));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.api.key.is_empty());
        assert_eq!(config.api.url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.api.body_encoding, BodyEncoding::Form);
        assert!(config.pos_data.verify);
        assert!(!config.logging.enabled);
        assert_eq!(config.defaults, InvoiceOptions::default());
    }
}
