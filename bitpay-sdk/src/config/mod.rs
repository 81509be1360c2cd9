//! Configuration types for the BitPay client.
//!
//! A [`Config`] is built once by the embedding application and handed to
//! [`BitPayClient`](crate::client::BitPayClient). The SDK never mutates it.
//! Loading it from a file is left to the application; `bitpay-cli` reads a
//! TOML file.

mod options;

pub use options::{InvoiceOptions, TransactionSpeed};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Production endpoint of the legacy invoice API.
pub const DEFAULT_API_URL: &str = "https://bitpay.com/api/";

/// Log file used when none is configured.
pub const DEFAULT_LOG_FILE: &str = "bplog.txt";

/// How POST bodies are put on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// `application/x-www-form-urlencoded`, one pair per top-level field.
    #[default]
    Form,
    /// The JSON object itself, `application/json`.
    Json,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Merchant API key. Used both for HTTP authentication and as the HMAC
    /// key of the posData hash.
    pub api_key: String,
    /// Base URL of the API; endpoint paths are joined onto it.
    pub api_url: Url,
    /// Attach and check the posData hash.
    pub verify_pos: bool,
    /// Append requests and responses to the provider log file.
    pub use_logging: bool,
    /// Provider log file. `None` or an empty path means [`DEFAULT_LOG_FILE`].
    pub log_file: Option<PathBuf>,
    pub body_encoding: BodyEncoding,
    /// Defaults for the optional invoice fields.
    pub defaults: InvoiceOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            verify_pos: true,
            use_logging: false,
            log_file: None,
            body_encoding: BodyEncoding::default(),
            defaults: InvoiceOptions::default(),
        }
    }
}

/// [`DEFAULT_API_URL`] as a parsed [`Url`].
pub fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("valid default api url")
}

impl Config {
    /// Create a configuration with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_api_url(mut self, api_url: Url) -> Self {
        self.api_url = api_url;
        self
    }

    pub fn with_verify_pos(mut self, verify_pos: bool) -> Self {
        self.verify_pos = verify_pos;
        self
    }

    /// Enable provider logging to `log_file` (or [`DEFAULT_LOG_FILE`]).
    pub fn with_logging(mut self, log_file: Option<PathBuf>) -> Self {
        self.use_logging = true;
        self.log_file = log_file;
        self
    }

    pub fn with_body_encoding(mut self, body_encoding: BodyEncoding) -> Self {
        self.body_encoding = body_encoding;
        self
    }

    pub fn with_defaults(mut self, defaults: InvoiceOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Pick the per-call key when one is given and non-empty, otherwise the
    /// configured key.
    pub fn resolve_api_key<'a>(&'a self, api_key: Option<&'a str>) -> &'a str {
        match api_key {
            Some(key) if !key.is_empty() => key,
            _ => &self.api_key,
        }
    }

    /// The provider log file path.
    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => PathBuf::from(DEFAULT_LOG_FILE),
        }
    }

    /// `<api_url>invoice/`
    pub fn invoice_url(&self) -> Result<Url, url::ParseError> {
        self.api_url.join("invoice/")
    }

    /// `<api_url>invoice/<id>`, with the id percent-encoded.
    pub fn invoice_lookup_url(&self, invoice_id: &str) -> Result<Url, url::ParseError> {
        self.api_url
            .join(&format!("invoice/{}", urlencoding::encode(invoice_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::new("key");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert!(config.verify_pos);
        assert!(!config.use_logging);
        assert_eq!(config.body_encoding, BodyEncoding::Form);
        assert_eq!(config.log_path(), PathBuf::from("bplog.txt"));
    }

    #[test]
    fn test_log_path_falls_back_on_empty() {
        let config = Config::new("key").with_logging(Some(PathBuf::new()));
        assert!(config.use_logging);
        assert_eq!(config.log_path(), PathBuf::from(DEFAULT_LOG_FILE));

        let config = Config::new("key").with_logging(Some("logs/bitpay.log".into()));
        assert_eq!(config.log_path(), PathBuf::from("logs/bitpay.log"));
    }

    #[test]
    fn test_resolve_api_key() {
        let config = Config::new("configured");
        assert_eq!(config.resolve_api_key(None), "configured");
        assert_eq!(config.resolve_api_key(Some("")), "configured");
        assert_eq!(config.resolve_api_key(Some("per-call")), "per-call");
    }

    #[test]
    fn test_endpoint_urls() {
        let config = Config::new("key");
        assert_eq!(
            config.invoice_url().unwrap().as_str(),
            "https://bitpay.com/api/invoice/"
        );
        assert_eq!(
            config.invoice_lookup_url("Ab12Cd").unwrap().as_str(),
            "https://bitpay.com/api/invoice/Ab12Cd"
        );
        assert_eq!(
            config.invoice_lookup_url("a/b").unwrap().as_str(),
            "https://bitpay.com/api/invoice/a%2Fb"
        );
    }
}
