//! HTTP client for the BitPay legacy invoice API.
//!
//! Gated behind the `client` cargo feature so applications that only verify
//! notifications do not pull in `reqwest`.

mod invoice;
mod transport;

pub use transport::{PLUGIN_INFO, PLUGIN_INFO_HEADER, basic_authorization};

use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::error::ClientError;
use crate::log_file::LogFile;

/// Typed HTTP client for the invoice API.
///
/// Every request authenticates with `Authorization: Basic base64(api_key)`
/// and identifies the library with [`PLUGIN_INFO_HEADER`]. Cloning is cheap;
/// clones share the configuration and the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BitPayClient {
    http: Client,
    config: Arc<Config>,
    log: LogFile,
}

impl BitPayClient {
    /// Create a new `BitPayClient`.
    ///
    /// The HTTP client follows redirects and keeps cookies across them.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;
        let log = LogFile::from_config(&config);
        Ok(Self {
            http,
            config: Arc::new(config),
            log,
        })
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn log_file(&self) -> &LogFile {
        &self.log
    }

    /// Append to the provider log when logging is enabled.
    async fn log_entry<T: serde::Serialize + ?Sized>(&self, contents: &T) -> Result<(), ClientError> {
        if self.config.use_logging {
            self.log.append(contents).await?;
        }
        Ok(())
    }
}
