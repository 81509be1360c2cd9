//! Authenticated request/response plumbing.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use super::BitPayClient;
use crate::config::BodyEncoding;
use crate::error::{BLANK_REQUEST, ClientError};
use crate::notification::parse_body;

/// Header identifying the client library to the provider.
pub const PLUGIN_INFO_HEADER: &str = "X-BitPay-Plugin-Info";

/// Value of [`PLUGIN_INFO_HEADER`].
pub const PLUGIN_INFO: &str = concat!("rustlib", env!("CARGO_PKG_VERSION"));

/// `Basic base64(api_key)`.
///
/// The provider expects the bare key, without the `:` separator and empty
/// password of RFC 7617.
pub fn basic_authorization(api_key: &str) -> String {
    format!("Basic {}", fast32::base64::RFC4648.encode(api_key.as_bytes()))
}

impl BitPayClient {
    /// Send one authenticated request and parse the JSON response.
    ///
    /// `body` makes it a POST, otherwise a GET. A POST body is sent as
    /// `application/x-www-form-urlencoded` pairs of its top-level fields, or
    /// as JSON under [`BodyEncoding::Json`]. Blank `url` or `api_key`
    /// fail before any I/O. A response that is not JSON is returned as
    /// [`ClientError::Decode`] (and logged when logging is enabled). The
    /// status code is not inspected.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        url: &str,
        api_key: &str,
        body: Option<&B>,
    ) -> Result<Value, ClientError> {
        if url.trim().is_empty() || api_key.trim().is_empty() {
            return Err(ClientError::validation(BLANK_REQUEST));
        }
        let url = url::Url::parse(url)?;

        let builder = match body {
            Some(body) => match self.config.body_encoding {
                BodyEncoding::Form => self.http.post(url.clone()).form(body),
                BodyEncoding::Json => self.http.post(url.clone()).json(body),
            },
            None => self
                .http
                .get(url.clone())
                .header(CONTENT_TYPE, "application/json"),
        };

        tracing::debug!(%url, post = body.is_some(), "sending bitpay request");

        let resp = builder
            .header(AUTHORIZATION, basic_authorization(api_key))
            .header(PLUGIN_INFO_HEADER, PLUGIN_INFO)
            .send()
            .await?;
        let status = resp.status();
        let raw = resp.text().await?;

        match parse_body(&raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(%url, %status, "bitpay response is not json");
                self.log_entry(&format!("Error: {raw}")).await?;
                Err(err)
            }
        }
    }
}
