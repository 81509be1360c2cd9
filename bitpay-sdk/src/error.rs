//! The single error type returned by every SDK operation.

use serde_json::Value;

/// Message returned when `request` is called with a blank URL or API key.
pub const BLANK_REQUEST: &str = "url or apiKey were blank.";

/// Message returned when the posData envelope exceeds the provider limit.
pub const POS_DATA_TOO_LONG: &str =
    "posData > 100 character limit. Are you using the posData hash?";

/// Message returned when a notification payload is absent or empty.
pub const NO_POST_DATA: &str = "No post data";

/// Message returned when a notification payload has no `posData` field.
pub const NO_POS_DATA: &str = "no posData";

/// Message returned when the posData hash does not verify.
pub const BAD_HASH: &str = "authentication failed (bad hash)";

/// Message returned by [`decode_response`](crate::notification::decode_response)
/// on empty input.
pub const DECODE_EXPECTS_STRING: &str = "decodeResponse expects a string parameter.";

/// Errors produced by the SDK.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A precondition failed before any I/O took place.
    #[error("validation error: {0}")]
    Validation(String),

    /// The posData envelope hash is missing or does not match.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Transport-level failure (DNS, TLS, connection reset, …).
    #[cfg(feature = "client")]
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A body that must be JSON could not be parsed. Carries the raw text.
    #[error("response is not valid json: {raw_body}")]
    Decode { raw_body: String },

    /// Valid JSON with the wrong shape (e.g. a broken posData envelope).
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The provider answered with an `{"error": ...}` envelope.
    #[error("provider error: {error}")]
    Provider { error: Value },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The provider log file could not be opened or written.
    #[error("log file error: {0}")]
    Log(#[from] std::io::Error),
}

impl ClientError {
    pub(crate) fn validation(reason: &str) -> Self {
        Self::Validation(reason.to_owned())
    }

    /// Whether the error was raised before any network or file I/O.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Authentication(_))
    }
}
