//! Notification verification and response decoding.
//!
//! Receiving the provider's notification request is the caller's job; these
//! helpers take the raw body the caller already has.

use serde_json::Value;

use crate::config::Config;
use crate::error::{ClientError, DECODE_EXPECTS_STRING, NO_POS_DATA, NO_POST_DATA};
use crate::objects::invoice::Invoice;
use crate::objects::pos_data::PosEnvelope;

/// Parse a raw JSON response body.
///
/// Absent or empty input is a validation error rather than a parse error.
pub fn decode_response(response: Option<&str>) -> Result<Value, ClientError> {
    let response = non_empty(response).ok_or_else(|| ClientError::validation(DECODE_EXPECTS_STRING))?;
    parse_body(response)
}

/// Verify a notification payload and return the invoice it describes.
///
/// * `api_key` – key the posData hash was made with; `None` or empty uses
///   `config.api_key`.
/// * `payload` – raw JSON body of the notification.
///
/// When `config.verify_pos` is set the envelope hash must match, otherwise
/// [`ClientError::Authentication`] is returned. On success the invoice's
/// `posData` holds the merchant's original value; every other field is
/// returned exactly as the provider sent it.
pub fn verify_notification(
    config: &Config,
    api_key: Option<&str>,
    payload: Option<&str>,
) -> Result<Invoice, ClientError> {
    let payload = non_empty(payload).ok_or_else(|| ClientError::validation(NO_POST_DATA))?;
    let mut notification = parse_body(payload)?;

    let envelope = match notification.get("posData") {
        Some(field) => PosEnvelope::from_field(field)?,
        None => return Err(ClientError::validation(NO_POS_DATA)),
    };

    if config.verify_pos {
        if let Err(err) = envelope.verify(config.resolve_api_key(api_key)) {
            tracing::warn!(
                invoice_id = notification.get("id").and_then(|id| id.as_str()),
                "notification posData hash mismatch"
            );
            return Err(err);
        }
    }

    notification["posData"] = envelope.pos_data;
    Invoice::from_value(notification)
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.filter(|s| !s.is_empty())
}

pub(crate) fn parse_body(raw: &str) -> Result<Value, ClientError> {
    serde_json::from_str(raw).map_err(|_| ClientError::Decode {
        raw_body: raw.to_owned(),
    })
}
