//! Invoice request and response objects.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{Config, InvoiceOptions, TransactionSpeed};
use crate::error::ClientError;
use crate::objects::pos_data::PosEnvelope;

/// Body of `POST /invoice/`.
///
/// Only the fields the provider accepts exist here; everything else in the
/// merged options (the per-call API key, for one) never reaches the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<String>,
    #[serde(
        rename = "notificationURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_url: Option<String>,
    #[serde(rename = "redirectURL", default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// JSON text of the [`PosEnvelope`].
    pub pos_data: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_speed: Option<TransactionSpeed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_phone: Option<String>,
}

/// An invoice request ready to send, with the API key it must be sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInvoice {
    pub api_key: String,
    pub request: InvoiceRequest,
}

impl PreparedInvoice {
    /// Assemble the request body for invoice creation. Performs no I/O.
    ///
    /// `options` are merged over `config.defaults`. When `config.verify_pos`
    /// is set, the posData envelope carries the keyed hash of `pos_data`
    /// under the effective API key. Fails with a validation error when the
    /// envelope is longer than
    /// [`MAX_POS_DATA_LEN`](crate::objects::pos_data::MAX_POS_DATA_LEN).
    pub fn new(
        config: &Config,
        order_id: String,
        price: Decimal,
        pos_data: Value,
        options: InvoiceOptions,
    ) -> Result<Self, ClientError> {
        let options = options.merged_over(&config.defaults);
        let api_key = config
            .resolve_api_key(options.api_key.as_deref())
            .to_owned();

        let envelope = if config.verify_pos {
            PosEnvelope::signed(pos_data, &api_key)
        } else {
            PosEnvelope::new(pos_data)
        };
        let pos_data = envelope.encode()?;

        let request = InvoiceRequest {
            order_id,
            item_desc: options.item_desc,
            item_code: options.item_code,
            notification_email: options.notification_email,
            notification_url: options.notification_url,
            redirect_url: options.redirect_url,
            pos_data,
            price,
            currency: options.currency,
            physical: options.physical,
            full_notifications: options.full_notifications,
            transaction_speed: options.transaction_speed,
            buyer_name: options.buyer_name,
            buyer_address1: options.buyer_address1,
            buyer_address2: options.buyer_address2,
            buyer_city: options.buyer_city,
            buyer_state: options.buyer_state,
            buyer_zip: options.buyer_zip,
            buyer_email: options.buyer_email,
            buyer_phone: options.buyer_phone,
        };

        Ok(Self { api_key, request })
    }
}

/// Invoice status as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvoiceStatus {
    New,
    Paid,
    Confirmed,
    Complete,
    Expired,
    Invalid,
    Other(String),
}

impl InvoiceStatus {
    /// Paid and confirmed to the requested transaction speed.
    pub fn is_settled(&self) -> bool {
        matches!(self, InvoiceStatus::Confirmed | InvoiceStatus::Complete)
    }
}

impl From<&str> for InvoiceStatus {
    fn from(status: &str) -> Self {
        match status {
            "new" => InvoiceStatus::New,
            "paid" => InvoiceStatus::Paid,
            "confirmed" => InvoiceStatus::Confirmed,
            "complete" => InvoiceStatus::Complete,
            "expired" => InvoiceStatus::Expired,
            "invalid" => InvoiceStatus::Invalid,
            other => InvoiceStatus::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::New => write!(f, "new"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Confirmed => write!(f, "confirmed"),
            InvoiceStatus::Complete => write!(f, "complete"),
            InvoiceStatus::Expired => write!(f, "expired"),
            InvoiceStatus::Invalid => write!(f, "invalid"),
            InvoiceStatus::Other(status) => write!(f, "{status}"),
        }
    }
}

/// Invoice object returned by the provider, and the body of notifications.
///
/// The provider's JSON object is kept exactly as received (apart from the
/// unwrapped `posData`); the SDK enforces nothing on its fields. The typed
/// accessors return `None` when a field is absent or has an unexpected
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Invoice(Map<String, Value>);

impl Invoice {
    /// Convert a provider JSON body into an [`Invoice`].
    ///
    /// A body of the form `{"error": ...}` becomes
    /// [`ClientError::Provider`]; anything other than an object is
    /// [`ClientError::Malformed`].
    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        check_provider_error(&value)?;
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(ClientError::Malformed(format!(
                "expected an invoice object, got {other}"
            ))),
        }
    }

    /// Raw access to any provider field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(|v| v.as_str())
    }

    pub fn url(&self) -> Option<&str> {
        self.get("url").and_then(|v| v.as_str())
    }

    /// The merchant's posData value, already unwrapped from its envelope
    /// when returned by lookups and notification verification.
    pub fn pos_data(&self) -> Option<&Value> {
        self.get("posData")
    }

    pub fn status(&self) -> Option<InvoiceStatus> {
        self.get("status").and_then(|v| v.as_str()).map(InvoiceStatus::from)
    }

    pub fn currency(&self) -> Option<&str> {
        self.get("currency").and_then(|v| v.as_str())
    }

    pub fn price(&self) -> Option<Decimal> {
        self.decimal("price")
    }

    pub fn btc_price(&self) -> Option<Decimal> {
        self.decimal("btcPrice")
    }

    pub fn btc_paid(&self) -> Option<Decimal> {
        self.decimal("btcPaid")
    }

    pub fn rate(&self) -> Option<Decimal> {
        self.decimal("rate")
    }

    /// Milliseconds since the Unix epoch.
    pub fn invoice_time(&self) -> Option<i64> {
        self.integer("invoiceTime")
    }

    pub fn expiration_time(&self) -> Option<i64> {
        self.integer("expirationTime")
    }

    pub fn current_time(&self) -> Option<i64> {
        self.integer("currentTime")
    }

    /// `false` or a string such as `"paidOver"`.
    pub fn exception_status(&self) -> Option<&Value> {
        self.get("exceptionStatus")
    }

    // Numbers arrive either as JSON numbers or as strings.
    fn decimal(&self, field: &str) -> Option<Decimal> {
        match self.get(field)? {
            Value::String(s) => Decimal::from_str(s).ok(),
            Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            _ => None,
        }
    }

    fn integer(&self, field: &str) -> Option<i64> {
        match self.get(field)? {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }
}

/// Fail with [`ClientError::Provider`] when `value` is an error envelope.
pub(crate) fn check_provider_error(value: &Value) -> Result<(), ClientError> {
    match value.get("error") {
        Some(error) => Err(ClientError::Provider {
            error: error.clone(),
        }),
        None => Ok(()),
    }
}
