//! Optional invoice fields and their merge rules.

use serde::{Deserialize, Serialize};

/// Confirmation speed requested for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSpeed {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for TransactionSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionSpeed::High => write!(f, "high"),
            TransactionSpeed::Medium => write!(f, "medium"),
            TransactionSpeed::Low => write!(f, "low"),
        }
    }
}

/// Optional invoice fields.
///
/// Used twice: as the configured defaults in
/// [`Config::defaults`](super::Config::defaults) and as the per-call
/// overrides passed to invoice creation. A `Some` override always wins over
/// the default, even when it holds an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceOptions {
    /// API key for this call only. Never sent in the request body, and
    /// never taken from the configured defaults: the fallback key is always
    /// [`Config::api_key`](super::Config::api_key).
    pub api_key: Option<String>,
    pub currency: Option<String>,
    pub item_desc: Option<String>,
    pub item_code: Option<String>,
    pub notification_email: Option<String>,
    pub notification_url: Option<String>,
    pub redirect_url: Option<String>,
    pub physical: Option<bool>,
    pub full_notifications: Option<bool>,
    pub transaction_speed: Option<TransactionSpeed>,
    pub buyer_name: Option<String>,
    pub buyer_address1: Option<String>,
    pub buyer_address2: Option<String>,
    pub buyer_city: Option<String>,
    pub buyer_state: Option<String>,
    pub buyer_zip: Option<String>,
    pub buyer_email: Option<String>,
    pub buyer_phone: Option<String>,
}

fn pick<T: Clone>(value: Option<T>, fallback: &Option<T>) -> Option<T> {
    value.or_else(|| fallback.clone())
}

impl InvoiceOptions {
    /// Field-by-field merge: `self` wins where set, `defaults` fills the rest.
    /// `api_key` is the exception and comes from `self` only.
    pub fn merged_over(self, defaults: &InvoiceOptions) -> InvoiceOptions {
        InvoiceOptions {
            api_key: self.api_key,
            currency: pick(self.currency, &defaults.currency),
            item_desc: pick(self.item_desc, &defaults.item_desc),
            item_code: pick(self.item_code, &defaults.item_code),
            notification_email: pick(self.notification_email, &defaults.notification_email),
            notification_url: pick(self.notification_url, &defaults.notification_url),
            redirect_url: pick(self.redirect_url, &defaults.redirect_url),
            physical: pick(self.physical, &defaults.physical),
            full_notifications: pick(self.full_notifications, &defaults.full_notifications),
            transaction_speed: pick(self.transaction_speed, &defaults.transaction_speed),
            buyer_name: pick(self.buyer_name, &defaults.buyer_name),
            buyer_address1: pick(self.buyer_address1, &defaults.buyer_address1),
            buyer_address2: pick(self.buyer_address2, &defaults.buyer_address2),
            buyer_city: pick(self.buyer_city, &defaults.buyer_city),
            buyer_state: pick(self.buyer_state, &defaults.buyer_state),
            buyer_zip: pick(self.buyer_zip, &defaults.buyer_zip),
            buyer_email: pick(self.buyer_email, &defaults.buyer_email),
            buyer_phone: pick(self.buyer_phone, &defaults.buyer_phone),
        }
    }
}
