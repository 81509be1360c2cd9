//! Client SDK for the BitPay legacy invoice API.
//!
//! The crate covers three operations against the provider:
//!
//! * creating an invoice ([`client::BitPayClient::create_invoice`]),
//! * fetching an invoice ([`client::BitPayClient::get_invoice`]),
//! * verifying a notification payload the merchant already received
//!   ([`notification::verify_notification`]).
//!
//! Merchant `posData` travels through the provider inside a small JSON
//! envelope that optionally carries an HMAC-SHA256 hash keyed with the API
//! key, see [`signature`] and [`objects::pos_data`].
//!
//! The HTTP client lives behind the `client` cargo feature (enabled by
//! default). Everything else is plain data and pure functions.

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod error;
pub mod log_file;
pub mod notification;
pub mod objects;
pub mod signature;

#[cfg(feature = "client")]
pub use client::BitPayClient;
pub use config::{BodyEncoding, Config, InvoiceOptions, TransactionSpeed};
pub use error::ClientError;
pub use notification::{decode_response, verify_notification};
pub use objects::invoice::{Invoice, InvoiceRequest, InvoiceStatus, PreparedInvoice};
pub use objects::pos_data::PosEnvelope;
