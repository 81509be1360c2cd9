//! The posData envelope.
//!
//! The merchant's opaque value is wrapped as
//! `{"posData": <value>, "hash": <base64 hmac>}` and the JSON text of that
//! object is sent as the invoice's `posData` field. The provider echoes the
//! text back verbatim on lookups and notifications.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BAD_HASH, ClientError, POS_DATA_TOO_LONG};
use crate::signature::{canonical_string, pos_data_hash, verify_keyed_hash};

/// Maximum length, in characters, of the serialized envelope.
///
/// Measured on compact `serde_json` output: no whitespace, non-ASCII left
/// unescaped. A signed envelope spends 68 characters on framing and the
/// hash, so a string posData can be at most 32 characters long.
pub const MAX_POS_DATA_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosEnvelope {
    #[serde(rename = "posData")]
    pub pos_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl PosEnvelope {
    /// An envelope without a hash.
    pub fn new(pos_data: Value) -> Self {
        Self {
            pos_data,
            hash: None,
        }
    }

    /// An envelope carrying the keyed hash of `pos_data`.
    pub fn signed(pos_data: Value, key: &str) -> Self {
        let hash = pos_data_hash(&pos_data, key);
        Self {
            pos_data,
            hash: Some(hash),
        }
    }

    /// Serialize to the compact JSON text sent to the provider, enforcing
    /// [`MAX_POS_DATA_LEN`].
    pub fn encode(&self) -> Result<String, ClientError> {
        let json = serde_json::to_string(self)?;
        if json.chars().count() > MAX_POS_DATA_LEN {
            return Err(ClientError::validation(POS_DATA_TOO_LONG));
        }
        Ok(json)
    }

    /// Parse the `posData` field of a provider object.
    ///
    /// The field must be a string holding the envelope JSON.
    pub fn from_field(field: &Value) -> Result<Self, ClientError> {
        let Value::String(raw) = field else {
            return Err(ClientError::Malformed(
                "posData is not an encoded envelope".to_owned(),
            ));
        };
        serde_json::from_str(raw)
            .map_err(|e| ClientError::Malformed(format!("posData envelope: {e}")))
    }

    /// Check the envelope hash against `key`.
    pub fn verify(&self, key: &str) -> Result<(), ClientError> {
        let verified = self.hash.as_deref().is_some_and(|claimed| {
            verify_keyed_hash(&canonical_string(&self.pos_data), key, claimed)
        });
        if verified {
            Ok(())
        } else {
            Err(ClientError::Authentication(BAD_HASH.to_owned()))
        }
    }
}
