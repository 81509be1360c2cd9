//! Keyed hash used to authenticate the posData envelope.
//!
//! The hash is `base64(HMAC-SHA256(key, data))` using the standard padded
//! alphabet. The API key is the HMAC key.
//!
//! Hash input for a posData value is built in two steps:
//!
//! 1. [`sanitize`] rebuilds the value with object keys in lexicographic
//!    order, so two processes holding the same logical value always produce
//!    the same bytes.
//! 2. [`canonical_string`] turns the sanitized value into text: a bare
//!    string hashes as itself, anything else as compact JSON.

use ring::hmac;
use serde_json::{Map, Value};

fn hmac_key(key: &str) -> hmac::Key {
    hmac::Key::new(hmac::HMAC_SHA256, key.as_bytes())
}

/// Compute `base64(HMAC-SHA256(key, data))`.
pub fn keyed_hash(data: &str, key: &str) -> String {
    let tag = hmac::sign(&hmac_key(key), data.as_bytes());
    fast32::base64::RFC4648.encode(tag.as_ref())
}

/// Check a base64 digest produced by [`keyed_hash`] in constant time.
///
/// Returns `false` for digests that are not valid base64.
pub fn verify_keyed_hash(data: &str, key: &str, claimed: &str) -> bool {
    let Ok(claimed) = fast32::base64::RFC4648.decode_str(claimed) else {
        return false;
    };
    hmac::verify(&hmac_key(key), data.as_bytes(), &claimed).is_ok()
}

/// Recursively rebuild a JSON value in canonical form.
///
/// Arrays keep their order; object keys are re-inserted in lexicographic
/// byte order so the serialized form does not depend on how the map was
/// populated.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.clone()),
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
            let mut out = Map::new();
            for (key, inner) in entries {
                out.insert(key.clone(), sanitize(inner));
            }
            Value::Object(out)
        }
        scalar => scalar.clone(),
    }
}

/// The exact text that is fed to the HMAC for a posData value.
pub fn canonical_string(value: &Value) -> String {
    match sanitize(value) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Hash a merchant posData value with the given API key.
pub fn pos_data_hash(pos_data: &Value, key: &str) -> String {
    keyed_hash(&canonical_string(pos_data), key)
}
