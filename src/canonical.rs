//! Deterministic JSON encoding.
//!
//! Every place this crate signs or hashes a JSON structure (entry content, signing data) must
//! produce byte-identical output across implementations. [`serde_json_canonicalizer`] gives us
//! RFC 8785-style canonicalization (sorted object keys, no insignificant whitespace) for free
//! rather than hand-rolling a sorted-key encoder.

use serde::Serialize;

use crate::error::ClientError;

/// Serializes `value` to its canonical JSON byte form.
pub fn to_canonical_vec<T: Serialize>(value: &T) -> Result<Vec<u8>, ClientError> {
    serde_json_canonicalizer::to_vec(value)
        .map_err(|err| ClientError::Other(format!("canonical JSON encoding failed: {err}")))
}
