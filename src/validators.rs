//! Format validators shared by the client (construction-time) and resolver (replay-time)
//! paths.
//!
//! Grounded on `original_source`'s `client/validators.rs` and `resolver/validators.rs`, with
//! the alias pattern taken from this crate's stricter wire vocabulary (`[a-z0-9-]`) rather
//! than the looser `[a-zA-Z0-9-]` the original resolver-side validator used for full key ids.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ClientError;

fn alias_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9-]{1,32}$").expect("valid regex"))
}

fn did_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^did:factom:(mainnet:|testnet:)?[a-f0-9]{64}$").expect("valid regex")
    })
}

fn full_key_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^did:factom:(mainnet:|testnet:)?[a-f0-9]{64}#[a-z0-9-]{1,32}$")
            .expect("valid regex")
    })
}

fn endpoint_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://.+").expect("valid regex"))
}

/// Validates an alias used for a management key, DID key, or service.
pub fn validate_alias(alias: &str) -> Result<(), ClientError> {
    if alias_re().is_match(alias) {
        Ok(())
    } else {
        Err(ClientError::InvalidField {
            field: "alias",
            reason: format!("`{alias}` must match ^[a-z0-9-]{{1,32}}$"),
        })
    }
}

/// Validates a bare DID identifier (`did:factom[:network]:chain-id`).
pub fn validate_did(id: &str) -> Result<(), ClientError> {
    if did_re().is_match(id) {
        Ok(())
    } else {
        Err(ClientError::InvalidField {
            field: "did",
            reason: format!("`{id}` is not a well-formed did:factom identifier"),
        })
    }
}

/// Validates a full key identifier (`did#alias`).
pub fn validate_full_key_identifier(id: &str) -> Result<(), ClientError> {
    if full_key_id_re().is_match(id) {
        Ok(())
    } else {
        Err(ClientError::InvalidField {
            field: "key id",
            reason: format!("`{id}` is not a well-formed did:factom key identifier"),
        })
    }
}

/// Validates a service endpoint URL.
pub fn validate_service_endpoint(endpoint: &str) -> Result<(), ClientError> {
    if endpoint_re().is_match(endpoint) {
        Ok(())
    } else {
        Err(ClientError::InvalidField {
            field: "service endpoint",
            reason: format!("`{endpoint}` must be an http(s) URL"),
        })
    }
}

/// Validates an optional `priority_requirement`: `None` or a non-negative integer already
/// guaranteed by the `u32` type; this exists to document the invariant at call sites and to
/// give resolver code a single place to reason about it.
#[must_use]
pub const fn validate_priority_requirement(_value: Option<u32>) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_accepts_lowercase_alnum_hyphen() {
        assert!(validate_alias("management-1").is_ok());
        assert!(validate_alias("UPPER").is_err());
        assert!(validate_alias("").is_err());
    }

    #[test]
    fn did_requires_64_hex_chain_id() {
        assert!(validate_did(&format!("did:factom:{}", "a".repeat(64))).is_ok());
        assert!(validate_did(&format!("did:factom:mainnet:{}", "a".repeat(64))).is_ok());
        assert!(validate_did("did:factom:not-hex").is_err());
    }

    #[test]
    fn endpoint_requires_http_scheme() {
        assert!(validate_service_endpoint("https://example.com").is_ok());
        assert!(validate_service_endpoint("ftp://example.com").is_err());
    }
}
