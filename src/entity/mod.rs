//! The entity model: management keys, DID keys, and services that make up a [`crate::did::Did`].

pub mod did_key;
pub mod management_key;
pub mod service;

pub use did_key::{DidKey, DidKeyPurpose};
pub use management_key::ManagementKey;
pub use service::Service;

/// Full on-chain identifier for an entity with the given `alias` on the given `did`.
#[must_use]
pub fn full_id(did: &str, alias: &str) -> String {
    format!("{did}#{alias}")
}

/// Extracts the alias segment (everything after the last `#`) from a full key/service id.
#[must_use]
pub fn alias_of(full_id: &str) -> &str {
    full_id.rsplit('#').next().unwrap_or(full_id)
}
