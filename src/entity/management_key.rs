//! Management keys: the authority hierarchy that governs which entries apply.
//!
//! Grounded on `original_source/src/client/keys/management.rs` and `keys/abstract.rs`. Lower
//! `priority` means more authority; `priority_requirement`, when set, raises the bar for
//! revoking or removing this key above its own `priority`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::full_id;
use crate::error::ClientError;
use crate::key::{Key, KeyType};
use crate::validators::{validate_alias, validate_did, validate_priority_requirement};

/// A management key: signs entries and/or manages other keys and services, depending on its
/// priority relative to the rest of the DID's management keys.
#[derive(Clone)]
pub struct ManagementKey {
    /// Unique alias identifying this key on its DID.
    pub alias: String,
    /// Authority level; 0 is highest authority.
    pub priority: u32,
    /// Controller DID — usually the key's own DID, but may name another DID.
    pub controller: String,
    /// Minimum priority another key must have in order to revoke or remove this key.
    pub priority_requirement: Option<u32>,
    /// The underlying signature key material.
    pub key: Key,
}

impl ManagementKey {
    /// Builds a new management key, validating `alias` and `priority_requirement`.
    pub fn new(
        alias: impl Into<String>,
        priority: u32,
        controller: impl Into<String>,
        priority_requirement: Option<u32>,
        key: Key,
    ) -> Result<Self, ClientError> {
        let alias = alias.into();
        validate_alias(&alias)?;
        let controller = controller.into();
        validate_did(&controller)?;
        debug_assert!(validate_priority_requirement(priority_requirement));
        Ok(Self { alias, priority, controller, priority_requirement, key })
    }

    /// The key type of the underlying key material.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        self.key.key_type()
    }

    /// Full on-chain identifier of this key (`did#alias`).
    #[must_use]
    pub fn full_id(&self, did: &str) -> String {
        full_id(did, &self.alias)
    }

    /// The priority used when this key's authority is checked as a *target* of revocation —
    /// its explicit `priority_requirement` if set, else its own `priority`.
    ///
    /// This is the resolved interpretation of the open question in the resolver's priority
    /// ceiling computation: a revocation/removal of this key must come from a signer whose
    /// priority is at or above this value.
    #[must_use]
    pub const fn effective_priority_requirement(&self) -> u32 {
        match self.priority_requirement {
            Some(requirement) => requirement,
            None => self.priority,
        }
    }

    /// Serializes this key to the JSON object shape used in entry content.
    #[must_use]
    pub fn to_entry_value(&self, did: &str) -> Value {
        let mut map = Map::new();
        map.insert("id".into(), Value::String(self.full_id(did)));
        map.insert("type".into(), Value::String(self.key_type().to_string()));
        map.insert("controller".into(), Value::String(self.controller.clone()));
        map.insert("priority".into(), Value::from(self.priority));
        let (field, encoded) = self.key.on_chain_encoding();
        map.insert(field.into(), Value::String(encoded));
        if let Some(requirement) = self.priority_requirement {
            map.insert("priorityRequirement".into(), Value::from(requirement));
        }
        Value::Object(map)
    }

    /// A hashable identity for "has this exact key ever been active" tracking: the (alias,
    /// public key bytes, key type) triple used by the resolver's `all_keys` set, per this
    /// crate's design note that keys are identified by value rather than reference equality.
    #[must_use]
    pub fn identity(&self) -> (String, Vec<u8>, KeyType) {
        (self.alias.clone(), self.key.public_key_bytes(), self.key_type())
    }
}

/// A management key as it appears in an entry's `managementKey` array, plus the raw key-type
/// string for deserialization before it is validated against [`KeyType`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementKeyEntry {
    /// Full on-chain key id.
    pub id: String,
    /// Key type string, validated separately.
    #[serde(rename = "type")]
    pub key_type: String,
    /// Controller DID.
    pub controller: String,
    /// Authority level.
    pub priority: u32,
    /// Minimum revoker priority, if restricted beyond `priority`.
    pub priority_requirement: Option<u32>,
    /// Base58-encoded public key, present for `EdDSA`/`ECDSA` keys.
    #[serde(default)]
    pub public_key_base58: Option<String>,
    /// PEM-encoded public key, present for `RSA` keys.
    #[serde(default)]
    pub public_key_pem: Option<String>,
}
