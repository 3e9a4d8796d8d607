//! DID keys: the subject's own authentication/application keys, as opposed to management keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::full_id;
use crate::error::ClientError;
use crate::key::{Key, KeyType};
use crate::validators::{validate_alias, validate_did};

/// What a DID key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DidKeyPurpose {
    /// General-purpose public key.
    #[serde(rename = "publicKey")]
    PublicKey,
    /// Authentication key.
    #[serde(rename = "authentication")]
    AuthenticationKey,
}

impl DidKeyPurpose {
    /// The wire string for this purpose.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PublicKey => "publicKey",
            Self::AuthenticationKey => "authentication",
        }
    }
}

/// A DID key: one or two purposes, each independently revocable.
#[derive(Clone)]
pub struct DidKey {
    /// Unique alias identifying this key on its DID.
    pub alias: String,
    /// The purpose(s) this key is authorized for; 1 or 2, never duplicated.
    pub purpose: Vec<DidKeyPurpose>,
    /// Controller DID.
    pub controller: String,
    /// Minimum management-key priority required to revoke this key.
    pub priority_requirement: Option<u32>,
    /// The underlying signature key material.
    pub key: Key,
}

impl DidKey {
    /// Builds a new DID key, validating `alias` and the purpose list (non-empty, no
    /// duplicates, at most both purposes).
    pub fn new(
        alias: impl Into<String>,
        purpose: Vec<DidKeyPurpose>,
        controller: impl Into<String>,
        priority_requirement: Option<u32>,
        key: Key,
    ) -> Result<Self, ClientError> {
        let alias = alias.into();
        validate_alias(&alias)?;
        if purpose.is_empty() || purpose.len() > 2 {
            return Err(ClientError::InvalidField {
                field: "purpose",
                reason: "must name 1 or 2 purposes".into(),
            });
        }
        let unique: std::collections::HashSet<_> = purpose.iter().copied().collect();
        if unique.len() != purpose.len() {
            return Err(ClientError::InvalidField {
                field: "purpose",
                reason: "must not repeat a purpose".into(),
            });
        }
        let controller = controller.into();
        validate_did(&controller)?;
        Ok(Self { alias, purpose, controller, priority_requirement, key })
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

    /// Serializes this key to the JSON object shape used in entry content.
    #[must_use]
    pub fn to_entry_value(&self, did: &str) -> Value {
        let mut map = Map::new();
        map.insert("id".into(), Value::String(self.full_id(did)));
        map.insert("type".into(), Value::String(self.key_type().to_string()));
        map.insert("controller".into(), Value::String(self.controller.clone()));
        map.insert(
            "purpose".into(),
            Value::Array(self.purpose.iter().map(|p| Value::String(p.as_str().into())).collect()),
        );
        let (field, encoded) = self.key.on_chain_encoding();
        map.insert(field.into(), Value::String(encoded));
        if let Some(requirement) = self.priority_requirement {
            map.insert("priorityRequirement".into(), Value::from(requirement));
        }
        Value::Object(map)
    }

    /// A hashable identity for "has this exact key ever been active" tracking.
    #[must_use]
    pub fn identity(&self) -> (String, Vec<u8>, KeyType) {
        (self.alias.clone(), self.key.public_key_bytes(), self.key_type())
    }
}
