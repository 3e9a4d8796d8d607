//! Per-entry-type content shapes.
//!
//! The distilled specification describes these as JSON-schema-validated shapes; this crate
//! validates structurally instead, by deserializing directly into these typed structs with
//! `serde`. A malformed or missing field simply fails to deserialize, which the resolver
//! treats exactly like a schema-validation failure (skip the entry). This is the idiomatic
//! Rust equivalent of a JSON-schema validator and is how the teacher's own `did` crate
//! represents on-chain/document content — through typed structs, not a schema library.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::entity::management_key::ManagementKeyEntry;

/// Content of a `DIDManagement` (`Create`) entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContent {
    /// Method-spec version this DID starts at.
    pub did_method_version: String,
    /// The initial management key set. Must contain at least one priority-0 key.
    pub management_key: Vec<ManagementKeyEntry>,
    /// The initial DID key set, if any.
    #[serde(default)]
    pub did_key: Option<Vec<DidKeyEntry>>,
    /// The initial service set, if any.
    #[serde(default)]
    pub service: Option<Vec<ServiceEntry>>,
}

/// A DID key as it appears in `Create`/`Update.add` content.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidKeyEntry {
    /// Full on-chain key id.
    pub id: String,
    /// Key type string, validated separately.
    #[serde(rename = "type")]
    pub key_type: String,
    /// Controller DID.
    pub controller: String,
    /// Purposes this key is authorized for.
    pub purpose: Vec<String>,
    /// Minimum revoker priority, if restricted.
    #[serde(default)]
    pub priority_requirement: Option<u32>,
    /// Base58-encoded public key, present for `EdDSA`/`ECDSA` keys.
    #[serde(default)]
    pub public_key_base58: Option<String>,
    /// PEM-encoded public key, present for `RSA` keys.
    #[serde(default)]
    pub public_key_pem: Option<String>,
}

/// A service as it appears in `Create`/`Update.add` content.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    /// Full on-chain service id.
    pub id: String,
    /// Service type string.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Endpoint URL.
    pub service_endpoint: String,
    /// Minimum revoker priority, if restricted.
    #[serde(default)]
    pub priority_requirement: Option<u32>,
    /// Any additional application-defined fields.
    #[serde(flatten)]
    pub custom_fields: Map<String, Value>,
}

/// Content of a `DIDUpdate` entry.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateContent {
    /// Revocations to apply.
    #[serde(default)]
    pub revoke: Option<RevokeContent>,
    /// Additions to apply.
    #[serde(default)]
    pub add: Option<AddContent>,
}

/// The `revoke` object of an `Update` entry's content.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeContent {
    /// Management key aliases to revoke.
    #[serde(default)]
    pub management_key: Option<Vec<RevokeId>>,
    /// DID key aliases to revoke, optionally with a partial purpose list.
    #[serde(default)]
    pub did_key: Option<Vec<RevokeDidKey>>,
    /// Service aliases to revoke.
    #[serde(default)]
    pub service: Option<Vec<RevokeId>>,
}

/// A bare alias reference in a `revoke` list.
#[derive(Debug, Deserialize)]
pub struct RevokeId {
    /// The alias being revoked.
    pub id: String,
}

/// A DID key revocation, optionally scoped to a subset of its purposes.
#[derive(Debug, Deserialize)]
pub struct RevokeDidKey {
    /// The alias being revoked (in full or in part).
    pub id: String,
    /// If present, only these purposes are revoked; otherwise the whole key is.
    #[serde(default)]
    pub purpose: Option<Vec<String>>,
}

/// The `add` object of an `Update` entry's content.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddContent {
    /// Management keys to add.
    #[serde(default)]
    pub management_key: Option<Vec<ManagementKeyEntry>>,
    /// DID keys to add.
    #[serde(default)]
    pub did_key: Option<Vec<DidKeyEntry>>,
    /// Services to add.
    #[serde(default)]
    pub service: Option<Vec<ServiceEntry>>,
}

/// Content of a `DIDMethodVersionUpgrade` entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionUpgradeContent {
    /// The new method-spec version.
    pub did_method_version: String,
}
