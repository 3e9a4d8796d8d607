//! Converts wire-shape schema entries into entity structs, validating each id against the
//! chain it is being applied to.

use std::str::FromStr;

use crate::entity::management_key::ManagementKeyEntry;
use crate::entity::{DidKey, DidKeyPurpose, ManagementKey, Service};
use crate::key::{Key, KeyType};
use crate::schema::{DidKeyEntry, ServiceEntry};

/// Validates that `id` is a full key/service identifier of the form `did#alias` belonging to
/// `did`, and returns the alias.
pub fn alias_for_did(id: &str, did: &str) -> Result<String, String> {
    let prefix = format!("{did}#");
    let alias = id
        .strip_prefix(&prefix)
        .ok_or_else(|| format!("id `{id}` does not belong to chain `{did}`"))?;
    crate::validators::validate_alias(alias).map_err(|err| err.to_string())?;
    Ok(alias.to_string())
}

fn decode_public_key(
    key_type: KeyType,
    public_key_base58: Option<&str>,
    public_key_pem: Option<&str>,
) -> Result<Key, String> {
    let encoded = match key_type {
        KeyType::EdDSA | KeyType::Ecdsa => {
            public_key_base58.ok_or("missing publicKeyBase58 field")?
        }
        KeyType::Rsa => public_key_pem.ok_or("missing publicKeyPem field")?,
    };
    Key::from_public_encoding(key_type, encoded).map_err(|err| err.to_string())
}

/// Converts a wire-shape management key entry into a [`ManagementKey`], validating its id
/// against `did`.
pub fn management_key_from_entry(
    entry: &ManagementKeyEntry,
    did: &str,
) -> Result<ManagementKey, String> {
    let alias = alias_for_did(&entry.id, did)?;
    let key_type = KeyType::from_str(&entry.key_type).map_err(|err| err.to_string())?;
    let key = decode_public_key(
        key_type,
        entry.public_key_base58.as_deref(),
        entry.public_key_pem.as_deref(),
    )?;
    ManagementKey::new(alias, entry.priority, entry.controller.clone(), entry.priority_requirement, key)
        .map_err(|err| err.to_string())
}

/// Converts a wire-shape DID key entry into a [`DidKey`], validating its id against `did`.
pub fn did_key_from_entry(entry: &DidKeyEntry, did: &str) -> Result<DidKey, String> {
    let alias = alias_for_did(&entry.id, did)?;
    let key_type = KeyType::from_str(&entry.key_type).map_err(|err| err.to_string())?;
    let key = decode_public_key(
        key_type,
        entry.public_key_base58.as_deref(),
        entry.public_key_pem.as_deref(),
    )?;
    let purpose = entry
        .purpose
        .iter()
        .map(|p| match p.as_str() {
            "publicKey" => Ok(DidKeyPurpose::PublicKey),
            "authentication" => Ok(DidKeyPurpose::AuthenticationKey),
            other => Err(format!("unknown DID key purpose `{other}`")),
        })
        .collect::<Result<Vec<_>, _>>()?;
    DidKey::new(alias, purpose, entry.controller.clone(), entry.priority_requirement, key)
        .map_err(|err| err.to_string())
}

/// Converts a wire-shape service entry into a [`Service`], validating its id against `did`.
pub fn service_from_entry(entry: &ServiceEntry, did: &str) -> Result<Service, String> {
    let alias = alias_for_did(&entry.id, did)?;
    Service::new(
        alias,
        entry.service_type.clone(),
        entry.service_endpoint.clone(),
        entry.priority_requirement,
        entry.custom_fields.clone(),
    )
    .map_err(|err| err.to_string())
}
