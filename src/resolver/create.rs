//! The `Create` (`DIDManagement`) entry processor: the only processor that runs for entry 0,
//! and the only one whose failure aborts the whole resolution.

use std::collections::HashSet;

use crate::constants::ENTRY_SCHEMA_V100;
use crate::entity::{DidKey, ManagementKey, Service};
use crate::entry::{Entry, EntryType};
use crate::resolver::convert::{did_key_from_entry, management_key_from_entry, service_from_entry};
use crate::schema::CreateContent;

/// The parsed, validated result of a `Create` entry.
pub struct CreateResult {
    /// The initial management key set.
    pub management_keys: Vec<ManagementKey>,
    /// The initial DID key set.
    pub did_keys: Vec<DidKey>,
    /// The initial service set.
    pub services: Vec<Service>,
    /// The method-spec version this DID starts at.
    pub method_version: String,
}

/// Parses and validates entry 0 of a chain as a `DIDManagement` entry.
///
/// # Errors
///
/// Returns a human-readable reason on any failure; the caller treats every failure here as
/// fatal (`InvalidDIDChain`), since entry 0 has no tolerance for malformed content.
pub fn process(entry: &Entry, did: &str) -> Result<CreateResult, String> {
    if entry.ext_ids.len() < 2 {
        return Err("entry 0 has fewer than 2 ExtIDs".into());
    }
    let entry_type = std::str::from_utf8(&entry.ext_ids[0]).map_err(|err| err.to_string())?;
    if entry_type != EntryType::Create.as_str() {
        return Err(format!("entry 0 has type `{entry_type}`, expected `DIDManagement`"));
    }
    let schema_version = std::str::from_utf8(&entry.ext_ids[1]).map_err(|err| err.to_string())?;
    if schema_version != ENTRY_SCHEMA_V100 {
        return Err(format!("entry 0 has unsupported schema version `{schema_version}`"));
    }

    let content: CreateContent =
        serde_json::from_slice(&entry.content).map_err(|err| err.to_string())?;

    let mut seen_key_aliases = HashSet::new();
    let mut management_keys = Vec::with_capacity(content.management_key.len());
    for raw in &content.management_key {
        let key = management_key_from_entry(raw, did)?;
        if !seen_key_aliases.insert(key.alias.clone()) {
            return Err(format!("duplicate alias `{}` in Create entry", key.alias));
        }
        management_keys.push(key);
    }
    if !management_keys.iter().any(|key| key.priority == 0) {
        return Err("Create entry has no priority-0 management key".into());
    }

    let mut did_keys = Vec::new();
    for raw in content.did_key.into_iter().flatten() {
        let key = did_key_from_entry(&raw, did)?;
        if !seen_key_aliases.insert(key.alias.clone()) {
            return Err(format!("duplicate alias `{}` in Create entry", key.alias));
        }
        did_keys.push(key);
    }

    let mut seen_service_aliases = HashSet::new();
    let mut services = Vec::new();
    for raw in content.service.into_iter().flatten() {
        let service = service_from_entry(&raw, did)?;
        if !seen_service_aliases.insert(service.alias.clone()) {
            return Err(format!("duplicate alias `{}` in Create entry", service.alias));
        }
        services.push(service);
    }

    Ok(CreateResult { management_keys, did_keys, services, method_version: content.did_method_version })
}
