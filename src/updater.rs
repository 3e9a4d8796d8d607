//! `DIDUpdater`: a staged diff against a [`Did`]'s currently-resolved state, exported as a
//! signed `Update` entry.
//!
//! Grounded on `original_source/src/client/updater.rs`. The diff is tracked explicitly
//! (staged revoke/add lists) rather than by comparing before/after snapshots of the `Did`
//! itself, per this crate's design note — key structs carry private key material that is
//! awkward to make `Hash`/`Eq`, and an explicit staged list says exactly what the caller
//! intended without relying on structural equality.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::blockchain::calculate_entry_size;
use crate::constants::{ENTRY_SCHEMA_V100, ENTRY_SIZE_LIMIT};
use crate::did::Did;
use crate::entity::{DidKey, DidKeyPurpose, ManagementKey, Service};
use crate::entry::{Entry, EntryType};
use crate::error::ClientError;
use crate::key::{Key, KeyType};

/// A staged set of revocations and additions against a [`Did`], ready to export as a signed
/// `Update` entry.
pub struct DidUpdater<'a> {
    did: &'a Did,
    revoke_management: Vec<String>,
    revoke_did_keys: Vec<String>,
    revoke_services: Vec<String>,
    revoke_did_key_purposes: HashMap<String, Vec<DidKeyPurpose>>,
    add_management: Vec<ManagementKey>,
    add_did_keys: Vec<DidKey>,
    add_services: Vec<Service>,
}

impl<'a> DidUpdater<'a> {
    /// Starts a new staged update against `did`'s currently-resolved state.
    #[must_use]
    pub fn new(did: &'a Did) -> Self {
        Self {
            did,
            revoke_management: Vec::new(),
            revoke_did_keys: Vec::new(),
            revoke_services: Vec::new(),
            revoke_did_key_purposes: HashMap::new(),
            add_management: Vec::new(),
            add_did_keys: Vec::new(),
            add_services: Vec::new(),
        }
    }

    fn alias_in_use(&self, alias: &str) -> bool {
        let revoked_management = self.revoke_management.iter().any(|a| a == alias);
        let revoked_did_key = self.revoke_did_keys.iter().any(|a| a == alias);
        let currently_active = self
            .did
            .management_keys()
            .iter()
            .map(|k| &k.alias)
            .chain(self.did.did_keys().iter().map(|k| &k.alias))
            .any(|a| a == alias)
            && !revoked_management
            && !revoked_did_key;
        let already_staged = self.add_management.iter().any(|k| k.alias == alias)
            || self.add_did_keys.iter().any(|k| k.alias == alias);
        currently_active || already_staged
    }

    /// Stages a new management key addition.
    pub fn add_management_key(
        &mut self,
        alias: impl Into<String>,
        priority: u32,
        key_type: KeyType,
        controller: Option<String>,
        priority_requirement: Option<u32>,
    ) -> Result<(), ClientError> {
        let alias = alias.into();
        if self.alias_in_use(&alias) {
            return Err(ClientError::DuplicateAlias(alias));
        }
        let controller = controller.unwrap_or_else(|| self.did.id());
        let key = ManagementKey::new(
            alias,
            priority,
            controller,
            priority_requirement,
            Key::generate(key_type),
        )?;
        self.add_management.push(key);
        Ok(())
    }

    /// Stages a new DID key addition.
    pub fn add_did_key(
        &mut self,
        alias: impl Into<String>,
        purpose: Vec<DidKeyPurpose>,
        key_type: KeyType,
        controller: Option<String>,
        priority_requirement: Option<u32>,
    ) -> Result<(), ClientError> {
        let alias = alias.into();
        if self.alias_in_use(&alias) {
            return Err(ClientError::DuplicateAlias(alias));
        }
        let controller = controller.unwrap_or_else(|| self.did.id());
        let key =
            DidKey::new(alias, purpose, controller, priority_requirement, Key::generate(key_type))?;
        self.add_did_keys.push(key);
        Ok(())
    }

    /// Stages a new service addition.
    pub fn add_service(
        &mut self,
        alias: impl Into<String>,
        service_type: impl Into<String>,
        endpoint: impl Into<String>,
        priority_requirement: Option<u32>,
        custom_fields: Map<String, Value>,
    ) -> Result<(), ClientError> {
        let alias = alias.into();
        let already_staged = self.add_services.iter().any(|s| s.alias == alias);
        let revoked = self.revoke_services.iter().any(|a| a == &alias);
        let active = self.did.services().iter().any(|s| s.alias == alias) && !revoked;
        if already_staged || active {
            return Err(ClientError::DuplicateAlias(alias));
        }
        let service = Service::new(alias, service_type, endpoint, priority_requirement, custom_fields)?;
        self.add_services.push(service);
        Ok(())
    }

    /// Stages a full revocation of a management key by alias.
    ///
    /// # Errors
    ///
    /// Returns an error if no active management key has this alias.
    pub fn revoke_management_key(&mut self, alias: impl Into<String>) -> Result<(), ClientError> {
        let alias = alias.into();
        if !self.did.management_keys().iter().any(|k| k.alias == alias) {
            return Err(ClientError::Other(format!("no active management key `{alias}`")));
        }
        if !self.revoke_management.contains(&alias) {
            self.revoke_management.push(alias);
        }
        Ok(())
    }

    /// Stages a full revocation of a DID key by alias.
    pub fn revoke_did_key(&mut self, alias: impl Into<String>) -> Result<(), ClientError> {
        let alias = alias.into();
        if !self.did.did_keys().iter().any(|k| k.alias == alias) {
            return Err(ClientError::Other(format!("no active DID key `{alias}`")));
        }
        self.revoke_did_key_purposes.remove(&alias);
        if !self.revoke_did_keys.contains(&alias) {
            self.revoke_did_keys.push(alias);
        }
        Ok(())
    }

    /// Stages a revocation of a service by alias.
    pub fn revoke_service(&mut self, alias: impl Into<String>) -> Result<(), ClientError> {
        let alias = alias.into();
        if !self.did.services().iter().any(|s| s.alias == alias) {
            return Err(ClientError::Other(format!("no active service `{alias}`")));
        }
        if !self.revoke_services.contains(&alias) {
            self.revoke_services.push(alias);
        }
        Ok(())
    }

    /// Stages revocation of a single purpose from a two-purpose DID key. If the key only has
    /// this one purpose, escalates to a full key revocation instead.
    pub fn revoke_did_key_purpose(
        &mut self,
        alias: impl Into<String>,
        purpose: DidKeyPurpose,
    ) -> Result<(), ClientError> {
        let alias = alias.into();
        let key = self
            .did
            .did_keys()
            .iter()
            .find(|k| k.alias == alias)
            .ok_or_else(|| ClientError::Other(format!("no active DID key `{alias}`")))?;
        if !key.purpose.contains(&purpose) {
            return Err(ClientError::InvalidField {
                field: "purpose",
                reason: format!("key `{alias}` does not have purpose {purpose:?}"),
            });
        }
        if key.purpose.len() == 1 {
            return self.revoke_did_key(alias);
        }
        self.revoke_did_key_purposes.entry(alias).or_default().push(purpose);
        Ok(())
    }

    /// Stages rotation of a management key: revokes the old key material and adds a new key
    /// pair of the same type under the same alias, priority, controller, and priority
    /// requirement.
    pub fn rotate_management_key(&mut self, alias: impl Into<String>) -> Result<(), ClientError> {
        let alias = alias.into();
        let key = self
            .did
            .management_keys()
            .iter()
            .find(|k| k.alias == alias)
            .ok_or_else(|| ClientError::Other(format!("no active management key `{alias}`")))?
            .clone();
        self.revoke_management_key(&alias)?;
        self.add_management.push(ManagementKey::new(
            alias,
            key.priority,
            key.controller.clone(),
            key.priority_requirement,
            Key::generate(key.key_type()),
        )?);
        Ok(())
    }

    /// Stages rotation of a DID key, preserving alias, purpose set, controller, and priority
    /// requirement.
    pub fn rotate_did_key(&mut self, alias: impl Into<String>) -> Result<(), ClientError> {
        let alias = alias.into();
        let key = self
            .did
            .did_keys()
            .iter()
            .find(|k| k.alias == alias)
            .ok_or_else(|| ClientError::Other(format!("no active DID key `{alias}`")))?
            .clone();
        self.revoke_did_key(&alias)?;
        self.add_did_keys.push(DidKey::new(
            alias,
            key.purpose.clone(),
            key.controller.clone(),
            key.priority_requirement,
            Key::generate(key.key_type()),
        )?);
        Ok(())
    }

    fn required_priority(&self) -> u32 {
        let mut required = u32::MAX;
        for alias in &self.revoke_management {
            if let Some(key) = self.did.management_keys().iter().find(|k| &k.alias == alias) {
                required = required.min(key.effective_priority_requirement());
            }
        }
        for alias in &self.revoke_did_keys {
            if let Some(key) = self.did.did_keys().iter().find(|k| &k.alias == alias) {
                if let Some(requirement) = key.priority_requirement {
                    required = required.min(requirement);
                }
            }
        }
        for alias in &self.revoke_services {
            if let Some(service) = self.did.services().iter().find(|s| &s.alias == alias) {
                if let Some(requirement) = service.priority_requirement {
                    required = required.min(requirement);
                }
            }
        }
        for key in &self.add_management {
            required = required.min(key.priority);
        }
        required
    }

    fn has_changes(&self) -> bool {
        !self.revoke_management.is_empty()
            || !self.revoke_did_keys.is_empty()
            || !self.revoke_services.is_empty()
            || !self.revoke_did_key_purposes.is_empty()
            || !self.add_management.is_empty()
            || !self.add_did_keys.is_empty()
            || !self.add_services.is_empty()
    }

    fn remaining_priority_zero_exists(&self) -> bool {
        let remaining_existing = self
            .did
            .management_keys()
            .iter()
            .any(|k| !self.revoke_management.contains(&k.alias) && k.priority == 0);
        let added = self.add_management.iter().any(|k| k.priority == 0);
        remaining_existing || added
    }

    fn revoke_value(&self) -> Option<Value> {
        let mut map = Map::new();
        if !self.revoke_management.is_empty() {
            map.insert(
                "managementKey".into(),
                Value::Array(
                    self.revoke_management.iter().map(|a| serde_json::json!({ "id": a })).collect(),
                ),
            );
        }
        if !self.revoke_did_keys.is_empty() {
            map.insert(
                "didKey".into(),
                Value::Array(
                    self.revoke_did_keys
                        .iter()
                        .map(|alias| {
                            let mut entry = Map::new();
                            entry.insert("id".into(), Value::String(alias.clone()));
                            if let Some(purposes) = self.revoke_did_key_purposes.get(alias) {
                                entry.insert(
                                    "purpose".into(),
                                    Value::Array(
                                        purposes
                                            .iter()
                                            .map(|p| Value::String(p.as_str().into()))
                                            .collect(),
                                    ),
                                );
                            }
                            Value::Object(entry)
                        })
                        .collect(),
                ),
            );
        }
        // Purpose-only revocations on keys that are not otherwise fully revoked still need a
        // revoke.didKey entry.
        for (alias, purposes) in &self.revoke_did_key_purposes {
            if self.revoke_did_keys.contains(alias) {
                continue;
            }
            let entry = map.entry("didKey").or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = entry {
                items.push(serde_json::json!({
                    "id": alias,
                    "purpose": purposes.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                }));
            }
        }
        if !self.revoke_services.is_empty() {
            map.insert(
                "service".into(),
                Value::Array(
                    self.revoke_services.iter().map(|a| serde_json::json!({ "id": a })).collect(),
                ),
            );
        }
        if map.is_empty() { None } else { Some(Value::Object(map)) }
    }

    fn add_value(&self) -> Option<Value> {
        let did_id = self.did.id();
        let mut map = Map::new();
        if !self.add_management.is_empty() {
            map.insert(
                "managementKey".into(),
                Value::Array(self.add_management.iter().map(|k| k.to_entry_value(&did_id)).collect()),
            );
        }
        if !self.add_did_keys.is_empty() {
            map.insert(
                "didKey".into(),
                Value::Array(self.add_did_keys.iter().map(|k| k.to_entry_value(&did_id)).collect()),
            );
        }
        if !self.add_services.is_empty() {
            map.insert(
                "service".into(),
                Value::Array(self.add_services.iter().map(|s| s.to_entry_value(&did_id)).collect()),
            );
        }
        if map.is_empty() { None } else { Some(Value::Object(map)) }
    }

    /// Builds the signed `DIDUpdate` entry for the staged changes, or `Ok(None)` if nothing
    /// was staged.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoManagementKeys`] if the DID has no management key to sign
    /// with, [`ClientError::MissingPriorityZeroKey`] if applying the staged changes would
    /// leave no priority-0 management key, [`ClientError::InsufficientPriority`] if no
    /// available management key meets the priority ceiling required by the staged changes,
    /// or [`ClientError::EntryTooLarge`] if the resulting entry exceeds the size limit.
    pub fn export_entry(&self) -> Result<Option<Entry>, ClientError> {
        if !self.has_changes() {
            return Ok(None);
        }
        if self.did.management_keys().is_empty() {
            return Err(ClientError::NoManagementKeys);
        }
        if !self.remaining_priority_zero_exists() {
            return Err(ClientError::MissingPriorityZeroKey);
        }
        let required = self.required_priority();
        let signing_key = self
            .did
            .management_keys()
            .iter()
            .min_by_key(|k| k.priority)
            .expect("checked non-empty above");
        if signing_key.priority > required {
            return Err(ClientError::InsufficientPriority {
                signing_priority: signing_key.priority,
                required,
            });
        }

        let mut content_map = Map::new();
        if let Some(revoke) = self.revoke_value() {
            content_map.insert("revoke".into(), revoke);
        }
        if let Some(add) = self.add_value() {
            content_map.insert("add".into(), add);
        }
        let content = crate::canonical::to_canonical_vec(&Value::Object(content_map))?;

        let full_signing_key_id = signing_key.full_id(&self.did.id());
        let mut data_to_sign = Vec::new();
        data_to_sign.extend_from_slice(EntryType::Update.as_str().as_bytes());
        data_to_sign.extend_from_slice(ENTRY_SCHEMA_V100.as_bytes());
        data_to_sign.extend_from_slice(full_signing_key_id.as_bytes());
        data_to_sign.extend_from_slice(&content);
        let signature = signing_key.key.sign(&data_to_sign)?;

        let ext_ids: Vec<Vec<u8>> = vec![
            EntryType::Update.as_str().as_bytes().to_vec(),
            ENTRY_SCHEMA_V100.as_bytes().to_vec(),
            full_signing_key_id.into_bytes(),
            signature,
        ];
        let ext_id_refs: Vec<&[u8]> = ext_ids.iter().map(Vec::as_slice).collect();
        let size = calculate_entry_size(&ext_id_refs, &content);
        if size > ENTRY_SIZE_LIMIT {
            return Err(ClientError::EntryTooLarge { size, limit: ENTRY_SIZE_LIMIT });
        }
        tracing::trace!(did = %self.did.id(), size, "built Update entry");
        Ok(Some(Entry::new(ext_ids, content)))
    }
}
