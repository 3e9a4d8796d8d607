//! The `Did` aggregate: a DID's management keys, DID keys, and services, plus the `Create`
//! entry builder.
//!
//! Grounded on `original_source/src/client/did.rs`. Alias uniqueness is enforced across *all*
//! three collections at once via `used_key_aliases`/`used_service_aliases`, matching the
//! original's `_check_alias_is_unique_and_add_to_used`.

use std::collections::HashSet;

use rand::RngCore;
use serde_json::{Map, Value};

use crate::blockchain::{calculate_chain_id, calculate_entry_size};
use crate::constants::{DID_METHOD_NAME, DID_METHOD_SPEC_V020, ENTRY_SCHEMA_V100, ENTRY_SIZE_LIMIT};
use crate::entity::{DidKey, DidKeyPurpose, ManagementKey, Service};
use crate::entry::{Entry, EntryType};
use crate::error::ClientError;
use crate::key::Key;
use crate::network::Network;

/// A DID under construction or representing the currently-resolved state of an existing DID.
pub struct Did {
    chain_id: String,
    network: Network,
    spec_version: String,
    management_keys: Vec<ManagementKey>,
    did_keys: Vec<DidKey>,
    services: Vec<Service>,
    used_key_aliases: HashSet<String>,
    used_service_aliases: HashSet<String>,
    nonce: [u8; 32],
}

impl Did {
    /// Starts a brand-new DID: generates a fresh nonce and derives its chain id from it, ready
    /// to accept management keys, DID keys, and services before calling
    /// [`Did::export_create_entry`].
    #[must_use]
    pub fn new(network: Network) -> Self {
        let mut nonce = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce);
        let ext_ids: Vec<&[u8]> =
            vec![EntryType::Create.as_str().as_bytes(), ENTRY_SCHEMA_V100.as_bytes(), &nonce];
        let chain_id = calculate_chain_id(&ext_ids);
        Self {
            chain_id,
            network,
            spec_version: DID_METHOD_SPEC_V020.to_string(),
            management_keys: Vec::new(),
            did_keys: Vec::new(),
            services: Vec::new(),
            used_key_aliases: HashSet::new(),
            used_service_aliases: HashSet::new(),
            nonce,
        }
    }

    /// Reconstructs a `Did` representing already-resolved on-chain state (used by
    /// [`crate::resolver`] and by [`crate::updater::DidUpdater`]). The nonce is not
    /// meaningful here since no further `Create` entry will ever be exported from it.
    #[must_use]
    pub fn from_resolved_state(
        chain_id: String,
        network: Network,
        spec_version: String,
        management_keys: Vec<ManagementKey>,
        did_keys: Vec<DidKey>,
        services: Vec<Service>,
    ) -> Self {
        let used_key_aliases =
            management_keys.iter().map(|k| k.alias.clone()).chain(did_keys.iter().map(|k| k.alias.clone())).collect();
        let used_service_aliases = services.iter().map(|s| s.alias.clone()).collect();
        Self {
            chain_id,
            network,
            spec_version,
            management_keys,
            did_keys,
            services,
            used_key_aliases,
            used_service_aliases,
            nonce: [0u8; 32],
        }
    }

    /// The full `did:factom[:network]:<chain-id>` identifier.
    #[must_use]
    pub fn id(&self) -> String {
        Self::format_id(&self.chain_id, self.network)
    }

    /// Formats a `did:factom[:network]:<chain-id>` identifier from its parts, without
    /// requiring a constructed [`Did`]. Used by [`crate::resolver`], which knows the chain id
    /// and network before it has resolved any state to build a `Did` from.
    #[must_use]
    pub fn format_id(chain_id: &str, network: Network) -> String {
        match network.as_str() {
            Some(segment) => format!("{DID_METHOD_NAME}:{segment}:{chain_id}"),
            None => format!("{DID_METHOD_NAME}:{chain_id}"),
        }
    }

    /// The bare chain id (no method/network prefix).
    #[must_use]
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// The network this DID is anchored to.
    #[must_use]
    pub const fn network(&self) -> Network {
        self.network
    }

    /// The method-spec version currently in effect for this DID.
    #[must_use]
    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    /// Currently active management keys.
    #[must_use]
    pub fn management_keys(&self) -> &[ManagementKey] {
        &self.management_keys
    }

    /// Currently active DID keys.
    #[must_use]
    pub fn did_keys(&self) -> &[DidKey] {
        &self.did_keys
    }

    /// Currently active services.
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    fn claim_alias(&mut self, alias: &str, set: AliasSet) -> Result<(), ClientError> {
        let target = match set {
            AliasSet::Key => &mut self.used_key_aliases,
            AliasSet::Service => &mut self.used_service_aliases,
        };
        if !target.insert(alias.to_string()) {
            return Err(ClientError::DuplicateAlias(alias.to_string()));
        }
        Ok(())
    }

    /// Adds a management key, generating its key material with the given algorithm.
    pub fn management_key(
        &mut self,
        alias: impl Into<String>,
        priority: u32,
        key_type: crate::key::KeyType,
        controller: Option<String>,
        priority_requirement: Option<u32>,
    ) -> Result<&ManagementKey, ClientError> {
        let alias = alias.into();
        self.claim_alias(&alias, AliasSet::Key)?;
        let controller = controller.unwrap_or_else(|| self.id());
        let key = ManagementKey::new(
            alias,
            priority,
            controller,
            priority_requirement,
            Key::generate(key_type),
        )?;
        self.management_keys.push(key);
        Ok(self.management_keys.last().expect("just pushed"))
    }

    /// Adds a DID key, generating its key material with the given algorithm.
    pub fn did_key(
        &mut self,
        alias: impl Into<String>,
        purpose: Vec<DidKeyPurpose>,
        key_type: crate::key::KeyType,
        controller: Option<String>,
        priority_requirement: Option<u32>,
    ) -> Result<&DidKey, ClientError> {
        let alias = alias.into();
        self.claim_alias(&alias, AliasSet::Key)?;
        let controller = controller.unwrap_or_else(|| self.id());
        let key =
            DidKey::new(alias, purpose, controller, priority_requirement, Key::generate(key_type))?;
        self.did_keys.push(key);
        Ok(self.did_keys.last().expect("just pushed"))
    }

    /// Adds a service.
    pub fn service(
        &mut self,
        alias: impl Into<String>,
        service_type: impl Into<String>,
        endpoint: impl Into<String>,
        priority_requirement: Option<u32>,
        custom_fields: Map<String, Value>,
    ) -> Result<&Service, ClientError> {
        let alias = alias.into();
        self.claim_alias(&alias, AliasSet::Service)?;
        let service = Service::new(alias, service_type, endpoint, priority_requirement, custom_fields)?;
        self.services.push(service);
        Ok(self.services.last().expect("just pushed"))
    }

    fn did_document_content(&self) -> Value {
        let mut map = Map::new();
        map.insert("didMethodVersion".into(), Value::String(self.spec_version.clone()));
        map.insert(
            "managementKey".into(),
            Value::Array(self.management_keys.iter().map(|k| k.to_entry_value(&self.id())).collect()),
        );
        if !self.did_keys.is_empty() {
            map.insert(
                "didKey".into(),
                Value::Array(self.did_keys.iter().map(|k| k.to_entry_value(&self.id())).collect()),
            );
        }
        if !self.services.is_empty() {
            map.insert(
                "service".into(),
                Value::Array(self.services.iter().map(|s| s.to_entry_value(&self.id())).collect()),
            );
        }
        Value::Object(map)
    }

    /// Builds the signed `DIDManagement` (`Create`) entry for this DID.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NoManagementKeys`] or [`ClientError::MissingPriorityZeroKey`] if
    /// the required management-key invariants are not met, or [`ClientError::EntryTooLarge`]
    /// if the resulting entry exceeds [`crate::constants::ENTRY_SIZE_LIMIT`].
    pub fn export_create_entry(&self) -> Result<Entry, ClientError> {
        if self.management_keys.is_empty() {
            return Err(ClientError::NoManagementKeys);
        }
        if !self.management_keys.iter().any(|k| k.priority == 0) {
            return Err(ClientError::MissingPriorityZeroKey);
        }
        let content = crate::canonical::to_canonical_vec(&self.did_document_content())?;
        let ext_ids: Vec<Vec<u8>> = vec![
            EntryType::Create.as_str().as_bytes().to_vec(),
            ENTRY_SCHEMA_V100.as_bytes().to_vec(),
            self.nonce.to_vec(),
        ];
        let ext_id_refs: Vec<&[u8]> = ext_ids.iter().map(Vec::as_slice).collect();
        let size = calculate_entry_size(&ext_id_refs, &content);
        if size > ENTRY_SIZE_LIMIT {
            return Err(ClientError::EntryTooLarge { size, limit: ENTRY_SIZE_LIMIT });
        }
        tracing::trace!(did = %self.id(), size, "built Create entry");
        Ok(Entry::new(ext_ids, content))
    }
}

enum AliasSet {
    Key,
    Service,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyType;

    #[test]
    fn create_entry_requires_priority_zero_key() {
        let mut did = Did::new(Network::Unspecified);
        did.management_key("m1", 1, KeyType::EdDSA, None, None).expect("add key");
        assert!(matches!(did.export_create_entry(), Err(ClientError::MissingPriorityZeroKey)));
    }

    #[test]
    fn create_entry_succeeds_with_priority_zero_key() {
        let mut did = Did::new(Network::Testnet);
        did.management_key("m1", 0, KeyType::EdDSA, None, None).expect("add key");
        let entry = did.export_create_entry().expect("export");
        assert_eq!(entry.entry_type(), Some(EntryType::Create));
    }

    #[test]
    fn duplicate_alias_is_rejected() {
        let mut did = Did::new(Network::Unspecified);
        did.management_key("m1", 0, KeyType::EdDSA, None, None).expect("first");
        let err = did.did_key("m1", vec![DidKeyPurpose::PublicKey], KeyType::EdDSA, None, None);
        assert!(matches!(err, Err(ClientError::DuplicateAlias(alias)) if alias == "m1"));
    }
}
