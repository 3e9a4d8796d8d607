//! The `DIDUpdate` entry processor: revocations and additions under a priority ceiling.
//!
//! Grounded on `original_source/src/resolver/update.rs`. The priority ceiling a signer must
//! meet is the minimum over every staged change's own requirement — revoking a
//! tightly-guarded key, or adding a high-authority management key, both raise the bar.

use std::collections::{HashMap, HashSet};

use crate::entity::{DidKey, DidKeyPurpose, ManagementKey, Service};
use crate::entry::Entry;
use crate::resolver::convert::{did_key_from_entry, management_key_from_entry, service_from_entry};
use crate::resolver::{signing_alias, signing_preimage, ResolutionState};
use crate::schema::UpdateContent;

fn parse_purposes(purposes: &[String]) -> Result<Vec<DidKeyPurpose>, String> {
    purposes
        .iter()
        .map(|purpose| match purpose.as_str() {
            "publicKey" => Ok(DidKeyPurpose::PublicKey),
            "authentication" => Ok(DidKeyPurpose::AuthenticationKey),
            other => Err(format!("unknown DID key purpose `{other}`")),
        })
        .collect()
}

/// Parses, authorizes, and applies a `DIDUpdate` entry against `state`.
pub fn process(entry: &Entry, did: &str, state: &mut ResolutionState) -> Result<(), String> {
    if state.method_version.as_deref() != Some("0.2.0") {
        return Err("DIDUpdate entries require method version 0.2.0".into());
    }

    // a. resolve and verify the signing key.
    let alias = signing_alias(entry, did)?;
    let signing_key = state
        .management_keys
        .get(alias)
        .cloned()
        .ok_or_else(|| format!("signing key `{alias}` is not an active management key"))?;
    if !signing_key.key.verify(&signing_preimage(entry), &entry.ext_ids[3]) {
        return Err(format!("signature verification failed for key `{alias}`"));
    }

    let content: UpdateContent =
        serde_json::from_slice(&entry.content).map_err(|err| err.to_string())?;

    let mut revoke_management: Vec<String> = Vec::new();
    let mut revoke_did_keys: Vec<String> = Vec::new();
    let mut revoke_did_key_purposes: HashMap<String, Vec<DidKeyPurpose>> = HashMap::new();
    let mut revoke_services: Vec<String> = Vec::new();
    let mut add_management: Vec<ManagementKey> = Vec::new();
    let mut add_did_keys: Vec<DidKey> = Vec::new();
    let mut add_services: Vec<Service> = Vec::new();

    // b/c. validate revocations and fold in their priority contributions.
    let mut required_priority = u32::MAX;

    if let Some(revoke) = &content.revoke {
        for item in revoke.management_key.iter().flatten() {
            if revoke_management.contains(&item.id) {
                return Err(format!("duplicate revocation of management key `{}`", item.id));
            }
            let key = state
                .management_keys
                .get(&item.id)
                .ok_or_else(|| format!("revoked management key `{}` is not active", item.id))?;
            required_priority = required_priority.min(key.effective_priority_requirement());
            revoke_management.push(item.id.clone());
        }
        for item in revoke.did_key.iter().flatten() {
            if revoke_did_keys.contains(&item.id) || revoke_did_key_purposes.contains_key(&item.id) {
                return Err(format!("duplicate revocation of DID key `{}`", item.id));
            }
            let key = state
                .did_keys
                .get(&item.id)
                .ok_or_else(|| format!("revoked DID key `{}` is not active", item.id))?;
            if let Some(requirement) = key.priority_requirement {
                required_priority = required_priority.min(requirement);
            }
            match &item.purpose {
                None => revoke_did_keys.push(item.id.clone()),
                Some(purposes) => {
                    let requested = parse_purposes(purposes)?;
                    let unique: HashSet<_> = requested.iter().copied().collect();
                    if unique.is_empty() || unique.len() != requested.len() {
                        return Err(format!(
                            "purpose revocation list for DID key `{}` is empty or has duplicates",
                            item.id
                        ));
                    }
                    let current: HashSet<_> = key.purpose.iter().copied().collect();
                    if !unique.is_subset(&current) {
                        return Err(format!(
                            "DID key `{}` does not have all of the named purposes",
                            item.id
                        ));
                    }
                    if unique == current {
                        revoke_did_keys.push(item.id.clone());
                    } else {
                        revoke_did_key_purposes.insert(item.id.clone(), requested);
                    }
                }
            }
        }
        for item in revoke.service.iter().flatten() {
            if revoke_services.contains(&item.id) {
                return Err(format!("duplicate revocation of service `{}`", item.id));
            }
            let service = state
                .services
                .get(&item.id)
                .ok_or_else(|| format!("revoked service `{}` is not active", item.id))?;
            if let Some(requirement) = service.priority_requirement {
                required_priority = required_priority.min(requirement);
            }
            revoke_services.push(item.id.clone());
        }
    }

    // c. validate additions: no collision with active-minus-concurrently-revoked or
    // already-staged aliases, and no reuse of a key that has ever been active before.
    if let Some(add) = &content.add {
        for raw in add.management_key.iter().flatten() {
            let key = management_key_from_entry(raw, did)?;
            let active = state.management_keys.contains_key(&key.alias)
                && !revoke_management.contains(&key.alias);
            let staged = add_management.iter().any(|k| k.alias == key.alias)
                || add_did_keys.iter().any(|k| k.alias == key.alias);
            if active || staged {
                return Err(format!("alias `{}` collides with an active or staged key", key.alias));
            }
            if state.all_keys.contains(&key.identity()) {
                return Err(format!("key `{}` has been active before and cannot be re-added", key.alias));
            }
            required_priority = required_priority.min(key.priority);
            add_management.push(key);
        }
        for raw in add.did_key.iter().flatten() {
            let key = did_key_from_entry(raw, did)?;
            let active = (state.management_keys.contains_key(&key.alias)
                && !revoke_management.contains(&key.alias))
                || (state.did_keys.contains_key(&key.alias) && !revoke_did_keys.contains(&key.alias));
            let staged = add_management.iter().any(|k| k.alias == key.alias)
                || add_did_keys.iter().any(|k| k.alias == key.alias);
            if active || staged {
                return Err(format!("alias `{}` collides with an active or staged key", key.alias));
            }
            if state.all_keys.contains(&key.identity()) {
                return Err(format!("key `{}` has been active before and cannot be re-added", key.alias));
            }
            add_did_keys.push(key);
        }
        for raw in add.service.iter().flatten() {
            let service = service_from_entry(raw, did)?;
            let active =
                state.services.contains_key(&service.alias) && !revoke_services.contains(&service.alias);
            let staged = add_services.iter().any(|s| s.alias == service.alias);
            if active || staged {
                return Err(format!("alias `{}` collides with an active or staged service", service.alias));
            }
            add_services.push(service);
        }
    }

    // d. an Update with no revocations or additions applies as a no-op, same as the rest of
    // the authority checks below applied to empty sets.

    // e. signing key authority check.
    if signing_key.priority > required_priority {
        return Err(format!(
            "signing key priority {} exceeds required priority {required_priority}",
            signing_key.priority
        ));
    }

    // f. priority-0 preservation.
    let remaining_priority_zero = state
        .management_keys
        .values()
        .any(|key| !revoke_management.contains(&key.alias) && key.priority == 0)
        || add_management.iter().any(|key| key.priority == 0);
    if !remaining_priority_zero {
        return Err("applying this update would leave no priority-0 management key".into());
    }

    // g. self-revocation rule: a signer below priority 0 that adds exactly one key at its own
    // priority is presumed to be rotating itself out, and is forced into the revocation set.
    if signing_key.priority != 0 {
        let same_priority_additions =
            add_management.iter().filter(|key| key.priority == signing_key.priority).count();
        if same_priority_additions > 1 {
            return Err("more than one staged addition at the signing key's own priority".into());
        }
        if same_priority_additions == 1 && !revoke_management.contains(&signing_key.alias) {
            revoke_management.push(signing_key.alias.clone());
        }
    }

    // h. apply.
    for alias in &revoke_management {
        state.management_keys.remove(alias);
    }
    for alias in &revoke_did_keys {
        state.did_keys.remove(alias);
    }
    for (alias, purposes) in &revoke_did_key_purposes {
        if let Some(key) = state.did_keys.get_mut(alias) {
            let remove: HashSet<_> = purposes.iter().copied().collect();
            key.purpose.retain(|purpose| !remove.contains(purpose));
        }
    }
    for alias in &revoke_services {
        state.services.remove(alias);
    }
    for key in add_management {
        state.all_keys.insert(key.identity());
        state.management_keys.insert(key.alias.clone(), key);
    }
    for key in add_did_keys {
        state.all_keys.insert(key.identity());
        state.did_keys.insert(key.alias.clone(), key);
    }
    for service in add_services {
        state.services.insert(service.alias.clone(), service);
    }

    Ok(())
}
