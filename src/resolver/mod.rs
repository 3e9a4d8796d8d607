//! Replays an ordered entry log into the current state of a DID.
//!
//! Grounded on `original_source/src/resolver/resolver.rs`. The replay is deliberately tolerant
//! of malformed entries: every failure other than a bad entry 0 is recorded as a skip and
//! replay continues, since a chain may carry entries written by a buggy or malicious client
//! that must not be allowed to wedge every later reader.

pub mod convert;
mod create;
mod deactivate;
mod update;
mod version_upgrade;

use std::collections::{HashMap, HashSet};

use sha2::{Digest, Sha256};

use crate::constants::ENTRY_SCHEMA_V100;
use crate::did::Did;
use crate::entity::{DidKey, ManagementKey, Service};
use crate::entry::{Entry, EntryType};
use crate::error::ResolverError;
use crate::key::KeyType;
use crate::network::Network;

/// Why a single entry in the chain's log was not applied.
#[derive(Debug, Clone)]
pub struct SkippedEntry {
    /// Position of the entry in the supplied entry list.
    pub index: usize,
    /// Human-readable reason it was skipped.
    pub reason: String,
}

/// The outcome of replaying a chain's full entry log.
#[derive(Debug)]
pub struct ResolutionResult {
    /// The resolved DID, reflecting every entry that applied successfully.
    pub did: Did,
    /// Whether a `DIDDeactivation` entry terminated the chain.
    pub deactivated: bool,
    /// Entries that failed to apply, in order, with why.
    pub skipped_entries: Vec<SkippedEntry>,
}

/// Mutable replay state threaded through the per-entry-type processors.
pub struct ResolutionState {
    pub(crate) management_keys: HashMap<String, ManagementKey>,
    pub(crate) did_keys: HashMap<String, DidKey>,
    pub(crate) services: HashMap<String, Service>,
    pub(crate) all_keys: HashSet<(String, Vec<u8>, KeyType)>,
    pub(crate) method_version: Option<String>,
    pub(crate) deactivated: bool,
}

impl ResolutionState {
    fn new() -> Self {
        Self {
            management_keys: HashMap::new(),
            did_keys: HashMap::new(),
            services: HashMap::new(),
            all_keys: HashSet::new(),
            method_version: None,
            deactivated: false,
        }
    }
}

/// A dedup key for an entry: a digest over its ExtIDs and content.
fn entry_hash(entry: &Entry) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for ext_id in &entry.ext_ids {
        hasher.update((ext_id.len() as u64).to_be_bytes());
        hasher.update(ext_id);
    }
    hasher.update((entry.content.len() as u64).to_be_bytes());
    hasher.update(&entry.content);
    hasher.finalize().into()
}

/// The bytes a signed entry's signature covers: `ext_ids[0] || ext_ids[1] || ext_ids[2] ||
/// content`, matching how [`crate::updater::DidUpdater`], [`crate::deactivator`], and
/// [`crate::version_upgrader`] build `data_to_sign` on the client side.
pub(crate) fn signing_preimage(entry: &Entry) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&entry.ext_ids[0]);
    data.extend_from_slice(&entry.ext_ids[1]);
    data.extend_from_slice(&entry.ext_ids[2]);
    data.extend_from_slice(&entry.content);
    data
}

/// Validates `ext_ids[2]` as a well-formed `did#alias` key identifier belonging to `did` — its
/// embedded chain id and network segment must match the chain this entry is being applied to —
/// and returns the alias. Every subsequent-entry processor resolves its signing key through
/// this, so a forged or cross-chain key id is rejected before the alias is ever looked up.
pub(crate) fn signing_alias<'a>(entry: &'a Entry, did: &str) -> Result<&'a str, String> {
    let signing_full_id = std::str::from_utf8(&entry.ext_ids[2]).map_err(|err| err.to_string())?;
    crate::validators::validate_full_key_identifier(signing_full_id).map_err(|err| err.to_string())?;
    if signing_full_id.strip_prefix(did).and_then(|rest| rest.strip_prefix('#')).is_none() {
        return Err(format!("signing key id `{signing_full_id}` does not belong to chain `{did}`"));
    }
    Ok(crate::entity::alias_of(signing_full_id))
}

/// Replays `entries` — the full, ordered entry log of the chain identified by `chain_id` on
/// `network` — into the DID's current state.
///
/// # Errors
///
/// Returns [`ResolverError::InvalidDidChain`] only if entry 0 is not a valid `DIDManagement`
/// entry; every other malformed entry is recorded in [`ResolutionResult::skipped_entries`] and
/// replay continues.
pub fn resolve(
    entries: &[Entry],
    chain_id: &str,
    network: Network,
) -> Result<ResolutionResult, ResolverError> {
    let did_id = Did::format_id(chain_id, network);
    let mut state = ResolutionState::new();
    let mut processed_hashes = HashSet::new();
    let mut skipped_entries = Vec::new();
    let mut keep_parsing = true;

    for (index, entry) in entries.iter().enumerate() {
        if !keep_parsing {
            skipped_entries
                .push(SkippedEntry { index, reason: "chain already deactivated".into() });
            continue;
        }

        if !processed_hashes.insert(entry_hash(entry)) {
            skipped_entries.push(SkippedEntry { index, reason: "duplicate entry".into() });
            continue;
        }

        if index == 0 {
            match create::process(entry, &did_id) {
                Ok(result) => {
                    for key in &result.management_keys {
                        state.all_keys.insert(key.identity());
                    }
                    for key in &result.did_keys {
                        state.all_keys.insert(key.identity());
                    }
                    state.management_keys =
                        result.management_keys.into_iter().map(|k| (k.alias.clone(), k)).collect();
                    state.did_keys =
                        result.did_keys.into_iter().map(|k| (k.alias.clone(), k)).collect();
                    state.services =
                        result.services.into_iter().map(|s| (s.alias.clone(), s)).collect();
                    state.method_version = Some(result.method_version);
                    tracing::debug!(chain_id, "applied genesis DIDManagement entry");
                }
                Err(reason) => return Err(ResolverError::InvalidDidChain(reason)),
            }
            continue;
        }

        if entry.ext_ids.len() < 4 {
            skipped_entries.push(SkippedEntry { index, reason: "fewer than 4 ExtIDs".into() });
            continue;
        }

        let Ok(type_str) = std::str::from_utf8(&entry.ext_ids[0]) else {
            skipped_entries.push(SkippedEntry { index, reason: "ExtID[0] is not UTF-8".into() });
            continue;
        };
        let Some(entry_type) = EntryType::from_str(type_str) else {
            skipped_entries
                .push(SkippedEntry { index, reason: format!("unknown entry type `{type_str}`") });
            continue;
        };
        let Ok(schema_version) = std::str::from_utf8(&entry.ext_ids[1]) else {
            skipped_entries.push(SkippedEntry { index, reason: "ExtID[1] is not UTF-8".into() });
            continue;
        };
        if schema_version != ENTRY_SCHEMA_V100 {
            skipped_entries.push(SkippedEntry {
                index,
                reason: format!("unsupported schema version `{schema_version}`"),
            });
            continue;
        }

        let outcome = match entry_type {
            EntryType::Create => Err("a DIDManagement entry is only valid as entry 0".to_string()),
            EntryType::Update => update::process(entry, &did_id, &mut state),
            EntryType::VersionUpgrade => version_upgrade::process(entry, &did_id, &mut state),
            EntryType::Deactivation => deactivate::process(entry, &did_id, &mut state),
        };

        match outcome {
            Ok(()) => {
                tracing::debug!(index, %entry_type, "applied entry");
            }
            Err(reason) => {
                tracing::debug!(index, %entry_type, %reason, "skipped entry");
                skipped_entries.push(SkippedEntry { index, reason });
            }
        }

        if state.deactivated {
            keep_parsing = false;
        }
    }

    let deactivated = state.deactivated;
    let did = Did::from_resolved_state(
        chain_id.to_string(),
        network,
        state.method_version.unwrap_or_default(),
        state.management_keys.into_values().collect(),
        state.did_keys.into_values().collect(),
        state.services.into_values().collect(),
    );

    Ok(ResolutionResult { did, deactivated, skipped_entries })
}
