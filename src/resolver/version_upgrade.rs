//! The `DIDMethodVersionUpgrade` entry processor.

use semver::Version;

use crate::entry::Entry;
use crate::resolver::{signing_alias, signing_preimage, ResolutionState};
use crate::schema::VersionUpgradeContent;

/// Parses, authorizes, and applies a `DIDMethodVersionUpgrade` entry against `state`.
pub fn process(entry: &Entry, did: &str, state: &mut ResolutionState) -> Result<(), String> {
    if state.method_version.as_deref() != Some("0.2.0") {
        return Err("DIDMethodVersionUpgrade entries require method version 0.2.0".into());
    }

    let alias = signing_alias(entry, did)?;
    let signing_key = state
        .management_keys
        .get(alias)
        .ok_or_else(|| format!("signing key `{alias}` is not an active management key"))?;
    if !signing_key.key.verify(&signing_preimage(entry), &entry.ext_ids[3]) {
        return Err(format!("signature verification failed for key `{alias}`"));
    }

    let content: VersionUpgradeContent =
        serde_json::from_slice(&entry.content).map_err(|err| err.to_string())?;

    let current = state.method_version.as_deref().unwrap_or_default();
    let current_version = Version::parse(current).map_err(|err| err.to_string())?;
    let new_version =
        Version::parse(&content.did_method_version).map_err(|err| err.to_string())?;
    if new_version <= current_version {
        return Err(format!(
            "version `{}` is not an upgrade over current version `{current}`",
            content.did_method_version
        ));
    }

    state.method_version = Some(content.did_method_version);
    Ok(())
}
