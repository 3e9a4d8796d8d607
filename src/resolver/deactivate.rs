//! The `DIDDeactivation` entry processor: terminally empties a DID's active state.

use crate::entry::Entry;
use crate::resolver::{signing_alias, signing_preimage, ResolutionState};

/// Parses, authorizes, and applies a `DIDDeactivation` entry against `state`.
///
/// On success, every active management key, DID key, and service is cleared, and
/// [`ResolutionState::deactivated`] is set so that [`crate::resolver::resolve`] stops replaying
/// any further entries.
pub fn process(entry: &Entry, did: &str, state: &mut ResolutionState) -> Result<(), String> {
    if state.method_version.as_deref() != Some("0.2.0") {
        return Err("DIDDeactivation entries require method version 0.2.0".into());
    }
    if !entry.content.is_empty() {
        return Err("DIDDeactivation entry must carry no content".into());
    }

    let alias = signing_alias(entry, did)?;
    let signing_key = state
        .management_keys
        .get(alias)
        .ok_or_else(|| format!("signing key `{alias}` is not an active management key"))?;
    if signing_key.priority != 0 {
        return Err(format!("signing key `{alias}` is not priority 0"));
    }
    if !signing_key.key.verify(&signing_preimage(entry), &entry.ext_ids[3]) {
        return Err(format!("signature verification failed for key `{alias}`"));
    }

    state.management_keys.clear();
    state.did_keys.clear();
    state.services.clear();
    state.deactivated = true;
    Ok(())
}
