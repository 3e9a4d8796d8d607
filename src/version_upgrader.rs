//! `DIDVersionUpgrader`: builds a `VersionUpgrade` entry raising the DID's method-spec
//! version.
//!
//! Grounded on `original_source/src/client/version_upgrader.rs`. Real semver ordering (not
//! lexicographic) gates whether the requested version is actually an upgrade, per this
//! crate's design note.

use semver::Version;
use serde_json::json;

use crate::blockchain::calculate_entry_size;
use crate::constants::{ENTRY_SCHEMA_V100, ENTRY_SIZE_LIMIT};
use crate::did::Did;
use crate::entry::{Entry, EntryType};
use crate::error::ClientError;

/// Builds a signed `DIDMethodVersionUpgrade` entry moving `did` to `new_version`.
///
/// # Errors
///
/// Returns [`ClientError::NotAnUpgrade`] if `new_version` does not compare greater than the
/// DID's current spec version, [`ClientError::NoManagementKeys`]/`InsufficientPriority` if no
/// priority-0 management key is available to sign, or [`ClientError::EntryTooLarge`] if the
/// entry exceeds the size limit.
pub fn export_version_upgrade_entry(did: &Did, new_version: &str) -> Result<Entry, ClientError> {
    let current = Version::parse(did.spec_version())
        .map_err(|err| ClientError::Other(format!("invalid current spec version: {err}")))?;
    let requested = Version::parse(new_version)
        .map_err(|err| ClientError::Other(format!("invalid requested spec version: {err}")))?;
    if requested <= current {
        return Err(ClientError::NotAnUpgrade {
            current: did.spec_version().to_string(),
            new: new_version.to_string(),
        });
    }

    let signing_key = did
        .management_keys()
        .iter()
        .min_by_key(|k| k.priority)
        .ok_or(ClientError::NoManagementKeys)?;
    if signing_key.priority != 0 {
        return Err(ClientError::InsufficientPriority {
            signing_priority: signing_key.priority,
            required: 0,
        });
    }

    let content = crate::canonical::to_canonical_vec(&json!({ "didMethodVersion": new_version }))?;
    let full_signing_key_id = signing_key.full_id(&did.id());
    let mut data_to_sign = Vec::new();
    data_to_sign.extend_from_slice(EntryType::VersionUpgrade.as_str().as_bytes());
    data_to_sign.extend_from_slice(ENTRY_SCHEMA_V100.as_bytes());
    data_to_sign.extend_from_slice(full_signing_key_id.as_bytes());
    data_to_sign.extend_from_slice(&content);
    let signature = signing_key.key.sign(&data_to_sign)?;

    let ext_ids: Vec<Vec<u8>> = vec![
        EntryType::VersionUpgrade.as_str().as_bytes().to_vec(),
        ENTRY_SCHEMA_V100.as_bytes().to_vec(),
        full_signing_key_id.into_bytes(),
        signature,
    ];
    let ext_id_refs: Vec<&[u8]> = ext_ids.iter().map(Vec::as_slice).collect();
    let size = calculate_entry_size(&ext_id_refs, &content);
    if size > ENTRY_SIZE_LIMIT {
        return Err(ClientError::EntryTooLarge { size, limit: ENTRY_SIZE_LIMIT });
    }
    tracing::trace!(did = %did.id(), new_version, "built VersionUpgrade entry");
    Ok(Entry::new(ext_ids, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyType;
    use crate::network::Network;

    #[test]
    fn rejects_non_upgrade_version() {
        let mut did = Did::new(Network::Unspecified);
        did.management_key("m1", 0, KeyType::EdDSA, None, None).expect("add key");
        assert!(matches!(
            export_version_upgrade_entry(&did, "0.1.0"),
            Err(ClientError::NotAnUpgrade { .. })
        ));
        assert!(matches!(
            export_version_upgrade_entry(&did, "0.2.0"),
            Err(ClientError::NotAnUpgrade { .. })
        ));
    }

    #[test]
    fn accepts_semver_greater_version() {
        let mut did = Did::new(Network::Unspecified);
        did.management_key("m1", 0, KeyType::EdDSA, None, None).expect("add key");
        let entry = export_version_upgrade_entry(&did, "0.3.0").expect("export");
        assert_eq!(entry.entry_type(), Some(EntryType::VersionUpgrade));
    }
}
