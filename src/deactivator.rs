//! `DIDDeactivator`: builds the terminal `Deactivation` entry for a DID.
//!
//! Grounded on `original_source/src/client/deactivator.rs`. Deactivation must be signed by a
//! priority-0 management key; there is no content to encode.

use crate::blockchain::calculate_entry_size;
use crate::constants::{ENTRY_SCHEMA_V100, ENTRY_SIZE_LIMIT};
use crate::did::Did;
use crate::entry::{Entry, EntryType};
use crate::error::ClientError;

/// Builds a signed `DIDDeactivation` entry for `did`.
///
/// # Errors
///
/// Returns [`ClientError::NoManagementKeys`] if the DID has no management keys, or
/// [`ClientError::InsufficientPriority`] if the lowest-priority-number available key is not
/// priority 0.
pub fn export_deactivation_entry(did: &Did) -> Result<Entry, ClientError> {
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

    let full_signing_key_id = signing_key.full_id(&did.id());
    let mut data_to_sign = Vec::new();
    data_to_sign.extend_from_slice(EntryType::Deactivation.as_str().as_bytes());
    data_to_sign.extend_from_slice(ENTRY_SCHEMA_V100.as_bytes());
    data_to_sign.extend_from_slice(full_signing_key_id.as_bytes());
    let signature = signing_key.key.sign(&data_to_sign)?;

    let ext_ids: Vec<Vec<u8>> = vec![
        EntryType::Deactivation.as_str().as_bytes().to_vec(),
        ENTRY_SCHEMA_V100.as_bytes().to_vec(),
        full_signing_key_id.into_bytes(),
        signature,
    ];
    let content: Vec<u8> = Vec::new();
    let ext_id_refs: Vec<&[u8]> = ext_ids.iter().map(Vec::as_slice).collect();
    let size = calculate_entry_size(&ext_id_refs, &content);
    if size > ENTRY_SIZE_LIMIT {
        return Err(ClientError::EntryTooLarge { size, limit: ENTRY_SIZE_LIMIT });
    }
    tracing::trace!(did = %did.id(), "built Deactivation entry");
    Ok(Entry::new(ext_ids, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyType;
    use crate::network::Network;

    #[test]
    fn requires_priority_zero_signer() {
        let mut did = Did::new(Network::Unspecified);
        did.management_key("m1", 1, KeyType::EdDSA, None, None).expect("add key");
        assert!(matches!(
            export_deactivation_entry(&did),
            Err(ClientError::InsufficientPriority { .. })
        ));
    }

    #[test]
    fn builds_entry_with_empty_content() {
        let mut did = Did::new(Network::Unspecified);
        did.management_key("m1", 0, KeyType::EdDSA, None, None).expect("add key");
        let entry = export_deactivation_entry(&did).expect("export");
        assert!(entry.content.is_empty());
        assert_eq!(entry.entry_type(), Some(EntryType::Deactivation));
    }
}
