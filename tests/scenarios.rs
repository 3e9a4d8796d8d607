//! End-to-end resolution scenarios: build a chain's entry log, replay it, check the result.

use factom_did::{resolve, Did, DidKeyPurpose, Entry, EntryType, KeyType, ManagementKey, Network};

/// Builds a signed `Update`/`VersionUpgrade`/`Deactivation` entry for `content`, signed by
/// `signing_key` — bypassing the client-side builders so tests can exercise signers and
/// content the builders themselves would refuse to produce.
fn sign_entry(
    entry_type: EntryType,
    signing_key: &ManagementKey,
    did_id: &str,
    content: Vec<u8>,
) -> Entry {
    let full_signing_key_id = format!("{did_id}#{}", signing_key.alias);
    let mut preimage = Vec::new();
    preimage.extend_from_slice(entry_type.as_str().as_bytes());
    preimage.extend_from_slice(b"1.0.0");
    preimage.extend_from_slice(full_signing_key_id.as_bytes());
    preimage.extend_from_slice(&content);
    let signature = signing_key.key.sign(&preimage).expect("sign");
    let ext_ids = vec![
        entry_type.as_str().as_bytes().to_vec(),
        b"1.0.0".to_vec(),
        full_signing_key_id.into_bytes(),
        signature,
    ];
    Entry::new(ext_ids, content)
}

#[test]
fn fresh_did_on_testnet() {
    let mut did = Did::new(Network::Testnet);
    did.management_key("my-key", 0, KeyType::EdDSA, None, None).expect("add key");
    let entry = did.export_create_entry().expect("export");

    assert!(did.id().starts_with("did:factom:testnet:"));
    assert_eq!(did.chain_id().len(), 64);
    assert_eq!(entry.ext_ids[0], b"DIDManagement");
    assert_eq!(entry.ext_ids[1], b"1.0.0");
    assert_eq!(entry.ext_ids[2].len(), 32);
}

#[test]
fn wrong_priority_signer_is_skipped_then_correct_signer_applies() {
    let mut did = Did::new(Network::Unspecified);
    did.management_key("my-key", 0, KeyType::EdDSA, None, None).expect("add my-key");
    did.management_key("k1", 1, KeyType::EdDSA, None, None).expect("add k1");
    let create = did.export_create_entry().expect("create");
    let did_id = did.id();
    let my_key = did.management_keys()[0].clone();
    let k1 = did.management_keys()[1].clone();

    let revoke_my_key = serde_json::json!({ "revoke": { "managementKey": [{ "id": "my-key" }] } });
    let content = factom_did::canonical::to_canonical_vec(&revoke_my_key).expect("canonical");

    // k1 (priority 1) cannot revoke a priority-0 key with no explicit priorityRequirement.
    let bad = sign_entry(EntryType::Update, &k1, &did_id, content.clone());

    // my-key revokes itself, simultaneously installing a successor priority-0 key so the
    // priority-0 invariant survives the update.
    let revoke_and_replace = serde_json::json!({
        "revoke": { "managementKey": [{ "id": "my-key" }] },
        "add": { "managementKey": [{
            "id": format!("{did_id}#successor"),
            "type": "EdDSA",
            "controller": did_id,
            "priority": 0,
            "priorityRequirement": null,
            "publicKeyBase58": factom_did::Key::generate(KeyType::EdDSA).on_chain_encoding().1,
        }] },
    });
    let good_content =
        factom_did::canonical::to_canonical_vec(&revoke_and_replace).expect("canonical");
    let good = sign_entry(EntryType::Update, &my_key, &did_id, good_content);

    let result = resolve(&[create, bad, good], did.chain_id(), Network::Unspecified).expect("resolve");
    assert_eq!(result.skipped_entries.len(), 1);
    assert!(!result.did.management_keys().iter().any(|k| k.alias == "my-key"));
    assert!(result.did.management_keys().iter().any(|k| k.alias == "k1"));
    assert!(result.did.management_keys().iter().any(|k| k.alias == "successor" && k.priority == 0));
}

#[test]
fn purpose_revocation_leaves_remaining_purpose() {
    let mut did = Did::new(Network::Unspecified);
    did.management_key("my-key", 0, KeyType::EdDSA, None, None).expect("add key");
    did.did_key(
        "auth-and-pub",
        vec![DidKeyPurpose::PublicKey, DidKeyPurpose::AuthenticationKey],
        KeyType::EdDSA,
        None,
        None,
    )
    .expect("add did key");
    let create = did.export_create_entry().expect("create");
    let did_id = did.id();
    let signing_key = did.management_keys()[0].clone();

    let revoke_purpose = serde_json::json!({
        "revoke": { "didKey": [{ "id": "auth-and-pub", "purpose": ["publicKey"] }] },
    });
    let content = factom_did::canonical::to_canonical_vec(&revoke_purpose).expect("canonical");
    let update = sign_entry(EntryType::Update, &signing_key, &did_id, content);

    let result = resolve(&[create, update], did.chain_id(), Network::Unspecified).expect("resolve");
    let key = result
        .did
        .did_keys()
        .iter()
        .find(|k| k.alias == "auth-and-pub")
        .expect("key still active");
    assert_eq!(key.purpose, vec![DidKeyPurpose::AuthenticationKey]);
}

#[test]
fn self_revocation_rule_forces_signer_out() {
    let mut did = Did::new(Network::Unspecified);
    did.management_key("my-key", 0, KeyType::EdDSA, None, None).expect("add my-key");
    did.management_key("k1", 1, KeyType::EdDSA, None, None).expect("add k1");
    let create = did.export_create_entry().expect("create");
    let did_id = did.id();
    let k1 = did.management_keys()[1].clone();

    let add_peer = serde_json::json!({
        "add": { "managementKey": [{
            "id": format!("{did_id}#k2"),
            "type": "EdDSA",
            "controller": did_id,
            "priority": 1,
            "priorityRequirement": null,
            "publicKeyBase58": factom_did::Key::generate(KeyType::EdDSA).on_chain_encoding().1,
        }] },
    });
    let content = factom_did::canonical::to_canonical_vec(&add_peer).expect("canonical");
    let update = sign_entry(EntryType::Update, &k1, &did_id, content);

    let result = resolve(&[create, update], did.chain_id(), Network::Unspecified).expect("resolve");
    assert!(result.skipped_entries.is_empty());
    assert!(!result.did.management_keys().iter().any(|k| k.alias == "k1"));
    assert!(result.did.management_keys().iter().any(|k| k.alias == "k2"));
    assert!(result.did.management_keys().iter().any(|k| k.alias == "my-key"));
}

#[test]
fn version_upgrade_skips_non_upgrade_then_applies_real_upgrade() {
    let mut did = Did::new(Network::Unspecified);
    did.management_key("my-key", 0, KeyType::EdDSA, None, None).expect("add key");
    let create = did.export_create_entry().expect("create");
    let did_id = did.id();
    let signing_key = did.management_keys()[0].clone();

    let same_version = factom_did::canonical::to_canonical_vec(
        &serde_json::json!({ "didMethodVersion": "0.2.0" }),
    )
    .expect("canonical");
    let not_an_upgrade = sign_entry(EntryType::VersionUpgrade, &signing_key, &did_id, same_version);

    let next_version = factom_did::canonical::to_canonical_vec(
        &serde_json::json!({ "didMethodVersion": "0.3.0" }),
    )
    .expect("canonical");
    let upgrade = sign_entry(EntryType::VersionUpgrade, &signing_key, &did_id, next_version);

    let result =
        resolve(&[create, not_an_upgrade, upgrade], did.chain_id(), Network::Unspecified).expect("resolve");
    assert_eq!(result.skipped_entries.len(), 1);
    assert_eq!(result.did.spec_version(), "0.3.0");
}

#[test]
fn deactivation_empties_state_and_stops_replay() {
    let mut did = Did::new(Network::Unspecified);
    did.management_key("my-key", 0, KeyType::EdDSA, None, None).expect("add key");
    let create = did.export_create_entry().expect("create");
    let deactivation = factom_did::deactivator::export_deactivation_entry(&did).expect("deactivate");

    let did_id = did.id();
    let signing_key = did.management_keys()[0].clone();
    let trailing_content = factom_did::canonical::to_canonical_vec(&serde_json::json!({
        "add": { "managementKey": [{
            "id": format!("{did_id}#late"),
            "type": "EdDSA",
            "controller": did_id,
            "priority": 1,
            "priorityRequirement": null,
            "publicKeyBase58": factom_did::Key::generate(KeyType::EdDSA).on_chain_encoding().1,
        }] },
    }))
    .expect("canonical");
    let trailing = sign_entry(EntryType::Update, &signing_key, &did_id, trailing_content);

    let result =
        resolve(&[create, deactivation, trailing], did.chain_id(), Network::Unspecified).expect("resolve");
    assert!(result.deactivated);
    assert!(result.did.management_keys().is_empty());
    assert!(result.did.did_keys().is_empty());
    assert!(result.did.services().is_empty());
    assert_eq!(result.skipped_entries.len(), 1);
}
