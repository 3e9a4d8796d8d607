//! Wire-shape snapshots: pins the exact JSON this crate emits for entry content, since any
//! accidental reshaping here would silently break signature compatibility with other
//! implementations of this method.

use factom_did::{Did, KeyType, Network};

#[test]
fn create_entry_content_shape() {
    let mut did = Did::new(Network::Mainnet);
    did.management_key("my-key", 0, KeyType::EdDSA, None, None).expect("add key");
    let entry = did.export_create_entry().expect("export");
    let content: serde_json::Value = serde_json::from_slice(&entry.content).expect("valid json");

    insta::assert_json_snapshot!(content, {
        ".managementKey[0].id" => "[id]",
        ".managementKey[0].controller" => "[controller]",
        ".managementKey[0].publicKeyBase58" => "[pubkey]",
    });
}
