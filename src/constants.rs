//! Wire-format constants for the `did:factom` method.

/// Entry schema version used by every entry this crate produces.
pub const ENTRY_SCHEMA_V100: &str = "1.0.0";

/// The `did:factom` method name, as it appears in a DID string.
pub const DID_METHOD_NAME: &str = "did:factom";

/// The method-spec version understood by the resolver's `Update` processor.
///
/// `Update` entries are only processed against DID state produced under this spec version;
/// a DID that has not yet upgraded to it cannot have its `Update` entries applied.
pub const DID_METHOD_SPEC_V020: &str = "0.2.0";

/// Maximum serialized size, in bytes, of a single chain entry.
pub const ENTRY_SIZE_LIMIT: usize = 10_275;

/// Fixed per-entry overhead counted by [`crate::blockchain::calculate_entry_size`].
pub const ENTRY_SIZE_FIXED_OVERHEAD: usize = 35;
