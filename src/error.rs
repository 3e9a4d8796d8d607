//! Public error types.
//!
//! The split mirrors where a mistake can originate: [`ClientError`] covers building a DID or
//! an entry locally, [`ResolverError`] covers replaying a chain's entry log. The resolver is
//! deliberately tolerant of malformed entries — see [`crate::resolver::ResolutionState`] — so
//! `ResolverError` has a single variant reserved for the one unrecoverable case.

use thiserror::Error;

/// Errors raised while constructing a [`crate::did::Did`] or exporting one of its entries.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An alias was reused across management keys, DID keys, or services.
    #[error("alias `{0}` is already in use on this DID")]
    DuplicateAlias(String),

    /// A value failed its format validator (alias, DID id, endpoint, key type, ...).
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Name of the field that failed validation.
        field: &'static str,
        /// Human-readable reason the value was rejected.
        reason: String,
    },

    /// An operation that requires at least one management key was attempted on a DID with
    /// none.
    #[error("DID has no management keys")]
    NoManagementKeys,

    /// A `Create` entry was built without any priority-0 management key.
    #[error("at least one management key with priority 0 is required")]
    MissingPriorityZeroKey,

    /// The lowest-priority available management key does not meet the priority ceiling
    /// required by the staged revocations/additions of an update.
    #[error("signing key priority {signing_priority} exceeds required priority {required}")]
    InsufficientPriority {
        /// Priority of the key that would have signed the entry.
        signing_priority: u32,
        /// Minimum priority required by the staged changes.
        required: u32,
    },

    /// A version-upgrade entry was requested with a new version that is not strictly greater
    /// than the DID's current method-spec version.
    #[error("new version `{new}` is not an upgrade over current version `{current}`")]
    NotAnUpgrade {
        /// Current method-spec version of the DID.
        current: String,
        /// Proposed new version.
        new: String,
    },

    /// The serialized entry (ExtIDs + content) exceeds [`crate::constants::ENTRY_SIZE_LIMIT`].
    #[error("entry size {size} exceeds limit of {limit} bytes")]
    EntryTooLarge {
        /// Computed entry size in bytes.
        size: usize,
        /// The configured limit.
        limit: usize,
    },

    /// A key operation (signing, decoding a stored key) failed.
    #[error("key error: {0}")]
    Key(String),

    /// Catch-all for invariant violations not covered by a more specific variant.
    #[error("{0}")]
    Other(String),
}

/// Errors raised while replaying a chain's entry log.
///
/// This is intentionally a near-empty enum: every malformed-entry condition other than a bad
/// entry 0 is recorded in [`crate::resolver::ResolutionState::skipped_entries`] rather than
/// surfaced as an error, since the replay itself must never abort partway through a chain.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Entry 0 of the chain was not a valid `DIDManagement` entry. Resolution cannot proceed
    /// without a valid genesis entry, so this is the sole fatal resolver error.
    #[error("entry 0 is not a valid DIDManagement entry: {0}")]
    InvalidDidChain(String),
}
