//! Chain entry shape: `EntryType` and the raw `Entry` (ExtIDs + content) every builder
//! produces and the resolver consumes.

use std::fmt;

/// The four entry types defined by the method spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Establishes a new DID (must be entry 0 of its chain).
    Create,
    /// Revokes/adds management keys, DID keys, and services.
    Update,
    /// Upgrades the DID to a newer method-spec version.
    VersionUpgrade,
    /// Terminally deactivates the DID.
    Deactivation,
}

impl EntryType {
    /// The wire string used as `ext_ids[0]`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "DIDManagement",
            Self::Update => "DIDUpdate",
            Self::VersionUpgrade => "DIDMethodVersionUpgrade",
            Self::Deactivation => "DIDDeactivation",
        }
    }

    /// Parses `ext_ids[0]` back into an [`EntryType`].
    #[must_use]
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "DIDManagement" => Some(Self::Create),
            "DIDUpdate" => Some(Self::Update),
            "DIDMethodVersionUpgrade" => Some(Self::VersionUpgrade),
            "DIDDeactivation" => Some(Self::Deactivation),
            _ => None,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw chain entry: an ordered list of ExtIDs and a content payload.
///
/// This is the shape builders produce and the resolver replays; it has no opinion on how it
/// is actually recorded on-chain (that is explicitly out of scope — see `spec.md`'s Non-goals).
#[derive(Debug, Clone)]
pub struct Entry {
    /// The entry's ExtIDs, in order.
    pub ext_ids: Vec<Vec<u8>>,
    /// The entry's content payload.
    pub content: Vec<u8>,
}

impl Entry {
    /// Builds an entry from owned ExtIDs and content.
    #[must_use]
    pub const fn new(ext_ids: Vec<Vec<u8>>, content: Vec<u8>) -> Self {
        Self { ext_ids, content }
    }

    /// Computes this entry's serialized size per [`crate::blockchain::calculate_entry_size`].
    #[must_use]
    pub fn size(&self) -> usize {
        let refs: Vec<&[u8]> = self.ext_ids.iter().map(Vec::as_slice).collect();
        crate::blockchain::calculate_entry_size(&refs, &self.content)
    }

    /// This entry's type, parsed from `ext_ids[0]`, if present and recognized.
    #[must_use]
    pub fn entry_type(&self) -> Option<EntryType> {
        let first = self.ext_ids.first()?;
        EntryType::from_str(std::str::from_utf8(first).ok()?)
    }
}
