//! The `Network` segment of a `did:factom` identifier.

use std::fmt;

/// Which Factom network a DID is anchored to.
///
/// `Unspecified` DIDs omit the network segment entirely (`did:factom:<chain-id>` rather than
/// `did:factom:mainnet:<chain-id>`), and resolve against whichever chain the caller supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// `did:factom:mainnet:...`
    Mainnet,
    /// `did:factom:testnet:...`
    Testnet,
    /// `did:factom:...` with no network segment.
    #[default]
    Unspecified,
}

impl Network {
    /// The network segment as it appears in a DID string, or `None` when unspecified.
    #[must_use]
    pub const fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Mainnet => Some("mainnet"),
            Self::Testnet => Some("testnet"),
            Self::Unspecified => None,
        }
    }

    /// Parses the network segment of a DID string, if present.
    #[must_use]
    pub fn from_segment(segment: Option<&str>) -> Self {
        match segment {
            Some("mainnet") => Self::Mainnet,
            Some("testnet") => Self::Testnet,
            _ => Self::Unspecified,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(segment) => write!(f, "{segment}"),
            None => Ok(()),
        }
    }
}
