//! A client and resolver for the `did:factom` method: a DID whose authoritative state is an
//! append-only sequence of entries on a content-addressed chain.
//!
//! The [`did`] module builds a fresh DID and its genesis `Create` entry; [`updater`],
//! [`deactivator`], and [`version_upgrader`] build the three kinds of follow-up entry a
//! controller can sign. The [`resolver`] module replays an entry log, produced by any client,
//! back into the DID's current state. Everything in between — the entry wire format, key
//! algorithms, format validators — is shared by both directions.
//!
//! This crate has no opinion on how entries actually reach or are fetched from a chain; that
//! transport is out of scope (see the method specification's Non-goals). Callers supply an
//! ordered `&[Entry]` to [`resolver::resolve`] and get an `Entry` back from the builders.

pub mod blockchain;
pub mod canonical;
pub mod constants;
pub mod deactivator;
pub mod did;
pub mod entity;
pub mod entry;
pub mod error;
pub mod key;
pub mod network;
pub mod resolver;
pub mod schema;
pub mod updater;
pub mod validators;
pub mod version_upgrader;

pub use did::Did;
pub use entity::{DidKey, DidKeyPurpose, ManagementKey, Service};
pub use entry::{Entry, EntryType};
pub use error::{ClientError, ResolverError};
pub use key::{Key, KeyMaterial, KeyType};
pub use network::Network;
pub use resolver::{resolve, ResolutionResult, SkippedEntry};
pub use updater::DidUpdater;
