//! Signature-scheme key material behind one uniform interface.
//!
//! Three concrete key types implement [`KeyMaterial`]: [`eddsa::Ed25519Key`],
//! [`ecdsa::EcdsaSecp256k1Key`], [`rsa_key::RsaKey`]. [`Key`] wraps all three as an enum rather
//! than a trait object, matching this crate's design note that key variance is expressed as a
//! closed set of variants, not an open inheritance hierarchy — every chain entry names one of
//! exactly three algorithms, so there is nothing for a trait object to buy us.

pub mod ecdsa;
pub mod eddsa;
pub mod rsa_key;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// The signature algorithm backing a management key or DID key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// Ed25519 / EdDSA.
    #[serde(rename = "EdDSA")]
    EdDSA,
    /// ECDSA over secp256k1.
    #[serde(rename = "ECDSA")]
    Ecdsa,
    /// RSA (PKCS#1 v1.5, SHA-256).
    #[serde(rename = "RSA")]
    Rsa,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::EdDSA => "EdDSA",
            Self::Ecdsa => "ECDSA",
            Self::Rsa => "RSA",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for KeyType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EdDSA" => Ok(Self::EdDSA),
            "ECDSA" => Ok(Self::Ecdsa),
            "RSA" => Ok(Self::Rsa),
            other => Err(ClientError::InvalidField {
                field: "key type",
                reason: format!("unknown key type `{other}`"),
            }),
        }
    }
}

/// Uniform operations every key algorithm implements.
pub trait KeyMaterial: Sized {
    /// Generates a fresh key pair.
    fn generate() -> Self;

    /// Reconstructs a verification-only key from its public key bytes.
    fn from_public(public_key: &[u8]) -> Result<Self, ClientError>;

    /// Reconstructs a key pair from its private key bytes, deriving the public key.
    fn from_private(private_key: &[u8]) -> Result<Self, ClientError>;

    /// Reconstructs a key pair from both public and private key bytes, verifying they
    /// correspond to the same key.
    fn from_key_pair(public_key: &[u8], private_key: &[u8]) -> Result<Self, ClientError>;

    /// Signs the SHA-256 digest of `message` with the private key.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Key`] if this key was constructed without a private key.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, ClientError>;

    /// Verifies `signature` over the SHA-256 digest of `message` against the public key.
    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;

    /// Raw public key bytes, in this algorithm's native encoding.
    fn public_key_bytes(&self) -> Vec<u8>;

    /// The `(field name, encoded value)` pair this key contributes to an entry's JSON.
    fn on_chain_encoding(&self) -> (&'static str, String);
}

/// A key of one of the three supported algorithms.
#[derive(Clone)]
pub enum Key {
    /// Ed25519 key material.
    Ed25519(eddsa::Ed25519Key),
    /// ECDSA secp256k1 key material.
    Ecdsa(ecdsa::EcdsaSecp256k1Key),
    /// RSA key material.
    Rsa(rsa_key::RsaKey),
}

impl Key {
    /// Generates a fresh key pair of the given algorithm.
    #[must_use]
    pub fn generate(key_type: KeyType) -> Self {
        match key_type {
            KeyType::EdDSA => Self::Ed25519(eddsa::Ed25519Key::generate()),
            KeyType::Ecdsa => Self::Ecdsa(ecdsa::EcdsaSecp256k1Key::generate()),
            KeyType::Rsa => Self::Rsa(rsa_key::RsaKey::generate()),
        }
    }

    /// The algorithm this key uses.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        match self {
            Self::Ed25519(_) => KeyType::EdDSA,
            Self::Ecdsa(_) => KeyType::Ecdsa,
            Self::Rsa(_) => KeyType::Rsa,
        }
    }

    /// Signs the SHA-256 digest of `message`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Key`] if this key has no private key material.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, ClientError> {
        match self {
            Self::Ed25519(key) => key.sign(message),
            Self::Ecdsa(key) => key.sign(message),
            Self::Rsa(key) => key.sign(message),
        }
    }

    /// Verifies `signature` over the SHA-256 digest of `message`.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self {
            Self::Ed25519(key) => key.verify(message, signature),
            Self::Ecdsa(key) => key.verify(message, signature),
            Self::Rsa(key) => key.verify(message, signature),
        }
    }

    /// Raw public key bytes in this algorithm's native encoding.
    #[must_use]
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.public_key_bytes(),
            Self::Ecdsa(key) => key.public_key_bytes(),
            Self::Rsa(key) => key.public_key_bytes(),
        }
    }

    /// The `(field name, encoded value)` pair this key contributes to an entry's JSON.
    #[must_use]
    pub fn on_chain_encoding(&self) -> (&'static str, String) {
        match self {
            Self::Ed25519(key) => key.on_chain_encoding(),
            Self::Ecdsa(key) => key.on_chain_encoding(),
            Self::Rsa(key) => key.on_chain_encoding(),
        }
    }

    /// Reconstructs a verification-only key from its on-chain encoding
    /// (`publicKeyBase58` for `EdDSA`/`Ecdsa`, `publicKeyPem` for `Rsa`).
    pub fn from_public_encoding(key_type: KeyType, encoded: &str) -> Result<Self, ClientError> {
        match key_type {
            KeyType::EdDSA => {
                let bytes = bs58::decode(encoded)
                    .into_vec()
                    .map_err(|err| ClientError::Key(format!("invalid base58: {err}")))?;
                Ok(Self::Ed25519(eddsa::Ed25519Key::from_public(&bytes)?))
            }
            KeyType::Ecdsa => {
                let bytes = bs58::decode(encoded)
                    .into_vec()
                    .map_err(|err| ClientError::Key(format!("invalid base58: {err}")))?;
                Ok(Self::Ecdsa(ecdsa::EcdsaSecp256k1Key::from_public(&bytes)?))
            }
            KeyType::Rsa => Ok(Self::Rsa(rsa_key::RsaKey::from_public_pem(encoded)?)),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("key_type", &self.key_type())
            .field("public_key", &self.on_chain_encoding().1)
            .finish()
    }
}
