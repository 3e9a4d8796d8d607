//! Ed25519 key material.
//!
//! Grounded on `original_source/src/client/keys/eddsa.rs`: messages are SHA-256 hashed before
//! being handed to the signature algorithm, and the on-chain encoding is plain base58 under
//! the `publicKeyBase58` field name.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use super::KeyMaterial;
use crate::error::ClientError;

/// An Ed25519 key pair, or a verification-only public key.
#[derive(Clone)]
pub struct Ed25519Key {
    signing_key: Option<SigningKey>,
    verifying_key: VerifyingKey,
}

impl Ed25519Key {
    const ON_CHAIN_PUB_KEY_NAME: &'static str = "publicKeyBase58";

    fn digest(message: &[u8]) -> [u8; 32] {
        Sha256::digest(message).into()
    }
}

impl KeyMaterial for Ed25519Key {
    fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();
        Self { signing_key: Some(signing_key), verifying_key }
    }

    fn from_public(public_key: &[u8]) -> Result<Self, ClientError> {
        let bytes: [u8; 32] = public_key
            .try_into()
            .map_err(|_| ClientError::Key("Ed25519 public key must be 32 bytes".into()))?;
        let verifying_key = VerifyingKey::from_bytes(&bytes)
            .map_err(|err| ClientError::Key(format!("invalid Ed25519 public key: {err}")))?;
        Ok(Self { signing_key: None, verifying_key })
    }

    fn from_private(private_key: &[u8]) -> Result<Self, ClientError> {
        let bytes: [u8; 32] = private_key
            .try_into()
            .map_err(|_| ClientError::Key("Ed25519 private key must be a 32-byte seed".into()))?;
        let signing_key = SigningKey::from_bytes(&bytes);
        let verifying_key = signing_key.verifying_key();
        Ok(Self { signing_key: Some(signing_key), verifying_key })
    }

    fn from_key_pair(public_key: &[u8], private_key: &[u8]) -> Result<Self, ClientError> {
        let derived = Self::from_private(private_key)?;
        if derived.public_key_bytes() != public_key {
            return Err(ClientError::Key(
                "provided public key does not match the one derived from the private key".into(),
            ));
        }
        Ok(derived)
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, ClientError> {
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or_else(|| ClientError::Key("no private key set for signing".into()))?;
        let signature: Signature = signing_key.sign(&Self::digest(message));
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_bytes);
        self.verifying_key.verify(&Self::digest(message), &signature).is_ok()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.verifying_key.to_bytes().to_vec()
    }

    fn on_chain_encoding(&self) -> (&'static str, String) {
        (Self::ON_CHAIN_PUB_KEY_NAME, bs58::encode(self.public_key_bytes()).into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let key = Ed25519Key::generate();
        let sig = key.sign(b"hello").expect("sign");
        assert!(key.verify(b"hello", &sig));
        assert!(!key.verify(b"goodbye", &sig));
    }

    #[test]
    fn public_only_key_cannot_sign() {
        let full = Ed25519Key::generate();
        let public_only = Ed25519Key::from_public(&full.public_key_bytes()).expect("from_public");
        assert!(public_only.sign(b"hello").is_err());
    }

    #[test]
    fn key_pair_with_mismatched_public_key_is_rejected() {
        let a = Ed25519Key::generate();
        let b = Ed25519Key::generate();
        let private_bytes = a.signing_key.as_ref().expect("has private key").to_bytes();
        assert!(Ed25519Key::from_key_pair(&b.public_key_bytes(), &private_bytes).is_err());
    }
}
