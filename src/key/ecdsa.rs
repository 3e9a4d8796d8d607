//! ECDSA secp256k1 key material.
//!
//! Grounded on `original_source/src/client/keys/ecdsa.rs`. Public keys are encoded as the raw
//! 64-byte `X || Y` curve point (no SEC1 prefix byte), matching the original implementation's
//! `VerifyingKey.to_string()` representation; signatures are fixed-size 64-byte `r || s`.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use super::KeyMaterial;
use crate::error::ClientError;

/// An ECDSA secp256k1 key pair, or a verification-only public key.
#[derive(Clone)]
pub struct EcdsaSecp256k1Key {
    signing_key: Option<SigningKey>,
    verifying_key: VerifyingKey,
}

impl EcdsaSecp256k1Key {
    const ON_CHAIN_PUB_KEY_NAME: &'static str = "publicKeyBase58";

    fn digest(message: &[u8]) -> [u8; 32] {
        Sha256::digest(message).into()
    }

    fn encode_point(key: &VerifyingKey) -> Vec<u8> {
        key.to_encoded_point(false).as_bytes()[1..].to_vec()
    }

    fn decode_point(bytes: &[u8]) -> Result<VerifyingKey, ClientError> {
        if bytes.len() != 64 {
            return Err(ClientError::Key(
                "ECDSA public key must be a 64-byte encoded secp256k1 curve point".into(),
            ));
        }
        let mut sec1 = Vec::with_capacity(65);
        sec1.push(0x04);
        sec1.extend_from_slice(bytes);
        VerifyingKey::from_sec1_bytes(&sec1)
            .map_err(|err| ClientError::Key(format!("invalid ECDSA public key: {err}")))
    }
}

impl KeyMaterial for EcdsaSecp256k1Key {
    fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = *signing_key.verifying_key();
        Self { signing_key: Some(signing_key), verifying_key }
    }

    fn from_public(public_key: &[u8]) -> Result<Self, ClientError> {
        let verifying_key = Self::decode_point(public_key)?;
        Ok(Self { signing_key: None, verifying_key })
    }

    fn from_private(private_key: &[u8]) -> Result<Self, ClientError> {
        let signing_key = SigningKey::from_slice(private_key).map_err(|_| {
            ClientError::Key("ECDSA private key must be a 32-byte secret scalar".into())
        })?;
        let verifying_key = *signing_key.verifying_key();
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
        let signature: Signature = signing_key
            .sign_prehash(&Self::digest(message))
            .map_err(|err| ClientError::Key(format!("ECDSA signing failed: {err}")))?;
        Ok(signature.to_bytes().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        self.verifying_key.verify_prehash(&Self::digest(message), &signature).is_ok()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        Self::encode_point(&self.verifying_key)
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
        let key = EcdsaSecp256k1Key::generate();
        let sig = key.sign(b"hello").expect("sign");
        assert!(key.verify(b"hello", &sig));
        assert!(!key.verify(b"goodbye", &sig));
    }

    #[test]
    fn public_key_is_64_bytes() {
        let key = EcdsaSecp256k1Key::generate();
        assert_eq!(key.public_key_bytes().len(), 64);
    }
}
