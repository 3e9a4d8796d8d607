//! RSA key material.
//!
//! Grounded on `original_source/src/client/keys/rsa.rs`: PKCS#1 v1.5 signatures over a SHA-256
//! digest, and an on-chain encoding of a PEM-formatted public key rather than a fixed-size
//! encoding (RSA key sizes are variable, unlike the two elliptic-curve schemes).

use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::sha2::Sha256;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};

use super::KeyMaterial;
use crate::error::ClientError;

/// Default modulus size for freshly generated RSA keys.
const DEFAULT_KEY_BITS: usize = 2048;

/// An RSA key pair, or a verification-only public key.
#[derive(Clone)]
pub struct RsaKey {
    signing_key: Option<RsaPrivateKey>,
    verifying_key: RsaPublicKey,
}

impl RsaKey {
    const ON_CHAIN_PUB_KEY_NAME: &'static str = "publicKeyPem";

    fn digest(message: &[u8]) -> [u8; 32] {
        use sha2::Digest as _;
        sha2::Sha256::digest(message).into()
    }
}

impl KeyMaterial for RsaKey {
    fn generate() -> Self {
        let signing_key =
            RsaPrivateKey::new(&mut OsRng, DEFAULT_KEY_BITS).expect("RSA key generation");
        let verifying_key = RsaPublicKey::from(&signing_key);
        Self { signing_key: Some(signing_key), verifying_key }
    }

    fn from_public(public_key: &[u8]) -> Result<Self, ClientError> {
        let verifying_key = RsaPublicKey::from_public_key_der(public_key)
            .map_err(|err| ClientError::Key(format!("invalid RSA public key: {err}")))?;
        Ok(Self { signing_key: None, verifying_key })
    }

    /// Reconstructs a verification-only key from a PEM-encoded public key, the on-chain
    /// encoding RSA keys actually use (unlike the fixed-width encodings of the other two
    /// algorithms, see [`KeyMaterial::on_chain_encoding`]).
    pub fn from_public_pem(pem: &str) -> Result<Self, ClientError> {
        let verifying_key = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|err| ClientError::Key(format!("invalid RSA public key PEM: {err}")))?;
        Ok(Self { signing_key: None, verifying_key })
    }

    fn from_private(private_key: &[u8]) -> Result<Self, ClientError> {
        let signing_key = RsaPrivateKey::from_pkcs8_der(private_key)
            .map_err(|err| ClientError::Key(format!("invalid RSA private key: {err}")))?;
        let verifying_key = RsaPublicKey::from(&signing_key);
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
        signing_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &Self::digest(message))
            .map_err(|err| ClientError::Key(format!("RSA signing failed: {err}")))
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.verifying_key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &Self::digest(message), signature)
            .is_ok()
    }

    fn public_key_bytes(&self) -> Vec<u8> {
        self.verifying_key.to_public_key_der().map(|der| der.as_bytes().to_vec()).unwrap_or_default()
    }

    fn on_chain_encoding(&self) -> (&'static str, String) {
        let pem = self
            .verifying_key
            .to_public_key_pem(rsa::pkcs8::LineEnding::LF)
            .unwrap_or_default();
        (Self::ON_CHAIN_PUB_KEY_NAME, pem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let key = RsaKey::generate();
        let sig = key.sign(b"hello").expect("sign");
        assert!(key.verify(b"hello", &sig));
        assert!(!key.verify(b"goodbye", &sig));
    }

    #[test]
    fn on_chain_encoding_is_pem() {
        let key = RsaKey::generate();
        let (field, value) = key.on_chain_encoding();
        assert_eq!(field, "publicKeyPem");
        assert!(value.starts_with("-----BEGIN PUBLIC KEY-----"));
    }
}
