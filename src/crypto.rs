//! Signing primitives for the Veritas injector (secp256k1)
//!
//! Transactions and batches carry their signer's compressed public key and
//! their signature as lowercase hex strings; this module is the only place
//! that touches raw key material.

use crate::error::{InjectorError, Result};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use secp256k1::{
    constants::{COMPACT_SIGNATURE_SIZE, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE},
    ecdsa::Signature,
    All, Message, PublicKey, Secp256k1, SecretKey,
};
use sha2::{Digest, Sha256};

/// A thread-safe, lazily initialized Secp256k1 context.
/// This prevents repeated, unnecessary context creation.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// The signing capability the injector requires of its caller.
///
/// Implementations must be deterministic for a given key and safe to share
/// across the block-production pipeline's threads. The injector never retries
/// a failed signature; errors abort the whole `block_start` call.
pub trait Signer: Send + Sync {
    /// The compressed public key as lowercase hex (66 characters).
    fn public_key_hex(&self) -> String;

    /// Signs `message` (the exact serialized header bytes) and returns the
    /// compact ECDSA signature bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random KeyPair using the OS random number generator.
    pub fn generate() -> Result<Self> {
        let secret_key = SecretKey::new(&mut OsRng);
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);

        Ok(KeyPair {
            secret_key,
            public_key,
        })
    }

    /// Creates a KeyPair from an existing SecretKey.
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key);
        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Creates a KeyPair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                InjectorError::CryptoError(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                InjectorError::CryptoError(format!("Invalid secret key bytes: {}", e))
            }
        })?;

        Ok(Self::from_secret_key(secret_key))
    }

    /// Returns the KeyPair's public key as a compressed byte array.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.public_key.serialize()
    }

    /// Signs a message (hashed with SHA-256 first) and returns the compact
    /// signature bytes.
    pub fn sign_compact(&self, message: &[u8]) -> Result<[u8; COMPACT_SIGNATURE_SIZE]> {
        let digest = Sha256::digest(message);

        let message = Message::from_digest_slice(&digest)
            .map_err(|e| InjectorError::CryptoError(format!("Failed to create message: {}", e)))?;

        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret_key);

        Ok(signature.serialize_compact())
    }
}

impl Signer for KeyPair {
    fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.sign_compact(message)
            .map(|sig| sig.to_vec())
            .map_err(|e| InjectorError::SigningError(e.to_string()))
    }
}

/// Verifies an ECDSA signature given the raw public key bytes, message, and
/// signature bytes.
pub fn verify_signature(
    public_key_bytes: &[u8],
    message: &[u8],
    signature_bytes: &[u8],
) -> Result<()> {
    if public_key_bytes.len() != PUBLIC_KEY_SIZE {
        return Err(InjectorError::CryptoError(format!(
            "Public key must be exactly {} bytes (compressed), got {}",
            PUBLIC_KEY_SIZE,
            public_key_bytes.len()
        )));
    }
    if signature_bytes.len() != COMPACT_SIGNATURE_SIZE {
        return Err(InjectorError::CryptoError(format!(
            "Signature must be exactly {} bytes (compact), got {}",
            COMPACT_SIGNATURE_SIZE,
            signature_bytes.len()
        )));
    }

    let public_key = PublicKey::from_slice(public_key_bytes)
        .map_err(|e| InjectorError::CryptoError(format!("Invalid public key: {}", e)))?;

    let digest = Sha256::digest(message);

    let message = Message::from_digest_slice(&digest)
        .map_err(|e| InjectorError::CryptoError(format!("Failed to create message: {}", e)))?;

    let signature = Signature::from_compact(signature_bytes)
        .map_err(|e| InjectorError::CryptoError(format!("Invalid signature: {}", e)))?;

    SECP256K1_CONTEXT
        .verify_ecdsa(&message, &signature, &public_key)
        .map_err(|_| InjectorError::CryptoError("Signature verification failed".to_string()))
}

/// Hex-string form of [`verify_signature`], matching the wire representation
/// of transaction and batch signatures.
pub fn verify_signature_hex(
    public_key_hex: &str,
    message: &[u8],
    signature_hex: &str,
) -> Result<()> {
    let public_key = hex::decode(public_key_hex)
        .map_err(|e| InjectorError::CryptoError(format!("Invalid public key hex: {}", e)))?;
    let signature = hex::decode(signature_hex)
        .map_err(|e| InjectorError::CryptoError(format!("Invalid signature hex: {}", e)))?;
    verify_signature(&public_key, message, &signature)
}
