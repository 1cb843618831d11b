//! Transaction construction and signing
//!
//! A transaction is immutable once signed: the header is serialized with
//! bincode (fixed field order, fixed-width integers, so every node encodes
//! the same bytes), signed, and carried alongside the exact bytes that were
//! signed. The payload is covered indirectly through the header's payload
//! hash.

use crate::address::Address;
use crate::crypto::{verify_signature_hex, Signer};
use crate::error::{InjectorError, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Hex characters in a transaction nonce (16 random bytes).
const NONCE_LENGTH: usize = 32;

/// The signed portion of a transaction. Field order is part of the wire
/// contract and must never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    pub signer_public_key: String,
    pub family_name: String,
    pub family_version: String,
    pub inputs: Vec<Address>,
    pub outputs: Vec<Address>,
    pub dependencies: Vec<String>,
    pub payload_sha512: String,
    pub batcher_public_key: String,
    pub nonce: String,
}

impl TransactionHeader {
    /// Serializes the header to its canonical wire bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// The method-tagged payload envelope. The execution engine reads `method`
/// to dispatch before touching the inner bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodPayload {
    pub method: u32,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl MethodPayload {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// A fully signed transaction: the exact header bytes that were signed, the
/// payload they hash, and the signature that doubles as the transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "serde_bytes")]
    pub header: Vec<u8>,
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
    pub header_signature: String,
}

impl Transaction {
    /// Decodes the signed header bytes.
    pub fn header(&self) -> Result<TransactionHeader> {
        TransactionHeader::from_bytes(&self.header)
    }

    /// Decodes the method envelope from the payload bytes.
    pub fn method_payload(&self) -> Result<MethodPayload> {
        MethodPayload::from_bytes(&self.payload)
    }

    /// Checks the header signature against the embedded signer key and
    /// confirms the payload hash in the header matches the payload bytes.
    pub fn verify(&self) -> Result<()> {
        let header = self.header()?;
        verify_signature_hex(
            &header.signer_public_key,
            &self.header,
            &self.header_signature,
        )?;
        let payload_hash = crate::address::hash512_hex(&self.payload);
        if payload_hash != header.payload_sha512 {
            return Err(InjectorError::InvalidTransaction(
                "Payload hash does not match header".to_string(),
            ));
        }
        Ok(())
    }
}

/// A fresh random nonce. Its only job is to make otherwise-identical
/// transactions distinct, so duplicate detection downstream never mistakes
/// a new injection for a replay.
fn fresh_nonce() -> String {
    let mut bytes = [0u8; NONCE_LENGTH / 2];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Builds and signs one transaction.
///
/// `inputs` and `outputs` are declarations for the execution engine's
/// conflict detection; their order is preserved exactly as given, never
/// reordered or deduplicated. The signer acts as its own batcher.
pub fn build_transaction(
    inputs: Vec<Address>,
    outputs: Vec<Address>,
    method: u32,
    data: Vec<u8>,
    family_name: &str,
    family_version: &str,
    signer: &dyn Signer,
) -> Result<Transaction> {
    if inputs.is_empty() {
        return Err(InjectorError::InvalidTransaction(
            "Transaction declares no inputs".to_string(),
        ));
    }
    if outputs.is_empty() {
        return Err(InjectorError::InvalidTransaction(
            "Transaction declares no outputs".to_string(),
        ));
    }

    let payload = MethodPayload { method, data }.to_bytes()?;
    let public_key = signer.public_key_hex();

    let header = TransactionHeader {
        signer_public_key: public_key.clone(),
        family_name: family_name.to_string(),
        family_version: family_version.to_string(),
        inputs,
        outputs,
        dependencies: Vec::new(),
        payload_sha512: crate::address::hash512_hex(&payload),
        batcher_public_key: public_key,
        nonce: fresh_nonce(),
    }
    .to_bytes()?;

    let signature = signer.sign(&header)?;

    Ok(Transaction {
        header,
        payload,
        header_signature: hex::encode(signature),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{namespace_prefix, zero_address, NODE_ACCOUNT_FAMILY};
    use crate::crypto::KeyPair;

    fn test_transaction(signer: &KeyPair) -> Transaction {
        build_transaction(
            vec![namespace_prefix(NODE_ACCOUNT_FAMILY), zero_address()],
            vec![namespace_prefix(NODE_ACCOUNT_FAMILY)],
            7,
            b"inner".to_vec(),
            NODE_ACCOUNT_FAMILY,
            "0.1",
            signer,
        )
        .unwrap()
    }

    #[test]
    fn test_build_and_verify() {
        let keypair = KeyPair::generate().unwrap();
        let tx = test_transaction(&keypair);
        assert!(tx.verify().is_ok());

        let header = tx.header().unwrap();
        assert_eq!(header.signer_public_key, keypair.public_key_hex());
        assert_eq!(header.batcher_public_key, keypair.public_key_hex());
        assert_eq!(header.family_name, NODE_ACCOUNT_FAMILY);
        assert_eq!(header.family_version, "0.1");
        assert!(header.dependencies.is_empty());
        assert_eq!(header.nonce.len(), 32);
    }

    #[test]
    fn test_payload_envelope_roundtrip() {
        let keypair = KeyPair::generate().unwrap();
        let tx = test_transaction(&keypair);
        let envelope = tx.method_payload().unwrap();
        assert_eq!(envelope.method, 7);
        assert_eq!(envelope.data, b"inner");
    }

    #[test]
    fn test_payload_hash_matches_header() {
        let keypair = KeyPair::generate().unwrap();
        let tx = test_transaction(&keypair);
        let header = tx.header().unwrap();
        assert_eq!(header.payload_sha512, crate::address::hash512_hex(&tx.payload));
    }

    #[test]
    fn test_address_order_is_preserved() {
        let keypair = KeyPair::generate().unwrap();
        let first = zero_address();
        let second = namespace_prefix(NODE_ACCOUNT_FAMILY);
        let tx = build_transaction(
            vec![first.clone(), second.clone()],
            vec![second.clone(), first.clone()],
            1,
            Vec::new(),
            NODE_ACCOUNT_FAMILY,
            "0.1",
            &keypair,
        )
        .unwrap();
        let header = tx.header().unwrap();
        assert_eq!(header.inputs, vec![first.clone(), second.clone()]);
        assert_eq!(header.outputs, vec![second, first]);
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let keypair = KeyPair::generate().unwrap();
        let result = build_transaction(
            Vec::new(),
            vec![zero_address()],
            1,
            Vec::new(),
            NODE_ACCOUNT_FAMILY,
            "0.1",
            &keypair,
        );
        assert!(result.is_err());

        let result = build_transaction(
            vec![zero_address()],
            Vec::new(),
            1,
            Vec::new(),
            NODE_ACCOUNT_FAMILY,
            "0.1",
            &keypair,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_nonce_makes_transactions_distinct() {
        let keypair = KeyPair::generate().unwrap();
        let a = test_transaction(&keypair);
        let b = test_transaction(&keypair);
        assert_ne!(a.header, b.header);
        assert_ne!(a.header_signature, b.header_signature);
        assert_ne!(a.header().unwrap().nonce, b.header().unwrap().nonce);
        // Everything except the nonce is identical
        let mut header_a = a.header().unwrap();
        let header_b = b.header().unwrap();
        header_a.nonce = header_b.nonce.clone();
        assert_eq!(header_a, header_b);
    }

    #[test]
    fn test_tampered_header_fails_verification() {
        let keypair = KeyPair::generate().unwrap();
        let mut tx = test_transaction(&keypair);
        let last = tx.header.len() - 1;
        tx.header[last] ^= 0x01;
        assert!(tx.verify().is_err());
    }

    #[test]
    fn test_tampered_payload_fails_verification() {
        let keypair = KeyPair::generate().unwrap();
        let mut tx = test_transaction(&keypair);
        tx.payload.push(0);
        assert!(tx.verify().is_err());
    }
}
