//! Batch construction and signing
//!
//! A batch groups one or more signed transactions into an atomic unit. Its
//! header lists transaction ids (header signatures) in execution order; the
//! batch signature covers only that header, so transaction content is
//! protected transitively by each transaction's own signature.

use crate::crypto::{verify_signature_hex, Signer};
use crate::error::{InjectorError, Result};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// The signed portion of a batch. Field order is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchHeader {
    pub signer_public_key: String,
    pub transaction_ids: Vec<String>,
}

impl BatchHeader {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// A signed batch: the exact header bytes that were signed, the member
/// transactions in execution order, and the batch signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(with = "serde_bytes")]
    pub header: Vec<u8>,
    pub transactions: Vec<Transaction>,
    pub header_signature: String,
}

impl Batch {
    /// Decodes the signed header bytes.
    pub fn header(&self) -> Result<BatchHeader> {
        BatchHeader::from_bytes(&self.header)
    }

    /// Checks the batch signature, that the header's id list matches the
    /// member transactions in order, and that every member verifies.
    pub fn verify(&self) -> Result<()> {
        let header = self.header()?;
        verify_signature_hex(
            &header.signer_public_key,
            &self.header,
            &self.header_signature,
        )?;

        let member_ids: Vec<&str> = self
            .transactions
            .iter()
            .map(|tx| tx.header_signature.as_str())
            .collect();
        if header.transaction_ids != member_ids {
            return Err(InjectorError::InvalidTransaction(
                "Batch header transaction ids do not match members".to_string(),
            ));
        }

        for tx in &self.transactions {
            tx.verify()?;
        }
        Ok(())
    }
}

/// Wraps signed transactions into a signed batch, preserving their order.
///
/// An empty transaction list is never valid; every factory produces at
/// least one transaction before batching.
pub fn build_batch(transactions: Vec<Transaction>, signer: &dyn Signer) -> Result<Batch> {
    if transactions.is_empty() {
        return Err(InjectorError::EmptyBatch);
    }

    let header = BatchHeader {
        signer_public_key: signer.public_key_hex(),
        transaction_ids: transactions
            .iter()
            .map(|tx| tx.header_signature.clone())
            .collect(),
    }
    .to_bytes()?;

    let signature = signer.sign(&header)?;

    Ok(Batch {
        header,
        transactions,
        header_signature: hex::encode(signature),
    })
}
