//! Error types for the Veritas block-start injector

use std::fmt;

#[derive(Debug, Clone)]
pub enum InjectorError {
    /// The signer refused or failed to produce a signature. Fatal to the
    /// whole `block_start` call; no partial batch list is ever returned.
    SigningError(String),
    /// Serialization of a header or payload failed. Fatal, same as signing.
    EncodingError(String),
    /// An address string violated the fixed-length lowercase-hex grammar.
    /// With the constant inputs this crate derives from, this indicates
    /// a programming error rather than a runtime condition.
    AddressError(String),
    CryptoError(String),
    InvalidTransaction(String),
    /// A batch with zero transactions was requested. Never valid.
    EmptyBatch,
}

impl fmt::Display for InjectorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InjectorError::SigningError(msg) => write!(f, "Signing error: {}", msg),
            InjectorError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            InjectorError::AddressError(msg) => write!(f, "Address error: {}", msg),
            InjectorError::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            InjectorError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {}", msg),
            InjectorError::EmptyBatch => write!(f, "Batch must contain at least one transaction"),
        }
    }
}

impl std::error::Error for InjectorError {}

impl From<Box<bincode::ErrorKind>> for InjectorError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        InjectorError::EncodingError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, InjectorError>;
