//! Veritas block-start batch injection
//!
//! Given the previous block, this crate deterministically builds the
//! ordered, fully signed batches that every Veritas node prepends to the
//! next block before user-submitted work executes. Every honest node
//! running the same injector against the same previous block must produce
//! byte-identical signed output (modulo per-transaction nonces), or the
//! network diverges on block validity.
//!
//! # Architecture
//!
//! - [`address`] - State address derivation and fixed network constants
//! - [`transaction`] - Transaction headers, payload envelopes, signing
//! - [`batch`] - Batch headers and signing
//! - [`catalog`] - The fixed, ordered set of injected methods
//! - [`injector`] - `block_start` orchestration
//! - [`crypto`] - secp256k1 signing primitives and the `Signer` trait
//! - [`error`] - Error types
//!
//! The crate executes and validates nothing; it only builds and signs. The
//! consensus engine, execution semantics, settings storage, and key
//! management are external collaborators reached through the [`crypto::Signer`],
//! [`address::SettingsLookup`], and [`injector::BatchInjector`] traits.

#![forbid(unsafe_code)]

pub mod address;
pub mod batch;
pub mod catalog;
pub mod crypto;
pub mod error;
pub mod injector;
pub mod transaction;

pub use address::{Address, KnownAddresses, SettingsLookup, SettingsView};
pub use batch::{build_batch, Batch, BatchHeader};
pub use catalog::InjectedMethod;
pub use crypto::{KeyPair, Signer};
pub use error::{InjectorError, Result};
pub use injector::{BatchInjector, Block, BlockStartInjector};
pub use transaction::{build_transaction, MethodPayload, Transaction, TransactionHeader};
