//! Block-start injection orchestration
//!
//! The block-production pipeline calls [`BlockStartInjector::block_start`]
//! once per block attempt. The injector prepends the external block-metadata
//! batches, then the three catalog batches in fixed order. Any failure
//! aborts the whole call; a partial batch list is never returned.

use crate::address::{KnownAddresses, SettingsLookup};
use crate::batch::Batch;
use crate::catalog::InjectedMethod;
use crate::crypto::Signer;
use crate::error::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The previous block, as handed over by the block-production pipeline.
/// Opaque to the catalog: the injected batches depend only on fixed
/// addresses, never on block contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header_signature: String,
    pub block_num: u64,
    pub previous_block_id: String,
}

/// The capability the block-production pipeline expects of an injector.
/// Only `block_start` does work here; the remaining hooks exist for
/// injectors that need to observe batch scheduling, and default to no-ops.
pub trait BatchInjector: Send + Sync {
    /// Returns the ordered batches to place at the beginning of the block
    /// that follows `previous_block`.
    fn block_start(&self, previous_block: &Block) -> Result<Vec<Batch>>;

    fn before_batch(&self, _previous_block: &Block, _batch: &Batch) {}

    fn after_batch(&self, _previous_block: &Block, _batch: &Batch) {}

    fn block_end(&self, _previous_block: &Block, _batches: &[Batch]) {}
}

/// Injects the Veritas catalog batches at the beginning of every block,
/// after the external block-metadata injector's batches.
///
/// Holds no state across calls beyond the signer, the metadata injector,
/// and the constant address set derived once at construction, so it is safe
/// to call from whatever thread the pipeline uses.
pub struct BlockStartInjector {
    signer: Arc<dyn Signer>,
    metadata_injector: Box<dyn BatchInjector>,
    addresses: KnownAddresses,
}

impl BlockStartInjector {
    pub fn new(
        settings: &dyn SettingsLookup,
        signer: Arc<dyn Signer>,
        metadata_injector: Box<dyn BatchInjector>,
    ) -> Self {
        BlockStartInjector {
            signer,
            metadata_injector,
            addresses: KnownAddresses::derive(settings),
        }
    }

    /// The constant address set this injector declares.
    pub fn addresses(&self) -> &KnownAddresses {
        &self.addresses
    }
}

impl BatchInjector for BlockStartInjector {
    fn block_start(&self, previous_block: &Block) -> Result<Vec<Batch>> {
        let mut batches = self.metadata_injector.block_start(previous_block)?;
        let metadata_count = batches.len();

        for method in InjectedMethod::CATALOG {
            batches.push(method.build_batch(&self.addresses, self.signer.as_ref())?);
        }

        debug!(
            "Injecting {} batches after block {} ({} metadata + {} catalog)",
            batches.len(),
            previous_block.block_num,
            metadata_count,
            InjectedMethod::CATALOG.len()
        );
        Ok(batches)
    }
}
