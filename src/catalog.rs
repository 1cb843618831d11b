//! The fixed catalog of block-start batch factories
//!
//! Exactly three methods are injected at the start of every block, each as a
//! single-transaction batch. The catalog order is part of the network
//! contract: later methods may read state that is only consistent after the
//! earlier ones commit within the same block, and every node must interleave
//! identically.
//!
//! Each variant declares its full input/output address set up front. The
//! execution engine schedules transactions from these declared sets alone,
//! so an under-declared address is a correctness bug; an over-declared one
//! only costs parallelism.

use crate::address::{
    KnownAddresses, BET_FAMILY, CONSENSUS_ACCOUNT_FAMILY, OBLIGATORY_PAYMENT_FAMILY,
};
use crate::batch::{build_batch, Batch};
use crate::crypto::Signer;
use crate::error::Result;
use crate::transaction::build_transaction;

/// Method identifier for the reward-distribution logic.
pub const METHOD_SEND_REWARD: u32 = 1;
/// Method identifier for the obligatory node payment.
pub const METHOD_PAY_OBLIGATORY_PAYMENT: u32 = 2;
/// Method identifier for the internal bet transfer.
pub const METHOD_DO_BET: u32 = 3;

/// One entry in the block-start catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedMethod {
    SendReward,
    PayObligatoryPayment,
    DoBet,
}

impl InjectedMethod {
    /// The catalog in injection order. This order is fixed network-wide.
    pub const CATALOG: [InjectedMethod; 3] = [
        InjectedMethod::SendReward,
        InjectedMethod::PayObligatoryPayment,
        InjectedMethod::DoBet,
    ];

    pub fn method_id(self) -> u32 {
        match self {
            InjectedMethod::SendReward => METHOD_SEND_REWARD,
            InjectedMethod::PayObligatoryPayment => METHOD_PAY_OBLIGATORY_PAYMENT,
            InjectedMethod::DoBet => METHOD_DO_BET,
        }
    }

    pub fn family_name(self) -> &'static str {
        match self {
            InjectedMethod::SendReward => CONSENSUS_ACCOUNT_FAMILY,
            InjectedMethod::PayObligatoryPayment => OBLIGATORY_PAYMENT_FAMILY,
            InjectedMethod::DoBet => BET_FAMILY,
        }
    }

    pub fn family_version(self) -> &'static str {
        "0.1"
    }

    /// The declared input address set, in fixed order.
    pub fn inputs(self, known: &KnownAddresses) -> Vec<crate::address::Address> {
        match self {
            InjectedMethod::SendReward => vec![
                known.account_prefix.clone(),
                known.node_account_prefix.clone(),
                known.minimum_stake.clone(),
                known.committee_size.clone(),
                known.blockchain_tax.clone(),
                known.min_share.clone(),
                known.consensus_account.clone(),
                known.zero.clone(),
            ],
            InjectedMethod::PayObligatoryPayment => vec![
                known.node_account_prefix.clone(),
                known.node_state.clone(),
                known.obligatory_payment.clone(),
            ],
            InjectedMethod::DoBet => vec![
                known.node_account_prefix.clone(),
                known.node_state.clone(),
                known.consensus_account.clone(),
                known.zero.clone(),
                known.genesis_owners.clone(),
            ],
        }
    }

    /// The declared output address set, in fixed order.
    pub fn outputs(self, known: &KnownAddresses) -> Vec<crate::address::Address> {
        match self {
            // Obligatory payment only writes back to the node accounts;
            // the other two methods touch everything they read.
            InjectedMethod::PayObligatoryPayment => vec![known.node_account_prefix.clone()],
            _ => self.inputs(known),
        }
    }

    /// Builds this method's single-transaction batch. All three methods
    /// carry an empty business payload; the method id alone selects the
    /// logic in the execution engine.
    pub fn build_batch(self, known: &KnownAddresses, signer: &dyn Signer) -> Result<Batch> {
        let transaction = build_transaction(
            self.inputs(known),
            self.outputs(known),
            self.method_id(),
            Vec::new(),
            self.family_name(),
            self.family_version(),
            signer,
        )?;
        build_batch(vec![transaction], signer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::SettingsView;
    use crate::crypto::KeyPair;

    fn known() -> KnownAddresses {
        KnownAddresses::derive(&SettingsView::new())
    }

    #[test]
    fn test_catalog_order_is_fixed() {
        assert_eq!(
            InjectedMethod::CATALOG,
            [
                InjectedMethod::SendReward,
                InjectedMethod::PayObligatoryPayment,
                InjectedMethod::DoBet,
            ]
        );
    }

    #[test]
    fn test_send_reward_declares_eight_addresses() {
        let known = known();
        let inputs = InjectedMethod::SendReward.inputs(&known);
        assert_eq!(inputs.len(), 8);
        assert_eq!(InjectedMethod::SendReward.outputs(&known), inputs);
        assert!(inputs.contains(&known.minimum_stake));
        assert!(inputs.contains(&known.committee_size));
        assert!(inputs.contains(&known.blockchain_tax));
        assert!(inputs.contains(&known.min_share));
        assert!(inputs.contains(&known.consensus_account));
        assert!(inputs.contains(&known.zero));
    }

    #[test]
    fn test_obligatory_payment_address_sets() {
        let known = known();
        let inputs = InjectedMethod::PayObligatoryPayment.inputs(&known);
        assert_eq!(
            inputs,
            vec![
                known.node_account_prefix.clone(),
                known.node_state.clone(),
                known.obligatory_payment.clone(),
            ]
        );
        assert_eq!(
            InjectedMethod::PayObligatoryPayment.outputs(&known),
            vec![known.node_account_prefix.clone()]
        );
    }

    #[test]
    fn test_do_bet_declares_five_addresses() {
        let known = known();
        let inputs = InjectedMethod::DoBet.inputs(&known);
        assert_eq!(inputs.len(), 5);
        assert_eq!(InjectedMethod::DoBet.outputs(&known), inputs);
        assert!(inputs.contains(&known.genesis_owners));
    }

    #[test]
    fn test_built_batches_verify_and_tag_methods() {
        let known = known();
        let keypair = KeyPair::generate().unwrap();

        for method in InjectedMethod::CATALOG {
            let batch = method.build_batch(&known, &keypair).unwrap();
            assert!(batch.verify().is_ok());
            assert_eq!(batch.transactions.len(), 1);

            let tx = &batch.transactions[0];
            let envelope = tx.method_payload().unwrap();
            assert_eq!(envelope.method, method.method_id());
            assert!(envelope.data.is_empty());

            let header = tx.header().unwrap();
            assert_eq!(header.family_name, method.family_name());
            assert_eq!(header.family_version, "0.1");
        }
    }
}
