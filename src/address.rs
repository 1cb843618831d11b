//! Address derivation for the Veritas global state namespace
//!
//! Every addressable slot in global state is named by a fixed-length
//! lowercase-hex string: a 6-character namespace prefix (SHA-512 of the
//! family name, truncated) followed by 64 characters locating the slot
//! within the namespace. Input/output declarations may also name a bare
//! namespace prefix, which claims the whole region.
//!
//! All constants here are pure functions of fixed names, so every node in
//! the network derives byte-identical addresses. That property is what the
//! block-start determinism contract rests on.

use crate::error::{InjectorError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;

/// Length of a full state address in hex characters.
pub const ADDRESS_LENGTH: usize = 70;

/// Length of a family namespace prefix in hex characters.
pub const NAMESPACE_PREFIX_LENGTH: usize = 6;

/// Transaction family names known to the injector.
pub const ACCOUNT_FAMILY: &str = "account";
pub const NODE_ACCOUNT_FAMILY: &str = "node_account";
pub const CONSENSUS_ACCOUNT_FAMILY: &str = "consensus_account";
pub const OBLIGATORY_PAYMENT_FAMILY: &str = "obligatory_payment";
pub const BET_FAMILY: &str = "bet";

/// On-chain setting keys the catalog factories declare.
pub const SETTING_MINIMUM_STAKE: &str = "veritas.settings.minimum_stake";
pub const SETTING_COMMITTEE_SIZE: &str = "veritas.settings.committee_size";
pub const SETTING_BLOCKCHAIN_TAX: &str = "veritas.settings.blockchain_tax";
pub const SETTING_MIN_SHARE: &str = "veritas.settings.min_share";
pub const SETTING_OBLIGATORY_PAYMENT: &str = "veritas.settings.obligatory_payment";
pub const SETTING_GENESIS_OWNERS: &str = "veritas.settings.genesis_owners";

/// Namespace prefix reserved for on-chain settings.
const SETTINGS_NAMESPACE: &str = "000000";

/// Characters of a SHA-256 hex digest used per setting-key part.
const SETTING_PART_LENGTH: usize = 16;

/// A state address: 1 to 70 lowercase hex characters.
///
/// Full slot addresses are exactly [`ADDRESS_LENGTH`] characters; shorter
/// strings are namespace prefixes used in input/output declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Validates and wraps an address string.
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.is_empty() || s.len() > ADDRESS_LENGTH {
            return Err(InjectorError::AddressError(format!(
                "Address must be 1 to {} hex characters, got {}",
                ADDRESS_LENGTH,
                s.len()
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            return Err(InjectorError::AddressError(format!(
                "Address must be lowercase hex: {}",
                s
            )));
        }
        Ok(Address(s.to_string()))
    }

    /// Wraps a string already known to be lowercase hex of valid length.
    /// Only for use on strings this module derives itself.
    fn from_derived(s: String) -> Self {
        debug_assert!(Address::from_hex(&s).is_ok());
        Address(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this address names a whole namespace rather than one slot.
    pub fn is_prefix(&self) -> bool {
        self.0.len() < ADDRESS_LENGTH
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-512 of `data`, as lowercase hex.
pub fn hash512_hex(data: &[u8]) -> String {
    hex::encode(Sha512::digest(data))
}

/// Derives the 6-character namespace prefix for a family name.
pub fn namespace_prefix(family_name: &str) -> Address {
    let digest = hash512_hex(family_name.as_bytes());
    Address::from_derived(digest[..NAMESPACE_PREFIX_LENGTH].to_string())
}

/// The sentinel all-zero account address.
pub fn zero_address() -> Address {
    Address::from_derived("0".repeat(ADDRESS_LENGTH))
}

/// The fixed node-state address: 69 zeros followed by "2".
pub fn node_state_address() -> Address {
    let mut s = "0".repeat(ADDRESS_LENGTH - 1);
    s.push('2');
    Address::from_derived(s)
}

/// The consensus account: the consensus-account namespace root slot.
pub fn consensus_account_address() -> Address {
    let prefix = namespace_prefix(CONSENSUS_ACCOUNT_FAMILY);
    let mut s = prefix.0;
    s.push_str(&"0".repeat(ADDRESS_LENGTH - NAMESPACE_PREFIX_LENGTH));
    Address::from_derived(s)
}

/// The settings lookup collaborator: maps a setting key to the state address
/// holding its value. A pure function of the key; the injector never reads
/// setting values, only declares their addresses.
pub trait SettingsLookup: Send + Sync {
    fn setting_address(&self, key: &str) -> Address;
}

/// Default settings address scheme.
///
/// The key is split on `.` into at most four parts; each part contributes
/// the first 16 hex characters of its SHA-256 digest (missing parts hash
/// the empty string). The chunks follow the fixed settings namespace
/// prefix, giving a full 70-character address.
#[derive(Debug, Clone, Default)]
pub struct SettingsView;

impl SettingsView {
    pub fn new() -> Self {
        SettingsView
    }

    fn short_hash(part: &str) -> String {
        let digest = hex::encode(Sha256::digest(part.as_bytes()));
        digest[..SETTING_PART_LENGTH].to_string()
    }
}

impl SettingsLookup for SettingsView {
    fn setting_address(&self, key: &str) -> Address {
        let mut parts: Vec<&str> = key.splitn(4, '.').collect();
        parts.resize(4, "");

        let mut address = String::with_capacity(ADDRESS_LENGTH);
        address.push_str(SETTINGS_NAMESPACE);
        for part in parts {
            address.push_str(&Self::short_hash(part));
        }
        Address::from_derived(address)
    }
}

/// Every constant address the catalog factories declare, derived once at
/// injector construction and shared by reference from then on.
#[derive(Debug, Clone)]
pub struct KnownAddresses {
    pub account_prefix: Address,
    pub node_account_prefix: Address,
    pub consensus_account: Address,
    pub node_state: Address,
    pub zero: Address,
    pub minimum_stake: Address,
    pub committee_size: Address,
    pub blockchain_tax: Address,
    pub min_share: Address,
    pub obligatory_payment: Address,
    pub genesis_owners: Address,
}

impl KnownAddresses {
    pub fn derive(settings: &dyn SettingsLookup) -> Self {
        KnownAddresses {
            account_prefix: namespace_prefix(ACCOUNT_FAMILY),
            node_account_prefix: namespace_prefix(NODE_ACCOUNT_FAMILY),
            consensus_account: consensus_account_address(),
            node_state: node_state_address(),
            zero: zero_address(),
            minimum_stake: settings.setting_address(SETTING_MINIMUM_STAKE),
            committee_size: settings.setting_address(SETTING_COMMITTEE_SIZE),
            blockchain_tax: settings.setting_address(SETTING_BLOCKCHAIN_TAX),
            min_share: settings.setting_address(SETTING_MIN_SHARE),
            obligatory_payment: settings.setting_address(SETTING_OBLIGATORY_PAYMENT),
            genesis_owners: settings.setting_address(SETTING_GENESIS_OWNERS),
        }
    }
}
