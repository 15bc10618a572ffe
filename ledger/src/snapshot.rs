//! Ledger snapshots — capture the full token state at a point in time.
//!
//! A snapshot is deterministic: entries are sorted and zero entries elided,
//! so two ledgers in the same state produce identical snapshots (and
//! identical bytes). This makes snapshots usable both for persistence and
//! for exact state comparison.

use serde::{Deserialize, Serialize};

use ingot_types::{AccountId, Amount, TokenMetadata};

/// Snapshot format version for compatibility.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The complete state of one [`Ledger`](crate::Ledger).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub metadata: TokenMetadata,
    pub total_supply: Amount,
    /// Non-zero balances, sorted by account.
    pub balances: Vec<(AccountId, Amount)>,
    /// Non-zero allowances, sorted by (owner, spender).
    pub allowances: Vec<(AccountId, AccountId, Amount)>,
}

impl LedgerSnapshot {
    /// Serialize to bytes for persistence.
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }

    /// Restore a snapshot from serialized bytes.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        bincode::deserialize(data).ok()
    }
}
