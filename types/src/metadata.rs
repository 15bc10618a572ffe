//! Static token metadata.

use serde::{Deserialize, Serialize};

/// Descriptive metadata for one token: name, symbol, and the fixed number of
/// decimals its raw units are displayed with.
///
/// Immutable once the ledger is created; carries no invariants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}
