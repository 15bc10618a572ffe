//! Interface to an externally-owned token ledger.
//!
//! The wrapper component never looks inside the underlying token — it only
//! needs balances, an allowance mechanism, and the two transfer shapes. This
//! trait is that seam. Production embedders implement it over whatever
//! transport reaches the real underlying ledger; the `ingot-nullables` crate
//! provides deterministic in-memory implementations for tests.

use thiserror::Error;

use crate::error::LedgerError;
use ingot_types::{AccountId, Amount};

/// Failure reported by the underlying token collaborator.
///
/// The underlying ledger is not ours; its failures arrive as values of this
/// type and are propagated, never swallowed or reinterpreted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UnderlyingError {
    #[error("insufficient balance on underlying ledger: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance on underlying ledger: need {needed}, available {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("underlying ledger rejected the recipient")]
    InvalidRecipient,

    #[error("underlying ledger rejected the operation: {0}")]
    Rejected(String),
}

impl From<LedgerError> for UnderlyingError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance { needed, available } => {
                Self::InsufficientBalance { needed, available }
            }
            LedgerError::InsufficientAllowance { needed, available } => {
                Self::InsufficientAllowance { needed, available }
            }
            LedgerError::InvalidRecipient => Self::InvalidRecipient,
            other => Self::Rejected(other.to_string()),
        }
    }
}

/// An externally-owned fungible token the wrapper can hold custody of.
///
/// The wrapper relies on the holder having pre-granted it an allowance on
/// this ledger before a wrap; `transfer_from` consumes that allowance.
pub trait UnderlyingToken {
    /// Identity of this token (the address callers configured the wrapper
    /// with).
    fn token_id(&self) -> AccountId;

    /// Balance of `account` on the underlying ledger, zero for unknown
    /// accounts.
    fn balance_of(&self, account: AccountId) -> Amount;

    /// Allowance `owner` has granted `spender` on the underlying ledger.
    fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount;

    /// Move `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), UnderlyingError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// `spender`'s allowance.
    fn transfer_from(
        &mut self,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), UnderlyingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_errors_map_to_underlying_reasons() {
        let err: UnderlyingError = LedgerError::InsufficientBalance {
            needed: 10,
            available: 3,
        }
        .into();
        assert_eq!(
            err,
            UnderlyingError::InsufficientBalance {
                needed: 10,
                available: 3,
            }
        );

        let err: UnderlyingError = LedgerError::InvalidRecipient.into();
        assert_eq!(err, UnderlyingError::InvalidRecipient);

        // Kinds with no underlying counterpart carry their message through.
        let err: UnderlyingError = LedgerError::InvalidSpender.into();
        assert!(matches!(err, UnderlyingError::Rejected(_)));
    }
}
