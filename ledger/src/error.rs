//! Ledger-specific errors.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, available {available}")]
    InsufficientAllowance { needed: u128, available: u128 },

    #[error("cannot decrease allowance below zero: delta {delta}, current {current}")]
    AllowanceUnderflow { delta: u128, current: u128 },

    #[error("allowance overflow: current {current}, delta {delta}")]
    AllowanceOverflow { current: u128, delta: u128 },

    #[error("supply overflow: supply {supply}, mint amount {amount}")]
    SupplyOverflow { supply: u128, amount: u128 },

    #[error("the null account cannot receive tokens")]
    InvalidRecipient,

    #[error("the null account cannot be an approval spender")]
    InvalidSpender,
}
