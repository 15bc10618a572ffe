//! Wrapper-specific errors.

use thiserror::Error;

use ingot_ledger::{LedgerError, UnderlyingError};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WrapError {
    /// A failure on the wrapped-token ledger (balance, allowance, recipient).
    #[error("wrapped ledger: {0}")]
    Ledger(#[from] LedgerError),

    /// The underlying collaborator refused a transfer; carries its reason.
    #[error("underlying transfer failed: {0}")]
    UnderlyingTransferFailed(UnderlyingError),
}
