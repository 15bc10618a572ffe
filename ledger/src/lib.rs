//! Balance-and-allowance bookkeeping for one fungible token.
//!
//! The [`Ledger`] owns three pieces of state — per-account balances, per
//! (owner, spender) allowances, and a total-supply counter — and enforces the
//! conservation law: total supply equals the sum of all balances at all
//! times. Supply only moves through `mint` and `burn`, which adjust a balance
//! and the counter together.
//!
//! Every mutating operation validates all of its preconditions before
//! touching any state, so a failed call leaves the ledger exactly as it was
//! and emits no event.

pub mod error;
pub mod event;
pub mod ledger;
pub mod snapshot;
pub mod underlying;

pub use error::LedgerError;
pub use event::{EventBus, TokenEvent};
pub use ledger::Ledger;
pub use snapshot::{LedgerSnapshot, SNAPSHOT_VERSION};
pub use underlying::{UnderlyingError, UnderlyingToken};
