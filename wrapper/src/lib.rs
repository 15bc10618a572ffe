//! 1:1 token wrapper.
//!
//! A [`Wrapper`] composes one wrapped-token [`Ledger`](ingot_ledger::Ledger)
//! (owned exclusively) with an external underlying token (referenced through
//! the [`UnderlyingToken`](ingot_ledger::UnderlyingToken) trait). `wrap`
//! pulls underlying value into the wrapper's custody and mints the same
//! amount of wrapped tokens; `unwrap` is the exact inverse. Each composite
//! operation is a single atomic unit: every fallible sub-step runs before
//! the local ledger mutation commits, so a failure anywhere leaves both
//! ledgers and the event stream untouched.
//!
//! Invariant: the wrapped token's total supply equals the wrapper's balance
//! on the underlying ledger, at all times.

pub mod error;
pub mod wrapper;

pub use error::WrapError;
pub use wrapper::Wrapper;
