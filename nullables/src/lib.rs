//! Nullable infrastructure for deterministic testing.
//!
//! The wrapper's only external dependency — the underlying token — is
//! abstracted behind the `UnderlyingToken` trait. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch a real transport
//!
//! Usage: swap real implementations for nullables in tests.

pub mod underlying;

pub use underlying::{LedgerUnderlying, NullUnderlying};
