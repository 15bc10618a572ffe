//! Fundamental types for the ingot token ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account identifiers, token amounts, and static token metadata.

pub mod address;
pub mod amount;
pub mod metadata;

pub use address::AccountId;
pub use amount::Amount;
pub use metadata::TokenMetadata;
