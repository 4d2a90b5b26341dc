//! Row access contract: validation, key handling and the store trait.
//!
//! # Responsibility
//! - Define the operation surface consumed by request routers.
//! - Own the validation pipeline every store runs before mutating.
//!
//! # Invariants
//! - Validation failures are reported before any storage effect.
//! - Failures are returned to the caller, never logged or swallowed here.

pub mod contract;
pub mod error;
pub mod key;
pub mod rules;
