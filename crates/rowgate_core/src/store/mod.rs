//! Row store implementations.
//!
//! # Responsibility
//! - Provide the volatile (in-process) and relational (SQL) stores behind the
//!   shared `RowStore` contract.
//!
//! # Invariants
//! - Both stores run the same `access::rules` pipelines, so equivalent
//!   requests are accepted or rejected identically.

pub mod relational;
pub mod statement;
pub mod volatile;
