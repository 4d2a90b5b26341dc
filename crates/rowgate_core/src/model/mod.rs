//! Schema and row model shared by every row store.
//!
//! # Responsibility
//! - Define table schemas, rows and scalar values.
//! - Keep schemas immutable once built so stores can borrow them freely.
//!
//! # Invariants
//! - Rows carry no schema; validity against a schema is checked by
//!   `access::rules` at operation time.

pub mod registry;
pub mod row;
pub mod schema;
pub mod value;
