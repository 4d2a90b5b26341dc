//! Use-case services over row stores.
//!
//! # Responsibility
//! - Resolve externally supplied table names into schemas.
//! - Keep callers (CLI, routers) decoupled from store internals.

pub mod table_service;
