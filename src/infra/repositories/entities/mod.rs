//! SeaORM entity models for the auth tables.
//!
//! Provenance is flattened into `created_*` / `modified_*` audit columns;
//! each table carries a `version` column for optimistic concurrency.

pub mod client_scope;
pub mod mfa_setup;
pub mod password_history;
pub mod token_exchange;
