//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection management
//! - Postgres-backed record stores
//! - The resilient adapter wrapped around every store

pub mod db;
pub mod repositories;

pub use db::Database;
pub use repositories::{
    ClientScopeStore, MfaSetupStore, PasswordHistoryStore, RecordHandler, RecordStore, Resilient,
    TokenExchangeStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockRecordStore;
