//! Repository layer - Data access abstraction
//!
//! One generic store contract ([`RecordStore`]) covers all four auth record
//! families; [`Resilient`] decorates any store with log-and-mask fault
//! isolation. Concrete Postgres stores live alongside their SeaORM entity
//! models in `entities/`.

mod base;
mod client_scope_store;
pub(crate) mod entities;
mod mfa_setup_store;
mod password_history_store;
mod resilient;
mod token_exchange_store;

pub use base::{RecordHandler, RecordStore};
pub use client_scope_store::ClientScopeStore;
pub use mfa_setup_store::MfaSetupStore;
pub use password_history_store::PasswordHistoryStore;
pub use resilient::Resilient;
pub use token_exchange_store::TokenExchangeStore;

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use base::MockRecordStore;
