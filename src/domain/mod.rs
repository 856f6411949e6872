//! Domain layer - Core auth entities and metadata
//!
//! Contains the record types persisted by the authentication subsystem,
//! independent of infrastructure concerns. Entities arrive here already
//! validated; secrets are already encrypted and passwords already hashed
//! by the time they cross this boundary.

pub mod client_scope;
pub mod metadata;
pub mod mfa_setup;
pub mod password_history;
pub mod record;
pub mod token_exchange;

pub use client_scope::ServiceClientScope;
pub use metadata::Provenance;
pub use mfa_setup::{MfaMethod, MfaSetup};
pub use password_history::PasswordHistoryRecord;
pub use record::AuthRecord;
pub use token_exchange::TokenExchangeRecord;
