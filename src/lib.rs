//! Auth Persistence - Resilient data access for the authentication domain.
//!
//! This crate provides the persistence layer for a multi-tenant commerce
//! platform's authentication subsystem: MFA enrollments, password history,
//! service client scopes, and token exchange records.
//!
//! # Architecture Layers
//!
//! - **config**: Application configuration and constants
//! - **domain**: Core auth entities and provenance metadata
//! - **infra**: Infrastructure concerns (database, repositories)
//! - **types**: Shared types (operation context, pagination)
//! - **errors**: Centralized error handling
//!
//! # Fault isolation
//!
//! Callers never talk to a Postgres-backed store directly. Each store is
//! wrapped in a [`Resilient`](infra::Resilient) adapter that turns store
//! failures on the read, update, and delete paths into a single
//! error-severity log event plus the operation's empty value, keeping
//! transient persistence faults out of the login path.
//!
//! ```no_run
//! use std::sync::Arc;
//! use auth_persistence::infra::{MfaSetupStore, Resilient};
//!
//! # async fn wire(db: sea_orm::DatabaseConnection) {
//! let mfa = Resilient::new(Arc::new(MfaSetupStore::new(db)));
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{MfaSetup, PasswordHistoryRecord, ServiceClientScope, TokenExchangeRecord};
pub use errors::{AppError, AppResult};
pub use infra::Resilient;
pub use types::{OperationContext, PaginationParams};
