//! Shared types used across the persistence layer.

pub mod context;
pub mod pagination;

pub use context::OperationContext;
pub use pagination::PaginationParams;
