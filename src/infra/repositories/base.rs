//! Store contract shared by all auth record families.
//!
//! Generalizes the per-entity repository interface over the record type and
//! its owner key, so the resilient adapter and the mocks are written once
//! instead of once per entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::AuthRecord;
use crate::errors::{AppError, AppResult};
use crate::types::{OperationContext, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Writes must stay inside the caller's tenant.
pub(crate) fn ensure_same_tenant(ctx: &OperationContext, tenant_id: Uuid) -> AppResult<()> {
    if tenant_id != ctx.tenant_id {
        return Err(AppError::validation(
            "record tenant does not match call context",
        ));
    }
    Ok(())
}

/// Callback invoked once per record yielded by an enumeration.
pub type RecordHandler<E> = Box<dyn FnMut(E) + Send>;

/// Persistence contract for one auth record family.
///
/// Every operation takes the caller's [`OperationContext`] first; all
/// queries are tenant-scoped through it. Cancellation is dropping the
/// returned future, which this layer neither intercepts nor delays.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RecordStore<E: AuthRecord>: Send + Sync {
    /// Check whether a record with this id exists within the tenant.
    async fn exists(&self, ctx: &OperationContext, id: Uuid) -> AppResult<bool>;

    /// Find a record by primary id within the tenant.
    async fn find_by_id(&self, ctx: &OperationContext, id: Uuid) -> AppResult<Option<E>>;

    /// Find the record for an owner key (e.g. the MFA setup for a user).
    async fn find_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &E::OwnerKey,
    ) -> AppResult<Option<E>>;

    /// List records for an owner key in the family's canonical order,
    /// optionally capped at `limit`.
    async fn list_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &E::OwnerKey,
        limit: Option<u64>,
    ) -> AppResult<Vec<E>>;

    /// Persist a new record. Returns `true` once the row is written.
    async fn register_new(&self, ctx: &OperationContext, record: &E) -> AppResult<bool>;

    /// Update an existing record under optimistic concurrency: the write
    /// applies only if the stored version still matches `record.version()`.
    /// Returns whether a row was updated.
    async fn update(&self, ctx: &OperationContext, record: &E) -> AppResult<bool>;

    /// Delete all records for an owner key within the tenant. Returns
    /// whether any row was deleted.
    async fn delete_by_owner(&self, ctx: &OperationContext, owner: &E::OwnerKey)
        -> AppResult<bool>;

    /// Walk every record in the tenant, a page at a time, invoking the
    /// handler once per record.
    async fn for_each(
        &self,
        ctx: &OperationContext,
        page: PaginationParams,
        handler: RecordHandler<E>,
    ) -> AppResult<()>;

    /// Same walk restricted to records modified in `(since, now]`.
    async fn for_each_modified_since(
        &self,
        ctx: &OperationContext,
        now: DateTime<Utc>,
        since: DateTime<Utc>,
        handler: RecordHandler<E>,
    ) -> AppResult<()>;
}
