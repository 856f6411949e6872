//! Log-and-mask fault isolation for record stores.
//!
//! [`Resilient`] wraps a [`RecordStore`] and keeps store failures out of the
//! authentication flow: on the read, update, and delete paths an inner error
//! becomes exactly one error-severity log event plus the operation's empty
//! value (`None`, empty `Vec`, or `false`). Callers therefore cannot tell
//! "absent" from "store failed" through the return value alone; the log
//! record is the only place that distinction survives. `register_new`
//! deliberately propagates instead, so creation failures (e.g. uniqueness
//! violations) stay actionable by the caller.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::AuthRecord;
use crate::errors::{AppError, AppResult};
use crate::types::{OperationContext, PaginationParams};

use super::base::{RecordHandler, RecordStore};

/// Fault-isolating decorator over any record store.
///
/// Stateless apart from the handle to the wrapped store: no retries, no
/// backoff, no locking, no timeouts. Arbitrary concurrent callers may share
/// one instance. The wrapped store can never be absent; `Arc<S>` makes the
/// fail-fast construction invariant a compile-time guarantee.
pub struct Resilient<S> {
    inner: Arc<S>,
}

impl<S> Resilient<S> {
    /// Wrap a store.
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }
}

impl<S> Clone for Resilient<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// One error event per masked failure, carrying the call context.
fn log_masked<E: AuthRecord>(ctx: &OperationContext, method: &'static str, err: &AppError) {
    tracing::error!(
        kind = E::KIND,
        method,
        tenant_id = %ctx.tenant_id,
        correlation_id = %ctx.correlation_id,
        operation = %ctx.operation,
        error = ?err,
        "store call failed, returning empty result"
    );
}

#[async_trait]
impl<E, S> RecordStore<E> for Resilient<S>
where
    E: AuthRecord,
    S: RecordStore<E>,
{
    // Plain pass-through, no extra isolation on the identity lookups.
    async fn exists(&self, ctx: &OperationContext, id: Uuid) -> AppResult<bool> {
        self.inner.exists(ctx, id).await
    }

    async fn find_by_id(&self, ctx: &OperationContext, id: Uuid) -> AppResult<Option<E>> {
        self.inner.find_by_id(ctx, id).await
    }

    async fn find_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &E::OwnerKey,
    ) -> AppResult<Option<E>> {
        match self.inner.find_by_owner(ctx, owner).await {
            Ok(found) => Ok(found),
            Err(err) => {
                log_masked::<E>(ctx, "find_by_owner", &err);
                Ok(None)
            }
        }
    }

    async fn list_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &E::OwnerKey,
        limit: Option<u64>,
    ) -> AppResult<Vec<E>> {
        match self.inner.list_by_owner(ctx, owner, limit).await {
            Ok(records) => Ok(records),
            Err(err) => {
                log_masked::<E>(ctx, "list_by_owner", &err);
                Ok(Vec::new())
            }
        }
    }

    // Creation failures propagate unmasked: a record that could not be
    // written must surface as an error, not as a silent `false`.
    async fn register_new(&self, ctx: &OperationContext, record: &E) -> AppResult<bool> {
        self.inner.register_new(ctx, record).await
    }

    async fn update(&self, ctx: &OperationContext, record: &E) -> AppResult<bool> {
        match self.inner.update(ctx, record).await {
            Ok(applied) => Ok(applied),
            Err(err) => {
                log_masked::<E>(ctx, "update", &err);
                Ok(false)
            }
        }
    }

    async fn delete_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &E::OwnerKey,
    ) -> AppResult<bool> {
        match self.inner.delete_by_owner(ctx, owner).await {
            Ok(deleted) => Ok(deleted),
            Err(err) => {
                log_masked::<E>(ctx, "delete_by_owner", &err);
                Ok(false)
            }
        }
    }

    /// Bulk enumeration is not wired through this adapter yet: the handler
    /// is never invoked and the wrapped store is not consulted. Batch
    /// consumers that need real enumeration talk to the store directly.
    async fn for_each(
        &self,
        _ctx: &OperationContext,
        _page: PaginationParams,
        _handler: RecordHandler<E>,
    ) -> AppResult<()> {
        Ok(())
    }

    /// Same placeholder semantics as `for_each`.
    async fn for_each_modified_since(
        &self,
        _ctx: &OperationContext,
        _now: DateTime<Utc>,
        _since: DateTime<Utc>,
        _handler: RecordHandler<E>,
    ) -> AppResult<()> {
        Ok(())
    }
}
