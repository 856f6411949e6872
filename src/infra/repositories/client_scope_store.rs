//! Postgres-backed service client scope store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::base::{ensure_same_tenant, RecordHandler, RecordStore};
use super::entities::client_scope::{self, Column, Entity as ScopeEntity};
use crate::domain::{Provenance, ServiceClientScope};
use crate::errors::AppResult;
use crate::types::{OperationContext, PaginationParams};

/// Concrete store for machine client scope grants.
pub struct ClientScopeStore {
    db: DatabaseConnection,
}

impl ClientScopeStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore<ServiceClientScope> for ClientScopeStore {
    async fn exists(&self, ctx: &OperationContext, id: Uuid) -> AppResult<bool> {
        let count = ScopeEntity::find_by_id(id)
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_by_id(
        &self,
        ctx: &OperationContext,
        id: Uuid,
    ) -> AppResult<Option<ServiceClientScope>> {
        let model = ScopeEntity::find_by_id(id)
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .one(&self.db)
            .await?;
        Ok(model.map(ServiceClientScope::from))
    }

    async fn find_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &Uuid,
    ) -> AppResult<Option<ServiceClientScope>> {
        // Latest grant for the client.
        let model = ScopeEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::ClientId.eq(*owner))
            .order_by_desc(Column::GrantedAt)
            .one(&self.db)
            .await?;
        Ok(model.map(ServiceClientScope::from))
    }

    async fn list_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &Uuid,
        limit: Option<u64>,
    ) -> AppResult<Vec<ServiceClientScope>> {
        let mut query = ScopeEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::ClientId.eq(*owner))
            .order_by_asc(Column::Scope);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(ServiceClientScope::from).collect())
    }

    async fn register_new(
        &self,
        ctx: &OperationContext,
        record: &ServiceClientScope,
    ) -> AppResult<bool> {
        ensure_same_tenant(ctx, record.tenant_id)?;
        client_scope::active_model(record).insert(&self.db).await?;
        Ok(true)
    }

    async fn update(&self, ctx: &OperationContext, record: &ServiceClientScope) -> AppResult<bool> {
        ensure_same_tenant(ctx, record.tenant_id)?;
        let touched = Provenance::from_context(ctx, Utc::now());

        let result = ScopeEntity::update_many()
            .filter(Column::Id.eq(record.id))
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::Version.eq(record.version))
            .col_expr(Column::Scope, Expr::value(record.scope.clone()))
            .col_expr(Column::GrantedAt, Expr::value(record.granted_at))
            .col_expr(Column::ModifiedBy, Expr::value(touched.actor))
            .col_expr(
                Column::ModifiedCorrelationId,
                Expr::value(touched.correlation_id),
            )
            .col_expr(Column::ModifiedOrigin, Expr::value(touched.origin))
            .col_expr(Column::ModifiedOperation, Expr::value(touched.operation))
            .col_expr(Column::ModifiedAt, Expr::value(touched.at))
            .col_expr(Column::Version, Expr::col(Column::Version).add(1))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_by_owner(&self, ctx: &OperationContext, owner: &Uuid) -> AppResult<bool> {
        let result = ScopeEntity::delete_many()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::ClientId.eq(*owner))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn for_each(
        &self,
        ctx: &OperationContext,
        page: PaginationParams,
        mut handler: RecordHandler<ServiceClientScope>,
    ) -> AppResult<()> {
        let mut pages = ScopeEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .order_by_asc(Column::Id)
            .paginate(&self.db, page.limit());

        while let Some(models) = pages.fetch_and_next().await? {
            for model in models {
                handler(ServiceClientScope::from(model));
            }
        }
        Ok(())
    }

    async fn for_each_modified_since(
        &self,
        ctx: &OperationContext,
        now: DateTime<Utc>,
        since: DateTime<Utc>,
        mut handler: RecordHandler<ServiceClientScope>,
    ) -> AppResult<()> {
        let mut pages = ScopeEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::ModifiedAt.gt(since))
            .filter(Column::ModifiedAt.lte(now))
            .order_by_asc(Column::ModifiedAt)
            .paginate(&self.db, crate::config::DEFAULT_PAGE_SIZE);

        while let Some(models) = pages.fetch_and_next().await? {
            for model in models {
                handler(ServiceClientScope::from(model));
            }
        }
        Ok(())
    }
}
