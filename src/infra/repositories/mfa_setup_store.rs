//! Postgres-backed MFA setup store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::base::{ensure_same_tenant, RecordHandler, RecordStore};
use super::entities::mfa_setup::{self, Column, Entity as MfaSetupEntity};
use crate::domain::{MfaSetup, Provenance};
use crate::errors::AppResult;
use crate::types::{OperationContext, PaginationParams};

/// Concrete store for MFA enrollments.
pub struct MfaSetupStore {
    db: DatabaseConnection,
}

impl MfaSetupStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore<MfaSetup> for MfaSetupStore {
    async fn exists(&self, ctx: &OperationContext, id: Uuid) -> AppResult<bool> {
        let count = MfaSetupEntity::find_by_id(id)
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, ctx: &OperationContext, id: Uuid) -> AppResult<Option<MfaSetup>> {
        let model = MfaSetupEntity::find_by_id(id)
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .one(&self.db)
            .await?;
        Ok(model.map(MfaSetup::from))
    }

    async fn find_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &Uuid,
    ) -> AppResult<Option<MfaSetup>> {
        let model = MfaSetupEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::UserId.eq(*owner))
            .order_by_desc(Column::ModifiedAt)
            .one(&self.db)
            .await?;
        Ok(model.map(MfaSetup::from))
    }

    async fn list_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &Uuid,
        limit: Option<u64>,
    ) -> AppResult<Vec<MfaSetup>> {
        let mut query = MfaSetupEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::UserId.eq(*owner))
            .order_by_desc(Column::ModifiedAt);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(MfaSetup::from).collect())
    }

    async fn register_new(&self, ctx: &OperationContext, record: &MfaSetup) -> AppResult<bool> {
        ensure_same_tenant(ctx, record.tenant_id)?;
        mfa_setup::active_model(record).insert(&self.db).await?;
        Ok(true)
    }

    async fn update(&self, ctx: &OperationContext, record: &MfaSetup) -> AppResult<bool> {
        ensure_same_tenant(ctx, record.tenant_id)?;
        let touched = Provenance::from_context(ctx, Utc::now());

        // Optimistic concurrency: the write only lands if the stored version
        // still matches the one the caller read.
        let result = MfaSetupEntity::update_many()
            .filter(Column::Id.eq(record.id))
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::Version.eq(record.version))
            .col_expr(Column::Method, Expr::value(record.method.to_string()))
            .col_expr(
                Column::SecretCiphertext,
                Expr::value(record.secret_ciphertext.clone()),
            )
            .col_expr(Column::ConfirmedAt, Expr::value(record.confirmed_at))
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
        let result = MfaSetupEntity::delete_many()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::UserId.eq(*owner))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn for_each(
        &self,
        ctx: &OperationContext,
        page: PaginationParams,
        mut handler: RecordHandler<MfaSetup>,
    ) -> AppResult<()> {
        let mut pages = MfaSetupEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .order_by_asc(Column::Id)
            .paginate(&self.db, page.limit());

        while let Some(models) = pages.fetch_and_next().await? {
            for model in models {
                handler(MfaSetup::from(model));
            }
        }
        Ok(())
    }

    async fn for_each_modified_since(
        &self,
        ctx: &OperationContext,
        now: DateTime<Utc>,
        since: DateTime<Utc>,
        mut handler: RecordHandler<MfaSetup>,
    ) -> AppResult<()> {
        let mut pages = MfaSetupEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::ModifiedAt.gt(since))
            .filter(Column::ModifiedAt.lte(now))
            .order_by_asc(Column::ModifiedAt)
            .paginate(&self.db, crate::config::DEFAULT_PAGE_SIZE);

        while let Some(models) = pages.fetch_and_next().await? {
            for model in models {
                handler(MfaSetup::from(model));
            }
        }
        Ok(())
    }
}
