//! Postgres-backed token exchange store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::base::{ensure_same_tenant, RecordHandler, RecordStore};
use super::entities::token_exchange::{self, Column, Entity as ExchangeEntity};
use crate::domain::{Provenance, TokenExchangeRecord};
use crate::errors::AppResult;
use crate::types::{OperationContext, PaginationParams};

/// Concrete store for token exchange records.
///
/// Owner key is the subject token id (a string, not a Uuid): revocation and
/// replay checks look exchanges up by the token that was presented.
pub struct TokenExchangeStore {
    db: DatabaseConnection,
}

impl TokenExchangeStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore<TokenExchangeRecord> for TokenExchangeStore {
    async fn exists(&self, ctx: &OperationContext, id: Uuid) -> AppResult<bool> {
        let count = ExchangeEntity::find_by_id(id)
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_by_id(
        &self,
        ctx: &OperationContext,
        id: Uuid,
    ) -> AppResult<Option<TokenExchangeRecord>> {
        let model = ExchangeEntity::find_by_id(id)
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .one(&self.db)
            .await?;
        Ok(model.map(TokenExchangeRecord::from))
    }

    async fn find_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &String,
    ) -> AppResult<Option<TokenExchangeRecord>> {
        // Latest exchange for the subject token.
        let model = ExchangeEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::SubjectTokenId.eq(owner.as_str()))
            .order_by_desc(Column::ModifiedAt)
            .one(&self.db)
            .await?;
        Ok(model.map(TokenExchangeRecord::from))
    }

    async fn list_by_owner(
        &self,
        ctx: &OperationContext,
        owner: &String,
        limit: Option<u64>,
    ) -> AppResult<Vec<TokenExchangeRecord>> {
        let mut query = ExchangeEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::SubjectTokenId.eq(owner.as_str()))
            .order_by_desc(Column::ModifiedAt);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(TokenExchangeRecord::from).collect())
    }

    async fn register_new(
        &self,
        ctx: &OperationContext,
        record: &TokenExchangeRecord,
    ) -> AppResult<bool> {
        ensure_same_tenant(ctx, record.tenant_id)?;
        token_exchange::active_model(record).insert(&self.db).await?;
        Ok(true)
    }

    async fn update(
        &self,
        ctx: &OperationContext,
        record: &TokenExchangeRecord,
    ) -> AppResult<bool> {
        ensure_same_tenant(ctx, record.tenant_id)?;
        let touched = Provenance::from_context(ctx, Utc::now());

        let result = ExchangeEntity::update_many()
            .filter(Column::Id.eq(record.id))
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::Version.eq(record.version))
            .col_expr(
                Column::IssuedTokenId,
                Expr::value(record.issued_token_id.clone()),
            )
            .col_expr(Column::ExpiresAt, Expr::value(record.expires_at))
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

    async fn delete_by_owner(&self, ctx: &OperationContext, owner: &String) -> AppResult<bool> {
        let result = ExchangeEntity::delete_many()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::SubjectTokenId.eq(owner.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn for_each(
        &self,
        ctx: &OperationContext,
        page: PaginationParams,
        mut handler: RecordHandler<TokenExchangeRecord>,
    ) -> AppResult<()> {
        let mut pages = ExchangeEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .order_by_asc(Column::Id)
            .paginate(&self.db, page.limit());

        while let Some(models) = pages.fetch_and_next().await? {
            for model in models {
                handler(TokenExchangeRecord::from(model));
            }
        }
        Ok(())
    }

    async fn for_each_modified_since(
        &self,
        ctx: &OperationContext,
        now: DateTime<Utc>,
        since: DateTime<Utc>,
        mut handler: RecordHandler<TokenExchangeRecord>,
    ) -> AppResult<()> {
        let mut pages = ExchangeEntity::find()
            .filter(Column::TenantId.eq(ctx.tenant_id))
            .filter(Column::ModifiedAt.gt(since))
            .filter(Column::ModifiedAt.lte(now))
            .order_by_asc(Column::ModifiedAt)
            .paginate(&self.db, crate::config::DEFAULT_PAGE_SIZE);

        while let Some(models) = pages.fetch_and_next().await? {
            for model in models {
                handler(TokenExchangeRecord::from(model));
            }
        }
        Ok(())
    }
}
