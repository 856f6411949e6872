//! Service client scope database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Provenance, ServiceClientScope};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_service_client_scopes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    pub scope: String,
    pub granted_at: DateTimeUtc,
    pub created_by: String,
    pub created_correlation_id: Uuid,
    pub created_origin: String,
    pub created_operation: String,
    pub created_at: DateTimeUtc,
    pub modified_by: String,
    pub modified_correlation_id: Uuid,
    pub modified_origin: String,
    pub modified_operation: String,
    pub modified_at: DateTimeUtc,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for ServiceClientScope {
    fn from(model: Model) -> Self {
        ServiceClientScope {
            id: model.id,
            tenant_id: model.tenant_id,
            client_id: model.client_id,
            scope: model.scope,
            granted_at: model.granted_at,
            created: Provenance {
                actor: model.created_by,
                correlation_id: model.created_correlation_id,
                origin: model.created_origin,
                operation: model.created_operation,
                at: model.created_at,
            },
            modified: Provenance {
                actor: model.modified_by,
                correlation_id: model.modified_correlation_id,
                origin: model.modified_origin,
                operation: model.modified_operation,
                at: model.modified_at,
            },
            version: model.version,
        }
    }
}

/// Build the insert model for a new scope grant
pub fn active_model(record: &ServiceClientScope) -> ActiveModel {
    ActiveModel {
        id: Set(record.id),
        tenant_id: Set(record.tenant_id),
        client_id: Set(record.client_id),
        scope: Set(record.scope.clone()),
        granted_at: Set(record.granted_at),
        created_by: Set(record.created.actor.clone()),
        created_correlation_id: Set(record.created.correlation_id),
        created_origin: Set(record.created.origin.clone()),
        created_operation: Set(record.created.operation.clone()),
        created_at: Set(record.created.at),
        modified_by: Set(record.modified.actor.clone()),
        modified_correlation_id: Set(record.modified.correlation_id),
        modified_origin: Set(record.modified.origin.clone()),
        modified_operation: Set(record.modified.operation.clone()),
        modified_at: Set(record.modified.at),
        version: Set(record.version),
    }
}
