//! MFA setup database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{MfaMethod, MfaSetup, Provenance};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_mfa_setups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub method: String,
    pub secret_ciphertext: String,
    pub confirmed_at: Option<DateTimeUtc>,
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
impl From<Model> for MfaSetup {
    fn from(model: Model) -> Self {
        MfaSetup {
            id: model.id,
            tenant_id: model.tenant_id,
            user_id: model.user_id,
            method: MfaMethod::from(model.method.as_str()),
            secret_ciphertext: model.secret_ciphertext,
            confirmed_at: model.confirmed_at,
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

/// Build the insert model for a new enrollment
pub fn active_model(record: &MfaSetup) -> ActiveModel {
    ActiveModel {
        id: Set(record.id),
        tenant_id: Set(record.tenant_id),
        user_id: Set(record.user_id),
        method: Set(record.method.to_string()),
        secret_ciphertext: Set(record.secret_ciphertext.clone()),
        confirmed_at: Set(record.confirmed_at),
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn model_converts_to_domain_entity() {
        let now = Utc::now();
        let model = Model {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            method: "webauthn".into(),
            secret_ciphertext: "ct".into(),
            confirmed_at: Some(now),
            created_by: "user-1".into(),
            created_correlation_id: Uuid::new_v4(),
            created_origin: "storefront-api".into(),
            created_operation: "auth.mfa.enroll".into(),
            created_at: now,
            modified_by: "user-1".into(),
            modified_correlation_id: Uuid::new_v4(),
            modified_origin: "storefront-api".into(),
            modified_operation: "auth.mfa.confirm".into(),
            modified_at: now,
            version: 2,
        };

        let entity = MfaSetup::from(model.clone());
        assert_eq!(entity.id, model.id);
        assert_eq!(entity.method, MfaMethod::WebAuthn);
        assert!(entity.is_confirmed());
        assert_eq!(entity.version, 2);
        assert_eq!(entity.modified.operation, "auth.mfa.confirm");
    }
}
