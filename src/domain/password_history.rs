//! Password history entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AuthRecord, Provenance};

/// One prior password hash for a user.
///
/// Consulted on password change to reject reuse of recent passwords.
/// Hashing happens upstream; only the hash is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHistoryRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub changed_at: DateTime<Utc>,
    pub created: Provenance,
    pub modified: Provenance,
    pub version: i64,
}

impl PasswordHistoryRecord {
    pub fn new(
        tenant_id: Uuid,
        user_id: Uuid,
        password_hash: String,
        changed_at: DateTime<Utc>,
        provenance: Provenance,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            user_id,
            password_hash,
            changed_at,
            created: provenance.clone(),
            modified: provenance,
            version: 1,
        }
    }
}

impl AuthRecord for PasswordHistoryRecord {
    type OwnerKey = Uuid;

    const KIND: &'static str = "password_history";

    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    fn owner_key(&self) -> &Uuid {
        &self.user_id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn created(&self) -> &Provenance {
        &self.created
    }

    fn modified(&self) -> &Provenance {
        &self.modified
    }
}
