//! Service client scope entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AuthRecord, Provenance};

/// A scope granted to a machine client (service-to-service credential).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceClientScope {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    /// Scope name, e.g. "orders:read".
    pub scope: String,
    pub granted_at: DateTime<Utc>,
    pub created: Provenance,
    pub modified: Provenance,
    pub version: i64,
}

impl ServiceClientScope {
    pub fn new(
        tenant_id: Uuid,
        client_id: Uuid,
        scope: String,
        granted_at: DateTime<Utc>,
        provenance: Provenance,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            client_id,
            scope,
            granted_at,
            created: provenance.clone(),
            modified: provenance,
            version: 1,
        }
    }
}

impl AuthRecord for ServiceClientScope {
    type OwnerKey = Uuid;

    const KIND: &'static str = "service_client_scope";

    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    fn owner_key(&self) -> &Uuid {
        &self.client_id
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
