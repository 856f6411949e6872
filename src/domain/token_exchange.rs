//! Token exchange entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AuthRecord, Provenance};

/// Record of a subject token exchanged for an issued token.
///
/// Looked up by the subject token id during revocation and replay checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenExchangeRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub subject_token_id: String,
    pub issued_token_id: String,
    pub expires_at: DateTime<Utc>,
    pub created: Provenance,
    pub modified: Provenance,
    pub version: i64,
}

impl TokenExchangeRecord {
    pub fn new(
        tenant_id: Uuid,
        subject_token_id: String,
        issued_token_id: String,
        expires_at: DateTime<Utc>,
        provenance: Provenance,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            subject_token_id,
            issued_token_id,
            expires_at,
            created: provenance.clone(),
            modified: provenance,
            version: 1,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

impl AuthRecord for TokenExchangeRecord {
    type OwnerKey = String;

    const KIND: &'static str = "token_exchange";

    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    fn owner_key(&self) -> &String {
        &self.subject_token_id
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationContext;
    use chrono::Duration;

    #[test]
    fn expiry_is_inclusive_of_the_deadline() {
        let ctx = OperationContext::new(
            Uuid::new_v4(),
            "svc-gateway",
            Uuid::new_v4(),
            "gateway",
            "auth.token.exchange",
        );
        let now = Utc::now();
        let record = TokenExchangeRecord::new(
            Uuid::new_v4(),
            "subj-1".into(),
            "issued-1".into(),
            now,
            Provenance::from_context(&ctx, now),
        );

        assert!(record.is_expired(now));
        assert!(!record.is_expired(now - Duration::seconds(1)));
    }
}
