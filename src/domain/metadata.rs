//! Provenance metadata attached to every persisted record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::OperationContext;

/// Who changed a record, through what, and when.
///
/// Every entity carries two of these: one frozen at creation, one updated on
/// each modification. The store layer stamps them; callers only supply the
/// [`OperationContext`] they already hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub actor: String,
    pub correlation_id: Uuid,
    pub origin: String,
    pub operation: String,
    pub at: DateTime<Utc>,
}

impl Provenance {
    /// Stamp provenance from a call context at the given instant.
    pub fn from_context(ctx: &OperationContext, at: DateTime<Utc>) -> Self {
        Self {
            actor: ctx.actor.clone(),
            correlation_id: ctx.correlation_id,
            origin: ctx.origin.clone(),
            operation: ctx.operation.clone(),
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_copies_context_fields() {
        let ctx = OperationContext::new(
            Uuid::new_v4(),
            "user-42",
            Uuid::new_v4(),
            "admin-console",
            "auth.password.change",
        );
        let now = Utc::now();
        let prov = Provenance::from_context(&ctx, now);

        assert_eq!(prov.actor, ctx.actor);
        assert_eq!(prov.correlation_id, ctx.correlation_id);
        assert_eq!(prov.origin, ctx.origin);
        assert_eq!(prov.operation, ctx.operation);
        assert_eq!(prov.at, now);
    }
}
