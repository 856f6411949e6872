//! Per-call execution context.
//!
//! Every repository operation receives an [`OperationContext`] as its first
//! argument. Tenant, actor, and correlation data is threaded explicitly
//! through the call chain, never read from ambient/global state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable call context carried across the persistence boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// Tenant the operation is scoped to; every query filters on it.
    pub tenant_id: Uuid,
    /// Principal performing the operation (user id or service name).
    pub actor: String,
    /// Correlation id linking this call to the originating request.
    pub correlation_id: Uuid,
    /// System the request entered through (e.g. "storefront-api").
    pub origin: String,
    /// Business operation code (e.g. "auth.mfa.enroll").
    pub operation: String,
}

impl OperationContext {
    pub fn new(
        tenant_id: Uuid,
        actor: impl Into<String>,
        correlation_id: Uuid,
        origin: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id,
            actor: actor.into(),
            correlation_id,
            origin: origin.into(),
            operation: operation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_fields_round_trip() {
        let tenant = Uuid::new_v4();
        let correlation = Uuid::new_v4();
        let ctx = OperationContext::new(tenant, "svc-auth", correlation, "storefront-api", "auth.mfa.enroll");

        assert_eq!(ctx.tenant_id, tenant);
        assert_eq!(ctx.correlation_id, correlation);
        assert_eq!(ctx.actor, "svc-auth");
        assert_eq!(ctx.operation, "auth.mfa.enroll");
    }
}
