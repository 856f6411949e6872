//! MFA enrollment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AuthRecord, Provenance};

/// Supported second-factor methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MfaMethod {
    Totp,
    WebAuthn,
    Sms,
}

impl From<&str> for MfaMethod {
    fn from(s: &str) -> Self {
        match s {
            "webauthn" => MfaMethod::WebAuthn,
            "sms" => MfaMethod::Sms,
            _ => MfaMethod::Totp,
        }
    }
}

impl std::fmt::Display for MfaMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MfaMethod::Totp => write!(f, "totp"),
            MfaMethod::WebAuthn => write!(f, "webauthn"),
            MfaMethod::Sms => write!(f, "sms"),
        }
    }
}

/// A user's second-factor enrollment.
///
/// At most one active setup per user within a tenant. The secret arrives
/// already encrypted; this layer never sees plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MfaSetup {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub method: MfaMethod,
    #[serde(skip_serializing)]
    pub secret_ciphertext: String,
    /// Set once the user has proven possession of the factor.
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created: Provenance,
    pub modified: Provenance,
    pub version: i64,
}

impl MfaSetup {
    /// Create a fresh, unconfirmed enrollment.
    pub fn new(
        tenant_id: Uuid,
        user_id: Uuid,
        method: MfaMethod,
        secret_ciphertext: String,
        provenance: Provenance,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            user_id,
            method,
            secret_ciphertext,
            confirmed_at: None,
            created: provenance.clone(),
            modified: provenance,
            version: 1,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }

    /// Mark the factor as proven.
    pub fn confirm(&mut self, at: DateTime<Utc>) {
        self.confirmed_at = Some(at);
    }
}

impl AuthRecord for MfaSetup {
    type OwnerKey = Uuid;

    const KIND: &'static str = "mfa_setup";

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationContext;

    fn provenance() -> Provenance {
        let ctx = OperationContext::new(
            Uuid::new_v4(),
            "user-1",
            Uuid::new_v4(),
            "storefront-api",
            "auth.mfa.enroll",
        );
        Provenance::from_context(&ctx, Utc::now())
    }

    #[test]
    fn new_setup_starts_unconfirmed_at_version_one() {
        let setup = MfaSetup::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            MfaMethod::Totp,
            "ciphertext".into(),
            provenance(),
        );
        assert!(!setup.is_confirmed());
        assert_eq!(setup.version, 1);
    }

    #[test]
    fn confirm_sets_timestamp() {
        let mut setup = MfaSetup::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            MfaMethod::WebAuthn,
            "ciphertext".into(),
            provenance(),
        );
        let at = Utc::now();
        setup.confirm(at);
        assert_eq!(setup.confirmed_at, Some(at));
    }

    #[test]
    fn unknown_method_string_defaults_to_totp() {
        assert_eq!(MfaMethod::from("bogus"), MfaMethod::Totp);
        assert_eq!(MfaMethod::from("webauthn"), MfaMethod::WebAuthn);
    }

    #[test]
    fn serialization_omits_the_secret() {
        let setup = MfaSetup::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            MfaMethod::Totp,
            "ciphertext".into(),
            provenance(),
        );
        let json = serde_json::to_value(&setup).unwrap();
        assert!(json.get("secret_ciphertext").is_none());
        assert_eq!(json["method"], "totp");
    }
}
