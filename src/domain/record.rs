//! Capability trait shared by all persisted auth records.

use std::fmt::Debug;

use uuid::Uuid;

use crate::domain::Provenance;

/// Common shape of every record the auth stores persist.
///
/// `OwnerKey` is the secondary lookup key the record is queried by: the user
/// id for MFA setups and password history, the client id for scopes, the
/// subject token id for exchanges. Keeping it as an associated type lets one
/// generic store contract (and one resilient adapter) cover all four record
/// families instead of duplicating the repository per entity.
pub trait AuthRecord: Clone + Debug + Send + Sync + 'static {
    /// Secondary key the record family is looked up by.
    type OwnerKey: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Short tag identifying the record family in log events.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
    fn tenant_id(&self) -> Uuid;
    fn owner_key(&self) -> &Self::OwnerKey;

    /// Optimistic concurrency counter, incremented by the store on update.
    fn version(&self) -> i64;

    fn created(&self) -> &Provenance;
    fn modified(&self) -> &Provenance;
}
