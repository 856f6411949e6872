//! Resilient adapter behavior tests.
//!
//! The adapter is exercised against mocked stores; a counting tracing layer
//! verifies that masked failures emit exactly one error event and that
//! pass-through paths emit none.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::DbErr;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use uuid::Uuid;

use auth_persistence::domain::{
    MfaMethod, MfaSetup, PasswordHistoryRecord, Provenance, TokenExchangeRecord,
};
use auth_persistence::errors::{AppError, AppResult};
use auth_persistence::infra::{MockRecordStore, RecordStore, Resilient};
use auth_persistence::types::{OperationContext, PaginationParams};

/// Counts error-severity events emitted while the guard is alive.
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn error_counter() -> (tracing::subscriber::DefaultGuard, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(count.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (guard, count)
}

fn test_ctx(tenant_id: Uuid) -> OperationContext {
    OperationContext::new(
        tenant_id,
        "user-42",
        Uuid::new_v4(),
        "storefront-api",
        "auth.mfa.verify",
    )
}

fn test_mfa_setup(tenant_id: Uuid, user_id: Uuid) -> MfaSetup {
    let prov = Provenance::from_context(&test_ctx(tenant_id), Utc::now());
    MfaSetup::new(tenant_id, user_id, MfaMethod::Totp, "ciphertext".into(), prov)
}

fn test_history(tenant_id: Uuid, user_id: Uuid) -> PasswordHistoryRecord {
    let prov = Provenance::from_context(&test_ctx(tenant_id), Utc::now());
    PasswordHistoryRecord::new(tenant_id, user_id, "hash".into(), Utc::now(), prov)
}

fn store_failure() -> AppError {
    AppError::Database(DbErr::Custom("connection reset by peer".into()))
}

#[tokio::test]
async fn find_by_owner_returns_entity_unchanged_and_logs_nothing() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let setup = test_mfa_setup(tenant_id, user_id);
    let setup_id = setup.id;

    let mut store = MockRecordStore::<MfaSetup>::new();
    store
        .expect_find_by_owner()
        .withf(move |_, owner| *owner == user_id)
        .times(1)
        .returning(move |_, _| Ok(Some(setup.clone())));

    let adapter = Resilient::new(Arc::new(store));
    let found = adapter
        .find_by_owner(&test_ctx(tenant_id), &user_id)
        .await
        .unwrap();

    assert_eq!(found.unwrap().id, setup_id);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn find_by_owner_not_found_passes_through_and_logs_nothing() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();

    let mut store = MockRecordStore::<MfaSetup>::new();
    store.expect_find_by_owner().returning(|_, _| Ok(None));

    let adapter = Resilient::new(Arc::new(store));
    let found = adapter
        .find_by_owner(&test_ctx(tenant_id), &Uuid::new_v4())
        .await
        .unwrap();

    assert!(found.is_none());
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn find_by_owner_failure_masks_to_none_and_logs_once() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();

    let mut store = MockRecordStore::<MfaSetup>::new();
    store
        .expect_find_by_owner()
        .returning(|_, _| Err(store_failure()));

    let adapter = Resilient::new(Arc::new(store));
    let found = adapter
        .find_by_owner(&test_ctx(tenant_id), &Uuid::new_v4())
        .await
        .unwrap();

    assert!(found.is_none());
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn list_by_owner_returns_records_unchanged() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let records = vec![
        test_history(tenant_id, user_id),
        test_history(tenant_id, user_id),
        test_history(tenant_id, user_id),
    ];
    let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

    let mut store = MockRecordStore::<PasswordHistoryRecord>::new();
    store
        .expect_list_by_owner()
        .withf(move |_, owner, limit| *owner == user_id && *limit == Some(5))
        .returning(move |_, _, _| Ok(records.clone()));

    let adapter = Resilient::new(Arc::new(store));
    let listed = adapter
        .list_by_owner(&test_ctx(tenant_id), &user_id, Some(5))
        .await
        .unwrap();

    assert_eq!(listed.iter().map(|r| r.id).collect::<Vec<_>>(), ids);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn list_by_owner_failure_masks_to_empty_and_logs_once() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();

    let mut store = MockRecordStore::<PasswordHistoryRecord>::new();
    store
        .expect_list_by_owner()
        .returning(|_, _, _| Err(store_failure()));

    let adapter = Resilient::new(Arc::new(store));
    let listed = adapter
        .list_by_owner(&test_ctx(tenant_id), &Uuid::new_v4(), None)
        .await
        .unwrap();

    assert!(listed.is_empty());
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn update_success_passes_through() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();
    let setup = test_mfa_setup(tenant_id, Uuid::new_v4());

    let mut store = MockRecordStore::<MfaSetup>::new();
    store.expect_update().returning(|_, _| Ok(true));

    let adapter = Resilient::new(Arc::new(store));
    assert!(adapter.update(&test_ctx(tenant_id), &setup).await.unwrap());
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_failure_masks_to_false_and_logs_once() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();
    let setup = test_mfa_setup(tenant_id, Uuid::new_v4());

    let mut store = MockRecordStore::<MfaSetup>::new();
    store.expect_update().returning(|_, _| Err(store_failure()));

    let adapter = Resilient::new(Arc::new(store));
    let applied = adapter.update(&test_ctx(tenant_id), &setup).await.unwrap();

    assert!(!applied);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn delete_by_owner_true_passes_through_unchanged() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let mut store = MockRecordStore::<MfaSetup>::new();
    store
        .expect_delete_by_owner()
        .withf(move |_, owner| *owner == user_id)
        .returning(|_, _| Ok(true));

    let adapter = Resilient::new(Arc::new(store));
    assert!(adapter
        .delete_by_owner(&test_ctx(tenant_id), &user_id)
        .await
        .unwrap());
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delete_by_owner_failure_masks_to_false_and_logs_once() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();

    let mut store = MockRecordStore::<MfaSetup>::new();
    store
        .expect_delete_by_owner()
        .returning(|_, _| Err(store_failure()));

    let adapter = Resilient::new(Arc::new(store));
    let deleted = adapter
        .delete_by_owner(&test_ctx(tenant_id), &Uuid::new_v4())
        .await
        .unwrap();

    assert!(!deleted);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn register_new_failure_propagates_without_adapter_log() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();
    let setup = test_mfa_setup(tenant_id, Uuid::new_v4());

    let mut store = MockRecordStore::<MfaSetup>::new();
    store
        .expect_register_new()
        .returning(|_, _| Err(store_failure()));

    let adapter = Resilient::new(Arc::new(store));
    let result = adapter.register_new(&test_ctx(tenant_id), &setup).await;

    assert!(matches!(result, Err(AppError::Database(_))));
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_new_success_passes_through() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();
    let setup = test_mfa_setup(tenant_id, Uuid::new_v4());

    let mut store = MockRecordStore::<MfaSetup>::new();
    store.expect_register_new().times(1).returning(|_, _| Ok(true));

    let adapter = Resilient::new(Arc::new(store));
    assert!(adapter
        .register_new(&test_ctx(tenant_id), &setup)
        .await
        .unwrap());
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn exists_and_find_by_id_errors_propagate_unmasked() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();

    let mut store = MockRecordStore::<MfaSetup>::new();
    store.expect_exists().returning(|_, _| Err(store_failure()));
    store
        .expect_find_by_id()
        .returning(|_, _| Err(store_failure()));

    let adapter = Resilient::new(Arc::new(store));
    let ctx = test_ctx(tenant_id);

    assert!(adapter.exists(&ctx, Uuid::new_v4()).await.is_err());
    assert!(adapter.find_by_id(&ctx, Uuid::new_v4()).await.is_err());
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn find_by_id_passes_result_through() {
    let tenant_id = Uuid::new_v4();
    let setup = test_mfa_setup(tenant_id, Uuid::new_v4());
    let setup_id = setup.id;

    let mut store = MockRecordStore::<MfaSetup>::new();
    store
        .expect_find_by_id()
        .withf(move |_, id| *id == setup_id)
        .returning(move |_, _| Ok(Some(setup.clone())));

    let adapter = Resilient::new(Arc::new(store));
    let found = adapter
        .find_by_id(&test_ctx(tenant_id), setup_id)
        .await
        .unwrap();

    assert_eq!(found.unwrap().id, setup_id);
}

// The mock carries no expectations here: any delegation from the adapter's
// enumeration placeholders would panic the test.
#[tokio::test]
async fn for_each_invokes_handler_zero_times() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();

    let store = MockRecordStore::<MfaSetup>::new();
    let adapter = Resilient::new(Arc::new(store));

    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_handler = seen.clone();
    let result: AppResult<()> = adapter
        .for_each(
            &test_ctx(tenant_id),
            PaginationParams::default(),
            Box::new(move |_| {
                seen_in_handler.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .await;

    assert!(result.is_ok());
    assert_eq!(seen.load(Ordering::SeqCst), 0);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn for_each_modified_since_invokes_handler_zero_times() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();

    let store = MockRecordStore::<MfaSetup>::new();
    let adapter = Resilient::new(Arc::new(store));

    let now = Utc::now();
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_handler = seen.clone();
    let result = adapter
        .for_each_modified_since(
            &test_ctx(tenant_id),
            now,
            now - Duration::days(30),
            Box::new(move |_| {
                seen_in_handler.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .await;

    assert!(result.is_ok());
    assert_eq!(seen.load(Ordering::SeqCst), 0);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

// String owner keys (token exchange) go through the same generic adapter.
#[tokio::test]
async fn string_keyed_records_mask_failures_the_same_way() {
    let (_guard, errors) = error_counter();
    let tenant_id = Uuid::new_v4();
    let subject = "subj-token-1".to_string();

    let mut store = MockRecordStore::<TokenExchangeRecord>::new();
    let expected = subject.clone();
    store
        .expect_find_by_owner()
        .withf(move |_, owner| *owner == expected)
        .returning(|_, _| Err(store_failure()));

    let adapter = Resilient::new(Arc::new(store));
    let found = adapter
        .find_by_owner(&test_ctx(tenant_id), &subject)
        .await
        .unwrap();

    assert!(found.is_none());
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn adapter_is_shared_safely_across_concurrent_callers() {
    let tenant_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let setup = test_mfa_setup(tenant_id, user_id);

    let mut store = MockRecordStore::<MfaSetup>::new();
    store
        .expect_find_by_owner()
        .returning(move |_, _| Ok(Some(setup.clone())));

    let adapter = Resilient::new(Arc::new(store));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let adapter = adapter.clone();
        let ctx = test_ctx(tenant_id);
        handles.push(tokio::spawn(async move {
            adapter.find_by_owner(&ctx, &user_id).await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_some());
    }
}
