//! Integration tests for the record store
//!
//! These tests run the full store path (provisioning, upsert, query,
//! teardown) against the in-memory backend, which mirrors the remote
//! service's absence and conflict signals.

use chrono::{Months, Utc};
use formstore::adapters::backend::memory::InMemoryBackend;
use formstore::adapters::backend::traits::Backend;
use formstore::domain::record::{CustomContent, OrderFormRecord, RecordKind};
use formstore::domain::RecordType;
use formstore::store::{RecordStore, StoreOptions, UpsertResult};
use futures::TryStreamExt;
use std::sync::Arc;

async fn open_store(backend: Arc<InMemoryBackend>) -> RecordStore {
    RecordStore::open(backend, StoreOptions::default())
        .await
        .expect("store should open against a fresh backend")
}

fn iron_record() -> OrderFormRecord {
    OrderFormRecord::builder()
        .profile("Iron")
        .source("RCLS")
        .build()
        .unwrap()
}

fn health_record() -> OrderFormRecord {
    let date_of_birth = Utc::now()
        .checked_sub_months(Months::new(7 * 12 + 1))
        .unwrap();
    OrderFormRecord::builder()
        .profile("EM")
        .source("Randox Health")
        .health("1234", date_of_birth, "Unknown")
        .metadata("PID", CustomContent::String("PID1234".to_string()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_seed_and_query_both_types() {
    let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));
    let store = open_store(Arc::clone(&backend)).await;

    let base = iron_record();
    let health = health_record();

    assert!(matches!(
        store.upsert_if_absent(&base).await.unwrap(),
        UpsertResult::Created { .. }
    ));
    assert!(matches!(
        store.upsert_if_absent(&health).await.unwrap(),
        UpsertResult::Created { .. }
    ));

    let base_type = RecordType::new("TestOrderForm").unwrap();
    let bases: Vec<OrderFormRecord> = store
        .query_by_type(base_type)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(bases.len(), 1);
    assert_eq!(bases[0].profile(), "Iron");
    assert_eq!(bases[0].source(), "RCLS");
    assert!(matches!(bases[0].kind(), RecordKind::Base));

    let health_type = RecordType::new("HealthTestOrderForm").unwrap();
    let healths: Vec<OrderFormRecord> = store
        .query_by_type(health_type)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(healths.len(), 1);
    assert_eq!(healths[0].profile(), "EM");
    match healths[0].kind() {
        RecordKind::Health { patient_id, .. } => assert_eq!(patient_id, "1234"),
        RecordKind::Base => panic!("expected health variant"),
    }
    assert_eq!(
        healths[0].metadata().get("PID").and_then(|c| c.as_str()),
        Some("PID1234")
    );
}

#[tokio::test]
async fn test_upsert_is_idempotent() {
    let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));
    let store = open_store(Arc::clone(&backend)).await;
    let record = iron_record();

    let first = store.upsert_if_absent(&record).await.unwrap();
    let cost_units = match first {
        UpsertResult::Created { cost_units, .. } => cost_units,
        UpsertResult::AlreadyExists { .. } => panic!("first upsert must create"),
    };
    assert!(cost_units > 0.0);

    // Repeating the same upsert changes nothing
    for _ in 0..3 {
        let again = store.upsert_if_absent(&record).await.unwrap();
        assert_eq!(again, UpsertResult::AlreadyExists { id: *record.id() });
    }

    assert_eq!(backend.document_count(), 1);
}

#[tokio::test]
async fn test_same_profile_different_ids_both_stored() {
    let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));
    let store = open_store(Arc::clone(&backend)).await;

    // Identity is the id, not the payload: two Iron forms are two records
    store.upsert_if_absent(&iron_record()).await.unwrap();
    store.upsert_if_absent(&iron_record()).await.unwrap();

    let record_type = RecordType::new("TestOrderForm").unwrap();
    assert_eq!(backend.count_by_type(&record_type), 2);
}

#[tokio::test]
async fn test_query_streams_across_pages() {
    let backend = Arc::new(InMemoryBackend::with_page_size("TestOrderForms", 2));
    let store = open_store(Arc::clone(&backend)).await;

    for _ in 0..5 {
        store.upsert_if_absent(&iron_record()).await.unwrap();
    }

    let records: Vec<OrderFormRecord> = store
        .query_by_type(RecordType::new("TestOrderForm").unwrap())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(records.len(), 5);
}

#[tokio::test]
async fn test_query_does_not_leak_other_types() {
    let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));
    let store = open_store(Arc::clone(&backend)).await;

    store.upsert_if_absent(&iron_record()).await.unwrap();
    store.upsert_if_absent(&health_record()).await.unwrap();

    let healths: Vec<OrderFormRecord> = store
        .query_by_type(RecordType::new("HealthTestOrderForm").unwrap())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(healths.len(), 1);
    assert_eq!(
        healths[0].record_type().as_str(),
        "HealthTestOrderForm"
    );
}

#[tokio::test]
async fn test_quote_bearing_type_roundtrips() {
    let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));
    let store = open_store(Arc::clone(&backend)).await;

    let record_type = RecordType::new("O'Brien").unwrap();
    let record = OrderFormRecord::builder()
        .record_type(record_type.clone())
        .profile("Iron")
        .source("RCLS")
        .build()
        .unwrap();
    store.upsert_if_absent(&record).await.unwrap();

    let records: Vec<OrderFormRecord> = store
        .query_by_type(record_type)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type().as_str(), "O'Brien");
}

#[tokio::test]
async fn test_query_unknown_type_is_empty_not_error() {
    let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));
    let store = open_store(backend).await;

    let records: Vec<OrderFormRecord> = store
        .query_by_type(RecordType::new("NoSuchType").unwrap())
        .try_collect()
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_reopen_is_idempotent() {
    let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));

    let store = open_store(Arc::clone(&backend)).await;
    store.upsert_if_absent(&iron_record()).await.unwrap();

    // Opening again must not disturb existing records
    let reopened = open_store(Arc::clone(&backend)).await;
    let records: Vec<OrderFormRecord> = reopened
        .query_by_type(RecordType::new("TestOrderForm").unwrap())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_teardown_removes_everything_and_repeats() {
    let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));
    let store = open_store(Arc::clone(&backend)).await;
    store.upsert_if_absent(&iron_record()).await.unwrap();
    store.upsert_if_absent(&health_record()).await.unwrap();
    assert_eq!(backend.document_count(), 2);

    store.teardown().await.unwrap();
    assert_eq!(backend.document_count(), 0);

    // Tearing down an absent database succeeds quietly
    let again = RecordStore::attach(
        Arc::clone(&backend) as Arc<dyn Backend>,
        StoreOptions::default(),
    )
    .unwrap();
    again.teardown().await.unwrap();
}

#[tokio::test]
async fn test_record_survives_storage_roundtrip() {
    let backend = Arc::new(InMemoryBackend::new("TestOrderForms"));
    let store = open_store(backend).await;

    let original = health_record();
    store.upsert_if_absent(&original).await.unwrap();

    let fetched: Vec<OrderFormRecord> = store
        .query_by_type(original.record_type().clone())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(fetched.len(), 1);
    let fetched = &fetched[0];

    assert_eq!(fetched.id(), original.id());
    assert_eq!(fetched.profile(), original.profile());
    assert_eq!(fetched.source(), original.source());
    assert_eq!(fetched.kind(), original.kind());
    assert_eq!(fetched.metadata(), original.metadata());
}
