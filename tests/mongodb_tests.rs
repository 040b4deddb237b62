//! Integration tests for the MongoDB store
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a MongoDB container)
//! - Feature flag `mongodb_backend` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features mongodb_backend --test mongodb_tests
//! ```
//!
//! # Test isolation
//!
//! Tests share one standalone MongoDB container and one single-node replica
//! set (each via `OnceLock`). Each test gets its own database, so tests can
//! run in parallel. The standalone server runs the tenant cascade without a
//! transaction; the replica set runs it inside one.

#![cfg(feature = "mongodb_backend")]

use axum::http::StatusCode;
use axum_test::TestServer;
use mongodb::Client;
use rent_ledger::prelude::*;
use serde_json::{Value, json};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

// ---------------------------------------------------------------------------
// Shared test environment (single container, fresh database per test)
// ---------------------------------------------------------------------------

/// Holds the testcontainer handle (keeps it alive) and the connection URL.
struct MongoTestEnv {
    /// Container handle. Dropping it stops the MongoDB container.
    _container: testcontainers::ContainerAsync<Mongo>,
    /// Connection URL for creating per-test clients.
    connection_url: String,
}

/// Global test environment, initialized once per test binary.
static TEST_ENV: OnceLock<MongoTestEnv> = OnceLock::new();

/// Initialize the shared MongoDB container (if not already started).
async fn init_mongo_env() -> &'static MongoTestEnv {
    if let Some(env) = TEST_ENV.get() {
        return env;
    }

    let container = Mongo::default()
        .start()
        .await
        .expect("Failed to start MongoDB container (is Docker running?)");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(27017).await.unwrap();
    let url = format!("mongodb://{}:{}", host, port);

    let env = MongoTestEnv {
        _container: container,
        connection_url: url,
    };

    let _ = TEST_ENV.set(env);
    TEST_ENV.get().unwrap()
}

/// Replica set environment, needed for multi-document transactions.
static REPL_SET_ENV: OnceLock<MongoTestEnv> = OnceLock::new();

/// Initialize the shared single-node replica set (if not already started).
async fn init_repl_set_env() -> &'static MongoTestEnv {
    if let Some(env) = REPL_SET_ENV.get() {
        return env;
    }

    let container = Mongo::repl_set()
        .start()
        .await
        .expect("Failed to start MongoDB replica set container (is Docker running?)");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(27017).await.unwrap();
    let url = format!("mongodb://{}:{}/?directConnection=true", host, port);

    let env = MongoTestEnv {
        _container: container,
        connection_url: url,
    };

    let _ = REPL_SET_ENV.set(env);
    REPL_SET_ENV.get().unwrap()
}

/// Atomic counter to generate unique database names per test.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a store over a fresh database in `env`, with indexes in place.
async fn store_in(env: &MongoTestEnv) -> MongoStore {
    let client = Client::with_uri_str(&env.connection_url)
        .await
        .expect("Failed to connect to MongoDB");
    let db_num = DB_COUNTER.fetch_add(1, Ordering::SeqCst);

    let store = MongoStore::new(client, &format!("rent_ledger_test_{}", db_num));
    store
        .ensure_indexes()
        .await
        .expect("Failed to create indexes");
    store
}

/// Standalone server, sequential cascade.
async fn clean_store() -> MongoStore {
    store_in(init_mongo_env().await).await
}

/// Replica set, transactional cascade.
async fn transactional_store() -> MongoStore {
    store_in(init_repl_set_env().await)
        .await
        .with_transactions(true)
}

fn month(s: &str) -> MonthKey {
    MonthKey::parse(s).unwrap()
}

fn tenant(name: &str, rent: f64) -> Tenant {
    Tenant::new(name.to_string(), None, "101".to_string(), rent)
}

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_tenant_round_trip() {
    let store = clean_store().await;
    let mut a = Tenant::new(
        "A".to_string(),
        Some("555-0100".to_string()),
        "101".to_string(),
        1000.0,
    );
    store.insert_tenant(a.clone()).await.unwrap();

    let fetched = store.get_tenant(&a.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "A");
    assert_eq!(fetched.phone.as_deref(), Some("555-0100"));
    assert_eq!(fetched.rent_amount, 1000.0);

    a.rent_amount = 1100.0;
    let replaced = store.replace_tenant(a.clone()).await.unwrap();
    assert!(replaced.is_some());
    assert_eq!(
        store.get_tenant(&a.id).await.unwrap().unwrap().rent_amount,
        1100.0
    );

    assert!(store.get_tenant(&Uuid::new_v4()).await.unwrap().is_none());
    assert!(
        store
            .replace_tenant(tenant("Ghost", 1.0))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_unique_index_rejects_duplicate_month() {
    let store = clean_store().await;
    let a = tenant("A", 1000.0);
    store.insert_tenant(a.clone()).await.unwrap();

    store
        .insert_payment(Payment::new(a.id, month("2025-09"), 1000.0, None))
        .await
        .unwrap();
    let err = store
        .insert_payment(Payment::new(a.id, month("2025-09"), 500.0, None))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicatePayment { .. }));

    let payments = store.find_payments(&PaymentFilter::all()).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].paid_amount, 1000.0);
}

#[tokio::test]
async fn test_replace_payment_into_taken_month_conflicts() {
    let store = clean_store().await;
    let a = tenant("A", 1000.0);
    store.insert_tenant(a.clone()).await.unwrap();
    store
        .insert_payment(Payment::new(a.id, month("2025-08"), 1.0, None))
        .await
        .unwrap();
    let mut september = store
        .insert_payment(Payment::new(a.id, month("2025-09"), 1.0, None))
        .await
        .unwrap();

    september.month = month("2025-08");
    let err = store.replace_payment(september).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicatePayment { .. }));
}

#[tokio::test]
async fn test_payment_requires_existing_tenant() {
    let store = clean_store().await;
    let err = store
        .insert_payment(Payment::new(Uuid::new_v4(), month("2025-09"), 1.0, None))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingTenant { .. }));
}

#[tokio::test]
async fn test_replace_payment_onto_missing_tenant_rejected() {
    let store = clean_store().await;
    let a = tenant("A", 1000.0);
    store.insert_tenant(a.clone()).await.unwrap();
    let mut payment = store
        .insert_payment(Payment::new(a.id, month("2025-09"), 1.0, None))
        .await
        .unwrap();

    payment.tenant_id = Uuid::new_v4();
    let err = store.replace_payment(payment.clone()).await.unwrap_err();
    assert!(matches!(err, StoreError::MissingTenant { .. }));
    assert_eq!(
        store.get_payment(&payment.id).await.unwrap().unwrap().tenant_id,
        a.id
    );
}

#[tokio::test]
async fn test_find_payments_filters() {
    let store = clean_store().await;
    let a = tenant("A", 1000.0);
    let b = tenant("B", 800.0);
    store.insert_tenant(a.clone()).await.unwrap();
    store.insert_tenant(b.clone()).await.unwrap();
    for (who, m) in [(&a, "2025-09"), (&a, "2025-10"), (&b, "2025-09")] {
        store
            .insert_payment(Payment::new(who.id, month(m), 1.0, None))
            .await
            .unwrap();
    }

    let september = store
        .find_payments(&PaymentFilter::all().with_month(Some(month("2025-09"))))
        .await
        .unwrap();
    assert_eq!(september.len(), 2);

    let a_all = store
        .find_payments(&PaymentFilter::for_tenant(a.id))
        .await
        .unwrap();
    assert_eq!(a_all.len(), 2);
    assert!(a_all.iter().all(|p| p.tenant_id == a.id));
}

#[tokio::test]
async fn test_delete_tenant_cascades() {
    let store = clean_store().await;
    let a = tenant("A", 1000.0);
    let b = tenant("B", 800.0);
    store.insert_tenant(a.clone()).await.unwrap();
    store.insert_tenant(b.clone()).await.unwrap();
    for m in ["2025-08", "2025-09"] {
        store
            .insert_payment(Payment::new(a.id, month(m), 1.0, None))
            .await
            .unwrap();
    }
    store
        .insert_payment(Payment::new(b.id, month("2025-09"), 1.0, None))
        .await
        .unwrap();

    assert_eq!(store.delete_tenant_cascade(&a.id).await.unwrap(), Some(2));
    assert!(store.get_tenant(&a.id).await.unwrap().is_none());
    assert!(
        store
            .find_payments(&PaymentFilter::for_tenant(a.id))
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        store.find_payments(&PaymentFilter::all()).await.unwrap().len(),
        1
    );

    assert_eq!(store.delete_tenant_cascade(&a.id).await.unwrap(), None);
}

#[tokio::test]
async fn test_delete_payment() {
    let store = clean_store().await;
    let a = tenant("A", 1000.0);
    store.insert_tenant(a.clone()).await.unwrap();
    let payment = store
        .insert_payment(Payment::new(a.id, month("2025-09"), 1.0, None))
        .await
        .unwrap();

    assert!(store.delete_payment(&payment.id).await.unwrap());
    assert!(!store.delete_payment(&payment.id).await.unwrap());
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let err = MongoStore::connect(
        "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=300&connectTimeoutMS=300",
        "rent_ledger_unreachable",
    )
    .await
    .unwrap_err();
    assert!(
        matches!(err, StoreError::Connection { backend: "MongoDB", .. }),
        "got {err:?}"
    );

    let err: AppError = err.into();
    assert!(matches!(
        err,
        AppError::Storage(StorageError::ConnectionError { .. })
    ));
}

#[tokio::test]
async fn test_ensure_indexes_is_idempotent() {
    let store = clean_store().await;
    store.ensure_indexes().await.unwrap();
    store.ensure_indexes().await.unwrap();
}

// ---------------------------------------------------------------------------
// Transactional cascade (replica set)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_transactional_cascade_removes_tenant_and_payments() {
    let store = transactional_store().await;
    let a = tenant("A", 1000.0);
    let b = tenant("B", 800.0);
    store.insert_tenant(a.clone()).await.unwrap();
    store.insert_tenant(b.clone()).await.unwrap();
    for m in ["2025-07", "2025-08", "2025-09"] {
        store
            .insert_payment(Payment::new(a.id, month(m), 1.0, None))
            .await
            .unwrap();
    }
    store
        .insert_payment(Payment::new(b.id, month("2025-09"), 1.0, None))
        .await
        .unwrap();

    assert_eq!(store.delete_tenant_cascade(&a.id).await.unwrap(), Some(3));
    assert!(store.get_tenant(&a.id).await.unwrap().is_none());
    assert!(
        store
            .find_payments(&PaymentFilter::for_tenant(a.id))
            .await
            .unwrap()
            .is_empty()
    );
    assert!(store.get_tenant(&b.id).await.unwrap().is_some());
    assert_eq!(
        store.find_payments(&PaymentFilter::all()).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_transactional_cascade_unknown_tenant_aborts() {
    let store = transactional_store().await;
    let a = tenant("A", 1000.0);
    store.insert_tenant(a.clone()).await.unwrap();
    store
        .insert_payment(Payment::new(a.id, month("2025-09"), 1.0, None))
        .await
        .unwrap();

    assert_eq!(
        store.delete_tenant_cascade(&Uuid::new_v4()).await.unwrap(),
        None
    );
    assert!(store.get_tenant(&a.id).await.unwrap().is_some());
    assert_eq!(
        store.find_payments(&PaymentFilter::all()).await.unwrap().len(),
        1
    );

    // An aborted cascade leaves nothing behind that blocks the next one
    assert_eq!(store.delete_tenant_cascade(&a.id).await.unwrap(), Some(1));
    assert_eq!(store.delete_tenant_cascade(&a.id).await.unwrap(), None);
}

// ---------------------------------------------------------------------------
// HTTP over MongoDB
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_duplicate_month_scenario_over_http() {
    let app = ServerBuilder::new()
        .with_store(clean_store().await)
        .build()
        .expect("Failed to build app");
    let server = TestServer::new(app).expect("Failed to create test server");

    let response = server
        .post("/api/tenants")
        .json(&json!({ "name": "A", "flat_no": "101", "rent_amount": 1000 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let tenant_id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    server
        .post("/api/payments")
        .json(&json!({ "tenant_id": tenant_id, "month": "2025-09", "paid_amount": 1000 }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/payments")
        .json(&json!({ "tenant_id": tenant_id, "month": "2025-09", "paid_amount": 500 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "PAYMENT_CONFLICT");

    let summary: Value = server.get("/api/dashboard").await.json();
    assert_eq!(summary["totalTenants"], 1);
    assert_eq!(summary["totalPayments"], 1000.0);
}
