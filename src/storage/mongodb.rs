//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoStore`, implementing both `TenantStore` and `PaymentStore`
//! over a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! rent-ledger = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! One collection per record type (`tenants`, `payments`). The `(tenant_id,
//! month)` uniqueness of payments is enforced by a unique compound index
//! created in [`MongoStore::ensure_indexes`]; a violation surfaces as server
//! error code 11000 and is reported as [`StoreError::DuplicatePayment`].
//!
//! # Serialization strategy
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. UUIDs and timestamps are stored as
//! strings. The `id` field is mapped to MongoDB's `_id` convention.

use crate::core::entity::{Entity, sort_oldest_first};
use crate::core::model::{Payment, Tenant};
use crate::core::store::{PaymentFilter, PaymentStore, StoreError, StoreResult, TenantStore};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, ClientSession, Collection, Database, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Server error code for a unique index violation
const DUPLICATE_KEY: i32 = 11000;

const BACKEND_NAME: &str = "MongoDB";

const PAYMENT_SLOT_INDEX: &str = "tenant_month_unique";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> StoreResult<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| StoreError::Backend(format!("Failed to convert JSON to BSON: {}", e)))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => {
            return Err(StoreError::Backend(
                "Expected BSON document, got non-object".to_string(),
            ));
        }
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id`.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

fn to_document<T: Serialize>(record: &T) -> StoreResult<Document> {
    let json = serde_json::to_value(record)
        .map_err(|e| StoreError::Backend(format!("Failed to serialize record: {}", e)))?;
    json_to_document(json)
}

fn from_document<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    serde_json::from_value(document_to_json(doc))
        .map_err(|e| StoreError::Backend(format!("Failed to deserialize record: {}", e)))
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn is_connection_failure(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_)
    )
}

fn connection(err: mongodb::error::Error) -> StoreError {
    StoreError::Connection {
        backend: BACKEND_NAME,
        message: err.to_string(),
    }
}

/// Map a driver error; an unreachable server is reported as a connection
/// failure whatever the action was.
fn backend(action: &'static str) -> impl FnOnce(mongodb::error::Error) -> StoreError {
    move |e| {
        if is_connection_failure(&e) {
            connection(e)
        } else {
            StoreError::Backend(format!("Failed to {}: {}", action, e))
        }
    }
}

/// Build the query document for a payment filter.
fn payment_filter_document(filter: &PaymentFilter) -> Document {
    let mut query = doc! {};
    if let Some(tenant_id) = &filter.tenant_id {
        query.insert("tenant_id", uuid_bson(tenant_id));
    }
    if let Some(month) = &filter.month {
        query.insert("month", month.as_str());
    }
    query
}

// ---------------------------------------------------------------------------
// MongoStore
// ---------------------------------------------------------------------------

/// Tenant and payment storage backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use rent_ledger::storage::MongoStore;
///
/// let store = MongoStore::connect("mongodb://localhost:27017", "rent_ledger").await?;
/// store.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    database: Database,
    transactions: bool,
}

impl MongoStore {
    /// Create a store over an existing client.
    pub fn new(client: Client, database_name: &str) -> Self {
        let database = client.database(database_name);
        Self {
            client,
            database,
            transactions: false,
        }
    }

    /// Connect to the server at `uri` and use `database_name`.
    ///
    /// The server is pinged once, so an unreachable deployment fails here
    /// with [`StoreError::Connection`] instead of on the first request.
    pub async fn connect(uri: &str, database_name: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri).await.map_err(connection)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection)?;
        Ok(Self::new(client, database_name))
    }

    /// Run the tenant cascade inside a multi-document transaction.
    ///
    /// Transactions need a replica set or sharded cluster; leave this off
    /// against a standalone server.
    pub fn with_transactions(mut self, enabled: bool) -> Self {
        self.transactions = enabled;
        self
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn tenants(&self) -> Collection<Document> {
        self.database.collection(Tenant::collection_name())
    }

    fn payments(&self) -> Collection<Document> {
        self.database.collection(Payment::collection_name())
    }

    /// Create the indexes the store relies on.
    ///
    /// - `{tenant_id: 1, month: 1}` unique: one payment per tenant per month
    /// - `{payment_date: -1}`: recent-payments ordering
    ///
    /// Idempotent; called on every startup.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "tenant_id": 1, "month": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(PAYMENT_SLOT_INDEX.to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "payment_date": -1 })
                .build(),
        ];

        self.payments()
            .create_indexes(indexes)
            .await
            .map_err(backend("create indexes on payments collection"))?;

        Ok(())
    }

    async fn collect<T: DeserializeOwned>(
        collection: Collection<Document>,
        filter: Document,
    ) -> StoreResult<Vec<T>> {
        let docs: Vec<Document> = collection
            .find(filter)
            .await
            .map_err(backend("query collection"))?
            .try_collect()
            .await
            .map_err(backend("collect documents"))?;

        docs.into_iter().map(from_document).collect()
    }

    async fn find_by_id<T: DeserializeOwned>(
        collection: Collection<Document>,
        id: &Uuid,
    ) -> StoreResult<Option<T>> {
        let doc = collection
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(backend("fetch document"))?;

        doc.map(from_document).transpose()
    }

    async fn cascade_sequential(&self, id: &Uuid) -> StoreResult<Option<u64>> {
        let deleted = self
            .tenants()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(backend("delete tenant"))?;
        if deleted.deleted_count == 0 {
            return Ok(None);
        }

        let payments = self
            .payments()
            .delete_many(doc! { "tenant_id": uuid_bson(id) })
            .await
            .map_err(backend("delete tenant payments"))?;

        Ok(Some(payments.deleted_count))
    }

    async fn cascade_in_transaction(&self, id: &Uuid) -> StoreResult<Option<u64>> {
        let mut session = self
            .client
            .start_session()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;
        session
            .start_transaction()
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        match self.cascade_with_session(id, &mut session).await {
            Ok(None) => {
                session
                    .abort_transaction()
                    .await
                    .map_err(|e| StoreError::Transaction(e.to_string()))?;
                Ok(None)
            }
            Ok(Some(removed)) => {
                session
                    .commit_transaction()
                    .await
                    .map_err(|e| StoreError::Transaction(e.to_string()))?;
                Ok(Some(removed))
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    tracing::warn!(error = %abort_err, "failed to abort tenant cascade");
                }
                Err(err)
            }
        }
    }

    async fn cascade_with_session(
        &self,
        id: &Uuid,
        session: &mut ClientSession,
    ) -> StoreResult<Option<u64>> {
        let deleted = self
            .tenants()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .session(&mut *session)
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;
        if deleted.deleted_count == 0 {
            return Ok(None);
        }

        let payments = self
            .payments()
            .delete_many(doc! { "tenant_id": uuid_bson(id) })
            .session(&mut *session)
            .await
            .map_err(|e| StoreError::Transaction(e.to_string()))?;

        Ok(Some(payments.deleted_count))
    }

    fn duplicate(payment: &Payment) -> StoreError {
        StoreError::DuplicatePayment {
            tenant_id: payment.tenant_id,
            month: payment.month.clone(),
        }
    }
}

#[async_trait]
impl TenantStore for MongoStore {
    async fn insert_tenant(&self, tenant: Tenant) -> StoreResult<Tenant> {
        let doc = to_document(&tenant)?;
        self.tenants()
            .insert_one(doc)
            .await
            .map_err(backend("create tenant"))?;
        Ok(tenant)
    }

    async fn get_tenant(&self, id: &Uuid) -> StoreResult<Option<Tenant>> {
        Self::find_by_id(self.tenants(), id).await
    }

    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>> {
        let mut tenants: Vec<Tenant> = Self::collect(self.tenants(), doc! {}).await?;
        sort_oldest_first(&mut tenants);
        Ok(tenants)
    }

    async fn replace_tenant(&self, tenant: Tenant) -> StoreResult<Option<Tenant>> {
        let doc = to_document(&tenant)?;
        let result = self
            .tenants()
            .replace_one(doc! { "_id": uuid_bson(&tenant.id) }, doc)
            .await
            .map_err(backend("update tenant"))?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(tenant))
    }

    async fn delete_tenant_cascade(&self, id: &Uuid) -> StoreResult<Option<u64>> {
        if self.transactions {
            self.cascade_in_transaction(id).await
        } else {
            self.cascade_sequential(id).await
        }
    }
}

#[async_trait]
impl PaymentStore for MongoStore {
    async fn insert_payment(&self, payment: Payment) -> StoreResult<Payment> {
        if self.get_tenant(&payment.tenant_id).await?.is_none() {
            return Err(StoreError::MissingTenant {
                tenant_id: payment.tenant_id,
            });
        }

        let doc = to_document(&payment)?;
        match self.payments().insert_one(doc).await {
            Ok(_) => Ok(payment),
            Err(e) if is_duplicate_key(&e) => Err(Self::duplicate(&payment)),
            Err(e) => Err(backend("create payment")(e)),
        }
    }

    async fn get_payment(&self, id: &Uuid) -> StoreResult<Option<Payment>> {
        Self::find_by_id(self.payments(), id).await
    }

    async fn find_payments(&self, filter: &PaymentFilter) -> StoreResult<Vec<Payment>> {
        let mut payments: Vec<Payment> =
            Self::collect(self.payments(), payment_filter_document(filter)).await?;
        sort_oldest_first(&mut payments);
        Ok(payments)
    }

    async fn replace_payment(&self, payment: Payment) -> StoreResult<Option<Payment>> {
        if self.get_tenant(&payment.tenant_id).await?.is_none() {
            return Err(StoreError::MissingTenant {
                tenant_id: payment.tenant_id,
            });
        }

        let doc = to_document(&payment)?;
        let result = match self
            .payments()
            .replace_one(doc! { "_id": uuid_bson(&payment.id) }, doc)
            .await
        {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => return Err(Self::duplicate(&payment)),
            Err(e) => return Err(backend("update payment")(e)),
        };

        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(payment))
    }

    async fn delete_payment(&self, id: &Uuid) -> StoreResult<bool> {
        let result = self
            .payments()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(backend("delete payment"))?;

        Ok(result.deleted_count > 0)
    }
}
