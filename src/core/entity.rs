//! Entity trait shared by every stored record

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Base trait for records kept in a collection.
///
/// Every record has:
/// - id: Unique identifier, generated on creation
/// - created_at: Creation timestamp, which fixes listing order
///
/// The collection name doubles as the MongoDB collection and the REST
/// resource segment (`/api/{collection}`).
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural collection name (e.g., "tenants", "payments")
    fn collection_name() -> &'static str;

    /// The singular name used in error messages (e.g., "Tenant")
    fn display_name() -> &'static str;

    /// Error code reported when a lookup by id misses
    fn not_found_code() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;
}

/// Sort records oldest first
pub fn sort_oldest_first<T: Entity>(records: &mut [T]) {
    records.sort_by_key(|r| (r.created_at(), r.id()));
}
