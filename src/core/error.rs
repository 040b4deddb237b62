//! Typed error handling for rent-ledger
//!
//! Every failure a request can hit is one of a handful of categories, each
//! mapped to an HTTP status and a stable error code:
//!
//! - [`EntityError`]: a tenant or payment id does not resolve
//! - [`PaymentError`]: the `(tenant, month)` slot is already taken
//! - [`ValidationError`]: malformed month, negative amount, missing field
//! - [`StorageError`]: the document store failed or could not be reached
//!
//! # Example
//!
//! ```rust,ignore
//! use rent_ledger::prelude::*;
//!
//! match service.get(&id).await {
//!     Ok(tenant) => println!("Found: {}", tenant.name),
//!     Err(AppError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("Tenant {} not found", id);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::core::entity::Entity;
use crate::core::model::{Payment, Tenant};
use crate::core::month::{INVALID_MONTH_MESSAGE, MonthKey};
use crate::core::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for rent-ledger
#[derive(Debug)]
pub enum AppError {
    /// A record could not be found
    Entity(EntityError),

    /// Payment uniqueness violations
    Payment(PaymentError),

    /// Invalid input
    Validation(ValidationError),

    /// Document store failures
    Storage(StorageError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Entity(e) => write!(f, "{}", e),
            AppError::Payment(e) => write!(f, "{}", e),
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Entity(e) => Some(e),
            AppError::Payment(e) => Some(e),
            AppError::Validation(e) => Some(e),
            AppError::Storage(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
///
/// `message` is meant to be shown to the user as-is.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Entity(e) => e.status_code(),
            AppError::Payment(e) => e.status_code(),
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Entity(e) => e.error_code(),
            AppError::Payment(e) => e.error_code(),
            AppError::Validation(e) => e.error_code(),
            AppError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::Entity(EntityError::NotFound { entity_type, id, .. }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            AppError::Payment(PaymentError::Conflict { tenant_id, month }) => {
                Some(serde_json::json!({
                    "tenant_id": tenant_id.to_string(),
                    "month": month
                }))
            }
            AppError::Validation(ValidationError::FieldError { field, .. }) => {
                Some(serde_json::json!({ "field": field }))
            }
            AppError::Validation(ValidationError::MissingFields { fields, .. }) => {
                Some(serde_json::json!({ "fields": fields }))
            }
            _ => None,
        }
    }

    /// A record of type `T` that does not exist
    pub fn not_found<T: Entity>(id: Uuid) -> Self {
        AppError::Entity(EntityError::NotFound {
            entity_type: T::display_name(),
            code: T::not_found_code(),
            id,
        })
    }

    pub fn tenant_not_found(id: Uuid) -> Self {
        Self::not_found::<Tenant>(id)
    }

    pub fn payment_not_found(id: Uuid) -> Self {
        Self::not_found::<Payment>(id)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record lookups
#[derive(Debug)]
pub enum EntityError {
    /// Record was not found
    NotFound {
        entity_type: &'static str,
        code: &'static str,
        id: Uuid,
    },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, .. } => {
                write!(f, "{} not found", entity_type)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { code, .. } => *code,
        }
    }
}

impl From<EntityError> for AppError {
    fn from(err: EntityError) -> Self {
        AppError::Entity(err)
    }
}

// =============================================================================
// Payment Errors
// =============================================================================

/// Errors specific to payment records
#[derive(Debug)]
pub enum PaymentError {
    /// A payment already exists for this tenant and month
    Conflict { tenant_id: Uuid, month: MonthKey },
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentError::Conflict { .. } => {
                write!(f, "Payment for this tenant and month already exists")
            }
        }
    }
}

impl std::error::Error for PaymentError {}

impl PaymentError {
    /// Conflicts are reported as a bad request with a distinct code
    pub fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::Conflict { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PaymentError::Conflict { .. } => "PAYMENT_CONFLICT",
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        AppError::Payment(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// One or more required fields are absent
    MissingFields {
        fields: Vec<String>,
        message: String,
    },

    /// Month is not `YYYY-MM`
    InvalidMonth { value: String },

    /// Invalid JSON format
    InvalidJson { message: String },

    /// Invalid UUID format
    InvalidUuid { value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { message, .. } => write!(f, "{}", message),
            ValidationError::MissingFields { message, .. } => write!(f, "{}", message),
            ValidationError::InvalidMonth { .. } => write!(f, "{}", INVALID_MONTH_MESSAGE),
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
            ValidationError::InvalidUuid { value } => {
                write!(f, "Invalid UUID format: {}", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidUuid { .. } => "INVALID_UUID",
            _ => "VALIDATION_ERROR",
        }
    }

    pub fn field(field: &str, message: &str) -> Self {
        ValidationError::FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the document store
#[derive(Debug)]
pub enum StorageError {
    /// Connection error
    ConnectionError { backend: String, message: String },

    /// Query execution error
    QueryError { message: String },

    /// Transaction error
    TransactionError { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionError { backend, message } => {
                write!(f, "Failed to connect to {}: {}", backend, message)
            }
            StorageError::QueryError { message } => write!(f, "{}", message),
            StorageError::TransactionError { message } => {
                write!(f, "Transaction error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicatePayment { tenant_id, month } => {
                AppError::Payment(PaymentError::Conflict { tenant_id, month })
            }
            StoreError::MissingTenant { tenant_id } => AppError::tenant_not_found(tenant_id),
            StoreError::Connection { backend, message } => {
                AppError::Storage(StorageError::ConnectionError {
                    backend: backend.to_string(),
                    message,
                })
            }
            StoreError::Transaction(message) => {
                AppError::Storage(StorageError::TransactionError { message })
            }
            StoreError::Backend(message) => AppError::Storage(StorageError::QueryError { message }),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for rent-ledger operations
pub type AppResult<T> = Result<T, AppError>;
