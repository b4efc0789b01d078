//! # Cart Errors
//!
//! The error every cart operation returns, and the status code it maps to.
//!
//! ## Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                                CartError          StatusCode    │
//! │  ──────                                ─────────          ──────────    │
//! │  ValidationError                       InvalidRequest     400           │
//! │  CoreError::InsufficientStock          InvalidRequest     400           │
//! │  CoreError::InvalidCartStatus          InvalidRequest     400           │
//! │  CoreError::CartTooLarge               InvalidRequest     400           │
//! │  CoreError::NotCartOwner               Forbidden          403           │
//! │  CoreError::ItemNotInCart              Forbidden          403           │
//! │  DbError::NotFound / missing row       NotFound           404           │
//! │  CoreError::InvalidIdentity            Internal           500           │
//! │  any other DbError                     Internal           500           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage failures are logged with their detail and surfaced with a generic
//! message.

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::error;

use nomnaa_core::{Cart, CoreError, ValidationError};
use nomnaa_db::DbError;

// =============================================================================
// Status Code
// =============================================================================

/// Outcome classification handed to the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200
    Ok,
    /// 400
    BadRequest,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500
    InternalError,
}

impl StatusCode {
    /// Numeric HTTP status.
    pub const fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalError => 500,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

// =============================================================================
// Cart Error
// =============================================================================

/// Errors returned by [`CartService`](crate::CartService) operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart, item or snack the request names does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The request is malformed or breaks a cart rule.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The caller does not own what they are touching.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Storage failure or an inconsistency the caller cannot fix.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CartError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CartError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        CartError::InvalidRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CartError::Internal(message.into())
    }

    /// Status code the HTTP layer should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            CartError::NotFound { .. } => StatusCode::NotFound,
            CartError::InvalidRequest(_) => StatusCode::BadRequest,
            CartError::Forbidden(_) => StatusCode::Forbidden,
            CartError::Internal(_) => StatusCode::InternalError,
        }
    }
}

impl Serialize for CartError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Converts cart rule violations.
impl From<CoreError> for CartError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { .. }
            | CoreError::InvalidCartStatus { .. }
            | CoreError::CartTooLarge { .. } => CartError::InvalidRequest(err.to_string()),
            CoreError::Validation(e) => CartError::InvalidRequest(e.to_string()),
            CoreError::NotCartOwner { .. } | CoreError::ItemNotInCart { .. } => {
                CartError::Forbidden(err.to_string())
            }
            CoreError::InvalidIdentity(id) => {
                error!(user_id = %id, "Caller identity is not a UUID");
                CartError::internal("Invalid user identity")
            }
        }
    }
}

impl From<ValidationError> for CartError {
    fn from(err: ValidationError) -> Self {
        CartError::InvalidRequest(err.to_string())
    }
}

/// Converts database errors. Only a missing row reaches the caller as-is.
impl From<DbError> for CartError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CartError::NotFound { entity, id },
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                CartError::internal("Database connection failed")
            }
            DbError::PoolExhausted => {
                error!("Database pool exhausted");
                CartError::internal("Database pool exhausted")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                CartError::internal("Database transaction failed")
            }
            other => {
                error!("Database operation failed: {}", other);
                CartError::internal("Database operation failed")
            }
        }
    }
}

/// Convenience type alias for cart operation results.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Cart Outcome
// =============================================================================

/// The `(cart, status, error)` triple an HTTP handler renders.
///
/// ```json
/// { "cart": { "id": "...", "items": [...] }, "status": 200, "error": null }
/// { "cart": null, "status": 404, "error": "Snack not found: ..." }
/// ```
#[derive(Debug, Serialize)]
pub struct CartOutcome {
    pub cart: Option<Cart>,
    pub status: StatusCode,
    pub error: Option<CartError>,
}

impl CartOutcome {
    pub fn into_parts(self) -> (Option<Cart>, StatusCode, Option<CartError>) {
        (self.cart, self.status, self.error)
    }
}

impl From<CartResult<Cart>> for CartOutcome {
    fn from(result: CartResult<Cart>) -> Self {
        match result {
            Ok(cart) => CartOutcome {
                cart: Some(cart),
                status: StatusCode::Ok,
                error: None,
            },
            Err(err) => CartOutcome {
                cart: None,
                status: err.status(),
                error: Some(err),
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
