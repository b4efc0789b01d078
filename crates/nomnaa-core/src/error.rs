//! # Error Types
//!
//! Domain-specific error types for nomnaa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nomnaa-core errors (this file)                                        │
//! │  ├── CoreError        - Cart rule violations                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  nomnaa-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  nomnaa-cart errors (service crate)                                    │
//! │  └── CartError        - What the HTTP layer sees (with status code)    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                  │
//! │                          DbError ───┴→ CartError → StatusCode          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart business rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested quantity is more than the snack has on the shelf.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 4, already in cart: 3)
    ///      │
    ///      ▼
    /// Check stock: available=5, requested=7
    ///      │
    ///      ▼
    /// InsufficientStock { snack_id, available: 5, requested: 7 }
    /// ```
    #[error("Insufficient stock for snack {snack_id}: available {available}, requested {requested}")]
    InsufficientStock {
        snack_id: String,
        available: i64,
        requested: i64,
    },

    /// The cart is not in a status that allows the operation.
    ///
    /// ## When This Occurs
    /// - Confirming a cart that is already confirmed
    /// - Mutating items of a confirmed cart
    #[error("Cart {cart_id} is {current_status}, cannot perform operation")]
    InvalidCartStatus {
        cart_id: String,
        current_status: String,
    },

    /// The caller does not own the cart being touched.
    #[error("Cart {cart_id} does not belong to user {user_id}")]
    NotCartOwner { cart_id: String, user_id: String },

    /// The item exists but is not a line of the caller's pending cart.
    #[error("Item {item_id} is not in cart {cart_id}")]
    ItemNotInCart { item_id: String, cart_id: String },

    /// The caller identity could not be parsed into a UUID.
    #[error("Invalid user identity '{0}'")]
    InvalidIdentity(String),

    /// Cart has reached the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by request DTOs before any store is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            snack_id: "lays".to_string(),
            available: 5,
            requested: 7,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for snack lays: available 5, requested 7"
        );

        let err = CoreError::InvalidCartStatus {
            cart_id: "c1".to_string(),
            current_status: "confirmed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cart c1 is confirmed, cannot perform operation"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::Required {
            field: "snack_id".to_string(),
        };
        assert_eq!(err.to_string(), "snack_id is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "item_id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
