//! # Validation Module
//!
//! Input validation for cart requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP layer (external)                                        │
//! │  └── Body deserialization into request DTOs                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request DTOs (nomnaa-core)                                   │
//! │  └── THIS MODULE: ids are UUIDs, quantities in range                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity > 0)                                              │
//! │  ├── UNIQUE (cart_id, snack_id)                                        │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nomnaa_core::validation::{validate_quantity, validate_uuid};
//!
//! validate_quantity(5).unwrap();
//! validate_uuid("snack_id", "550e8400-e29b-41d4-a716-446655440000").unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more distinct line fits in the cart.
///
/// ## Rules
/// - Current line count must be below MAX_CART_ITEMS (100)
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates that `id` is a UUID, reporting failures against `field`.
///
/// Any accepted form (uppercase, simple, braced, URN) comes back as the
/// lowercase hyphenated string ids are stored under.
///
/// ## Example
/// ```rust
/// use nomnaa_core::validation::validate_uuid;
///
/// assert_eq!(
///     validate_uuid("item_id", "550E8400E29B41D4A716446655440000").unwrap(),
///     "550e8400-e29b-41d4-a716-446655440000"
/// );
/// assert!(validate_uuid("item_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let parsed = uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(parsed.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
