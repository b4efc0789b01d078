//! # Domain Types
//!
//! Core domain types for the cart module.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Cart       │   │    CartItem     │   │      Snack      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │1 *│  id (UUID)      │* 1│  id (UUID)      │       │
//! │  │  user_id        │──►│  cart_id (FK)   │──►│  name           │       │
//! │  │  status         │   │  snack_id (FK)  │   │  quantity       │       │
//! │  │  items          │   │  quantity       │   │  price_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   CartStatus    │   │   UserContext   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Pending        │   │  id (string)    │                             │
//! │  │  Confirmed      │   │  username       │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are UUID v4 strings, the same text the database stores.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Snack
// =============================================================================

/// A snack (product) on sale.
///
/// Read-only from the cart's point of view. `quantity` is the authoritative
/// stock level used by the stock guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Snack {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional description for the product page.
    pub description: Option<String>,

    /// Price in minor units. Display metadata only, the cart never prices.
    pub price_cents: i64,

    /// Units currently on the shelf.
    pub quantity: i64,

    /// Optional product image.
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Cart Status
// =============================================================================

/// The lifecycle status of a cart.
///
/// ```text
///   ┌─────────┐   confirm (owner)   ┌───────────┐
///   │ Pending │ ──────────────────► │ Confirmed │  (terminal)
///   └─────────┘                     └───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    /// Cart is open, items can be added/updated/removed.
    Pending,
    /// Cart has been confirmed by its owner.
    Confirmed,
}

impl CartStatus {
    /// Returns the lowercase name stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CartStatus::Pending => "pending",
            CartStatus::Confirmed => "confirmed",
        }
    }
}

impl Default for CartStatus {
    fn default() -> Self {
        CartStatus::Pending
    }
}

impl fmt::Display for CartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in a cart: one snack and how many of it.
///
/// At most one line per snack exists in a cart; adding the same snack again
/// merges into the existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CartItem {
    pub id: String,
    /// Owning cart.
    pub cart_id: String,
    /// Referenced snack.
    pub snack_id: String,
    /// Always positive.
    pub quantity: i64,
    /// Snack record, attached when the cart is hydrated.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub snack: Option<Snack>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new line for `snack_id` in `cart_id`.
    pub fn new(cart_id: &str, snack_id: &str, quantity: i64) -> Self {
        let now = Utc::now();
        CartItem {
            id: Uuid::new_v4().to_string(),
            cart_id: cart_id.to_string(),
            snack_id: snack_id.to_string(),
            quantity,
            snack: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A user's cart and its lines.
///
/// ## Invariants
/// - At most one `Pending` cart per user (enforced by a partial unique index)
/// - Lines are unique by `snack_id`
/// - `Confirmed` carts are never mutated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Cart {
    pub id: String,
    /// Owning user (UUID string).
    pub user_id: String,
    pub status: CartStatus,
    /// Lines ordered by item id.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<CartItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new, empty pending cart for a user.
    pub fn new_pending(user_id: &str) -> Self {
        let now = Utc::now();
        Cart {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            status: CartStatus::Pending,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true while the cart can still be changed.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == CartStatus::Pending
    }

    /// Finds the line holding `snack_id`, if any.
    pub fn find_item_by_snack(&self, snack_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.snack_id == snack_id)
    }

    /// Finds a line by its own id.
    pub fn find_item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Returns the number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// User Context
// =============================================================================

/// The authenticated caller, resolved by the (external) auth layer.
///
/// Passed explicitly to every service operation; nothing reads identity from
/// ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// User id in string form, as carried by the auth token.
    pub id: String,
    pub username: String,
}

impl UserContext {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        UserContext {
            id: id.into(),
            username: username.into(),
        }
    }

    /// Parses the caller id into a comparable UUID.
    ///
    /// ## Errors
    /// `CoreError::InvalidIdentity` when the id is not a UUID.
    pub fn user_id(&self) -> CoreResult<Uuid> {
        Uuid::parse_str(self.id.trim()).map_err(|_| CoreError::InvalidIdentity(self.id.clone()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_status_default() {
        assert_eq!(CartStatus::default(), CartStatus::Pending);
    }

    #[test]
    fn test_cart_status_serializes_lowercase() {
        let json = serde_json::to_string(&CartStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        assert_eq!(CartStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_cart_find_item_by_snack() {
        let mut cart = Cart::new_pending("user-1");
        cart.items.push(CartItem::new(&cart.id, "snack-1", 3));
        cart.items.push(CartItem::new(&cart.id, "snack-2", 1));

        assert_eq!(cart.find_item_by_snack("snack-1").map(|i| i.quantity), Some(3));
        assert!(cart.find_item_by_snack("snack-9").is_none());
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_user_context_parses_uuid() {
        let id = Uuid::new_v4();
        let user = UserContext::new(id.to_string(), "mai");
        assert_eq!(user.user_id().unwrap(), id);

        let bad = UserContext::new("not-a-uuid", "mai");
        assert!(matches!(bad.user_id(), Err(CoreError::InvalidIdentity(_))));
    }
}
