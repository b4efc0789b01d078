//! # nomnaa-core: Pure Business Logic for the Nom-Naa Shop Cart
//!
//! This crate holds the cart domain: types, request DTOs, and the rules the
//! cart service enforces. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Nom-Naa Cart Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               HTTP layer (out of this workspace)                │   │
//! │  │    POST /carts/items, PUT /carts/items, POST /carts/:id/confirm │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartOutcome (cart, status, error)      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                nomnaa-cart (CartService)                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nomnaa-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  request  │  │   rules   │  │ validation│  │   │
//! │  │   │ Cart/Item │  │  AddItem  │  │  stock    │  │  qty, id  │  │   │
//! │  │   │   Snack   │  │ UpdateItem│  │  owner    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    nomnaa-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Cart, CartItem, Snack, UserContext)
//! - [`request`] - Validated request DTOs for cart operations
//! - [`rules`] - Stock, ownership and status-transition rules
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use nomnaa_core::rules::check_stock;
//!
//! // 3 already in the cart, 2 more requested, 5 on the shelf
//! assert!(check_stock("snack-1", 5, 3 + 2).is_ok());
//! assert!(check_stock("snack-1", 5, 3 + 4).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod request;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use request::{AddItemToCartRequest, UpdateItemFromCartRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps confirm payloads a reasonable size.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
