//! # Repository Module
//!
//! Database repository implementations for the cart.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CartService                                                           │
//! │       │  db.carts().find_pending_for_user(user_id)                     │
//! │       ▼                                                                 │
//! │  CartRepository / ItemRepository / SnackRepository                     │
//! │       │  typed lookups, no condition strings leave this crate          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CartRepository`](cart::CartRepository) - Carts, hydration, status transaction
//! - [`ItemRepository`](item::ItemRepository) - Cart line CRUD
//! - [`SnackRepository`](snack::SnackRepository) - Inventory lookup

pub mod cart;
pub mod item;
pub mod snack;
