//! # nomnaa-cart: Cart Service
//!
//! The operations behind the shop's cart endpoints. An external HTTP layer
//! authenticates the caller, builds a [`UserContext`](nomnaa_core::UserContext)
//! and hands it to [`CartService`]; every operation answers with a cart or a
//! [`CartError`] that maps onto a [`StatusCode`].
//!
//! ## Module Organization
//! ```text
//! nomnaa_cart/
//! ├── lib.rs          ◄─── You are here
//! ├── service.rs      ◄─── CartService (add / get / update / delete / confirm)
//! ├── error.rs        ◄─── CartError, StatusCode, CartOutcome
//! ├── config.rs       ◄─── ShopConfig from NOMNAA_* environment variables
//! └── telemetry.rs    ◄─── tracing-subscriber setup for binaries
//! ```
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler (external)                                                │
//! │       │  UserContext + request body                                     │
//! │       ▼                                                                 │
//! │  CartService ──► nomnaa_core::rules (stock, ownership, transitions)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  nomnaa_db::Database ──► CartRepository / ItemRepository / Snack...     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use config::{ConfigError, ShopConfig};
pub use error::{CartError, CartOutcome, CartResult, StatusCode};
pub use service::CartService;
