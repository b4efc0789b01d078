//! # Cart Service
//!
//! The five cart operations plus `open_cart`, each taking the caller's
//! [`UserContext`] explicitly.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item_to_cart(req, user)                                            │
//! │    validate ─► pending cart ─► snack ─► stock(existing + added)         │
//! │      ─► merge into line or insert line ─► re-read cart                  │
//! │                                                                         │
//! │  update_item_from_cart(req, user)                                       │
//! │    validate ─► pending cart ─► item ─► item in cart? ─► stock(new qty)  │
//! │      ─► save ─► re-read cart                                            │
//! │                                                                         │
//! │  delete_item_from_cart(item_id, user)                                   │
//! │    pending cart ─► item ─► item in cart? ─► delete ─► re-read cart      │
//! │                                                                         │
//! │  confirm_cart(cart_id, user)                                            │
//! │    load cart ─► owner? ─► pending? ─► transaction ─► re-read cart       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation answers with a fresh read of the cart, snacks attached.
//!
//! Stock is checked against the snack row read at the start of the call and
//! is never reserved, so two callers can both pass the check for the last
//! units on the shelf.

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use nomnaa_core::rules;
use nomnaa_core::validation::{validate_quantity, validate_uuid};
use nomnaa_core::{
    AddItemToCartRequest, Cart, CartItem, Snack, UpdateItemFromCartRequest, UserContext,
};
use nomnaa_db::{Database, DbError};

use crate::error::{CartError, CartResult};

/// Cart operations over a [`Database`].
///
/// Cheap to clone; the database handle is a shared pool.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    pub fn new(db: Database) -> Self {
        CartService { db }
    }

    /// The underlying database (health checks, shutdown).
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Returns the caller's pending cart, opening one if they have none.
    ///
    /// Calling it twice yields the same cart.
    pub async fn open_cart(&self, user: &UserContext) -> CartResult<Cart> {
        let user_id = user.user_id()?.to_string();

        if let Some(cart) = self.db.carts().find_pending_for_user(&user_id).await? {
            return self.reload(&cart.id).await;
        }

        let cart = match self.db.carts().create_pending(&user_id).await {
            Ok(cart) => cart,
            // Another request opened it between our lookup and insert
            Err(DbError::UniqueViolation { .. }) => self.pending_cart_for(&user_id).await?,
            Err(e) => return Err(e.into()),
        };

        info!(cart_id = %cart.id, user_id = %user_id, "Opened pending cart");
        self.reload(&cart.id).await
    }

    /// Adds `quantity` units of a snack to the caller's pending cart.
    ///
    /// A snack already in the cart has its line increased rather than a
    /// second line added. The stock check covers the merged quantity.
    ///
    /// ## Errors
    /// * `InvalidRequest` - bad ids/quantity, not enough stock, cart full
    /// * `NotFound` - no pending cart, unknown snack
    /// * `Internal` - identity unparseable, storage failure
    pub async fn add_item_to_cart(
        &self,
        req: &AddItemToCartRequest,
        user: &UserContext,
    ) -> CartResult<Cart> {
        debug!(snack_id = %req.snack_id, quantity = req.quantity, "add_item_to_cart");

        let req = req.validate()?;
        let user_id = user.user_id()?.to_string();
        let cart = self.pending_cart_for(&user_id).await?;
        let snack = self.snack(&req.snack_id).await?;

        let existing = self
            .db
            .items()
            .find_by_cart_and_snack(&cart.id, &snack.id)
            .await?;
        let wanted = existing
            .as_ref()
            .map_or(req.quantity, |item| item.quantity + req.quantity);
        validate_quantity(wanted)?;
        rules::check_stock(&snack.id, snack.quantity, wanted)?;

        let item = match existing {
            Some(line) => CartItem {
                quantity: wanted,
                ..line
            },
            None => {
                rules::ensure_room_for(&cart, &snack.id)?;
                CartItem::new(&cart.id, &snack.id, wanted)
            }
        };

        self.db.items().save(&item).await?;

        info!(
            cart_id = %cart.id,
            item_id = %item.id,
            snack_id = %snack.id,
            quantity = item.quantity,
            "Item added to cart"
        );

        self.reload(&cart.id).await
    }

    /// Returns the pending cart of `user_id` with every line's snack attached.
    ///
    /// Despite the name, the lookup key is the user, not a cart id.
    ///
    /// ## Errors
    /// * `NotFound` - the user has no pending cart
    /// * `Internal` - a line references a snack that no longer exists
    pub async fn get_cart_by_id(&self, user_id: &Uuid) -> CartResult<Cart> {
        let mut cart = self.pending_cart_for(&user_id.to_string()).await?;

        for item in &mut cart.items {
            let snack = self
                .db
                .snacks()
                .get_by_id(&item.snack_id)
                .await?
                .ok_or_else(|| {
                    error!(item_id = %item.id, snack_id = %item.snack_id, "Cart line references missing snack");
                    CartError::internal(format!(
                        "Snack {} referenced by item {} is missing",
                        item.snack_id, item.id
                    ))
                })?;
            item.snack = Some(snack);
        }

        Ok(cart)
    }

    /// Sets an existing line of the caller's pending cart to `quantity`.
    ///
    /// The quantity is absolute and is checked against stock on its own.
    ///
    /// ## Errors
    /// * `InvalidRequest` - bad id/quantity, not enough stock
    /// * `Forbidden` - the item is not in the caller's pending cart
    /// * `NotFound` - no pending cart, unknown item or snack
    pub async fn update_item_from_cart(
        &self,
        req: &UpdateItemFromCartRequest,
        user: &UserContext,
    ) -> CartResult<Cart> {
        debug!(item_id = %req.item_id, quantity = req.quantity, "update_item_from_cart");

        let req = req.validate()?;
        let user_id = user.user_id()?.to_string();
        let cart = self.pending_cart_for(&user_id).await?;
        let mut item = self.owned_item(&cart, &req.item_id).await?;
        let snack = self.snack(&item.snack_id).await?;

        rules::check_stock(&snack.id, snack.quantity, req.quantity)?;

        item.quantity = req.quantity;
        self.db.items().save(&item).await?;

        info!(
            cart_id = %cart.id,
            item_id = %item.id,
            quantity = item.quantity,
            "Cart item updated"
        );

        self.reload(&cart.id).await
    }

    /// Removes a line from the caller's pending cart.
    ///
    /// ## Errors
    /// * `InvalidRequest` - malformed item id
    /// * `Forbidden` - the item is not in the caller's pending cart
    /// * `NotFound` - no pending cart, unknown item
    pub async fn delete_item_from_cart(
        &self,
        item_id: &str,
        user: &UserContext,
    ) -> CartResult<Cart> {
        debug!(item_id = %item_id, "delete_item_from_cart");

        let item_id = validate_uuid("item_id", item_id)?;
        let user_id = user.user_id()?.to_string();
        let cart = self.pending_cart_for(&user_id).await?;
        let item = self.owned_item(&cart, &item_id).await?;

        self.db.items().delete(&item.id).await?;

        info!(cart_id = %cart.id, item_id = %item.id, "Cart item deleted");

        self.reload(&cart.id).await
    }

    /// Confirms the caller's pending cart. Confirmed is terminal.
    ///
    /// ## Errors
    /// * `InvalidRequest` - malformed id, unknown cart, already confirmed
    /// * `Forbidden` - the caller does not own the cart
    /// * `Internal` - identity unparseable, the transaction failed
    pub async fn confirm_cart(&self, cart_id: &str, user: &UserContext) -> CartResult<Cart> {
        debug!(cart_id = %cart_id, "confirm_cart");

        let cart_id = validate_uuid("cart_id", cart_id)?;

        let cart = self
            .db
            .carts()
            .get_with_snacks(&cart_id)
            .await?
            .ok_or_else(|| CartError::invalid(format!("Cart not found: {}", cart_id)))?;

        let caller = user.user_id()?;
        rules::ensure_owner(&cart, &caller)?;
        let next = rules::confirm_transition(&cart)?;

        match self.db.carts().confirm(&cart.id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!(cart_id = %cart.id, "Cart left pending before confirm committed");
                return Err(CartError::invalid(format!(
                    "Cart {} is no longer pending",
                    cart.id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        info!(cart_id = %cart.id, user_id = %caller, status = %next, "Cart confirmed");

        self.reload(&cart.id).await
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    async fn pending_cart_for(&self, user_id: &str) -> CartResult<Cart> {
        self.db
            .carts()
            .find_pending_for_user(user_id)
            .await?
            .ok_or_else(|| CartError::not_found("Pending cart", user_id))
    }

    async fn snack(&self, snack_id: &str) -> CartResult<Snack> {
        self.db
            .snacks()
            .get_by_id(snack_id)
            .await?
            .ok_or_else(|| CartError::not_found("Snack", snack_id))
    }

    /// Loads an item and rejects it unless it is a line of `cart`.
    async fn owned_item(&self, cart: &Cart, item_id: &str) -> CartResult<CartItem> {
        let item = self
            .db
            .items()
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| CartError::not_found("Item", item_id))?;

        rules::ensure_item_in_cart(cart, &item)?;
        Ok(item)
    }

    async fn reload(&self, cart_id: &str) -> CartResult<Cart> {
        self.db
            .carts()
            .get_with_snacks(cart_id)
            .await?
            .ok_or_else(|| CartError::not_found("Cart", cart_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
