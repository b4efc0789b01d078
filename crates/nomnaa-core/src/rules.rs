//! # Cart Rules
//!
//! The decisions the cart service makes, as pure functions over loaded data.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Add / Update item                     Confirm                          │
//! │  ─────────────────                     ───────                          │
//! │  ensure_pending(cart)                  ensure_owner(cart, caller)       │
//! │  ensure_item_in_cart(cart, item)       confirm_transition(cart)         │
//! │  check_stock(snack, wanted)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::types::{Cart, CartItem, CartStatus};
use crate::validation::validate_cart_size;

/// Rejects a request for more units than the shelf holds.
///
/// `requested` is the quantity the line would end up with, so callers merging
/// into an existing line pass `existing + added`.
pub fn check_stock(snack_id: &str, available: i64, requested: i64) -> CoreResult<()> {
    if requested > available {
        return Err(CoreError::InsufficientStock {
            snack_id: snack_id.to_string(),
            available,
            requested,
        });
    }
    Ok(())
}

/// Rejects a new distinct line when the cart is full.
///
/// Merging into an existing line never counts against the limit.
pub fn ensure_room_for(cart: &Cart, snack_id: &str) -> CoreResult<()> {
    if cart.find_item_by_snack(snack_id).is_some() {
        return Ok(());
    }
    validate_cart_size(cart.item_count()).map_err(|_| CoreError::CartTooLarge {
        max: crate::MAX_CART_ITEMS,
    })
}

/// Rejects any caller other than the cart's owner.
///
/// An owner id that does not parse never matches.
pub fn ensure_owner(cart: &Cart, caller: &Uuid) -> CoreResult<()> {
    let owned = Uuid::parse_str(&cart.user_id)
        .map(|owner| owner == *caller)
        .unwrap_or(false);

    if !owned {
        return Err(CoreError::NotCartOwner {
            cart_id: cart.id.clone(),
            user_id: caller.to_string(),
        });
    }
    Ok(())
}

/// Rejects an item that is not a line of `cart`.
///
/// Applied before update/delete so a caller can only touch their own lines.
pub fn ensure_item_in_cart(cart: &Cart, item: &CartItem) -> CoreResult<()> {
    if item.cart_id != cart.id {
        return Err(CoreError::ItemNotInCart {
            item_id: item.id.clone(),
            cart_id: cart.id.clone(),
        });
    }
    Ok(())
}

/// Rejects mutation of a cart that left the pending state.
pub fn ensure_pending(cart: &Cart) -> CoreResult<()> {
    if !cart.is_pending() {
        return Err(CoreError::InvalidCartStatus {
            cart_id: cart.id.clone(),
            current_status: cart.status.to_string(),
        });
    }
    Ok(())
}

/// Returns the status a cart moves to when confirmed.
///
/// Confirmed is terminal: confirming twice is rejected, not a no-op.
pub fn confirm_transition(cart: &Cart) -> CoreResult<CartStatus> {
    ensure_pending(cart)?;
    Ok(CartStatus::Confirmed)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_CART_ITEMS;

    fn cart_for(owner: &Uuid) -> Cart {
        Cart::new_pending(&owner.to_string())
    }

    #[test]
    fn test_check_stock() {
        assert!(check_stock("s", 5, 3).is_ok());
        assert!(check_stock("s", 5, 5).is_ok());

        let err = check_stock("s", 5, 7).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 5,
                requested: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_ensure_room_for() {
        let owner = Uuid::new_v4();
        let mut cart = cart_for(&owner);
        for n in 0..MAX_CART_ITEMS {
            cart.items.push(CartItem::new(&cart.id, &format!("s{n}"), 1));
        }

        assert!(matches!(
            ensure_room_for(&cart, "new"),
            Err(CoreError::CartTooLarge { .. })
        ));
        // Existing line merges, so it still fits
        assert!(ensure_room_for(&cart, "s0").is_ok());
    }

    #[test]
    fn test_ensure_owner() {
        let owner = Uuid::new_v4();
        let cart = cart_for(&owner);

        assert!(ensure_owner(&cart, &owner).is_ok());
        assert!(matches!(
            ensure_owner(&cart, &Uuid::new_v4()),
            Err(CoreError::NotCartOwner { .. })
        ));
    }

    #[test]
    fn test_ensure_item_in_cart() {
        let mine = cart_for(&Uuid::new_v4());
        let theirs = cart_for(&Uuid::new_v4());
        let item = CartItem::new(&theirs.id, "s", 2);

        assert!(ensure_item_in_cart(&theirs, &item).is_ok());
        assert!(matches!(
            ensure_item_in_cart(&mine, &item),
            Err(CoreError::ItemNotInCart { .. })
        ));
    }

    #[test]
    fn test_confirm_transition_is_terminal() {
        let owner = Uuid::new_v4();
        let mut cart = cart_for(&owner);
        assert_eq!(confirm_transition(&cart).unwrap(), CartStatus::Confirmed);

        cart.status = CartStatus::Confirmed;
        assert!(matches!(
            confirm_transition(&cart),
            Err(CoreError::InvalidCartStatus { .. })
        ));
    }
}
