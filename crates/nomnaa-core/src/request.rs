//! # Request DTOs
//!
//! Bodies accepted by the cart operations, deserialized by the HTTP layer and
//! validated here before the service touches any store.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{validate_quantity, validate_uuid, ValidationResult};

/// Add `quantity` units of a snack to the caller's pending cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddItemToCartRequest {
    pub snack_id: String,
    pub quantity: i64,
}

impl AddItemToCartRequest {
    pub fn new(snack_id: impl Into<String>, quantity: i64) -> Self {
        AddItemToCartRequest {
            snack_id: snack_id.into(),
            quantity,
        }
    }

    /// Checks the request and returns it with `snack_id` in canonical form.
    pub fn validate(&self) -> ValidationResult<Self> {
        let snack_id = validate_uuid("snack_id", &self.snack_id)?;
        validate_quantity(self.quantity)?;
        Ok(AddItemToCartRequest {
            snack_id,
            quantity: self.quantity,
        })
    }
}

/// Set the quantity of an existing line (absolute, not a delta).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateItemFromCartRequest {
    pub item_id: String,
    pub quantity: i64,
}

impl UpdateItemFromCartRequest {
    pub fn new(item_id: impl Into<String>, quantity: i64) -> Self {
        UpdateItemFromCartRequest {
            item_id: item_id.into(),
            quantity,
        }
    }

    /// Checks the request and returns it with `item_id` in canonical form.
    pub fn validate(&self) -> ValidationResult<Self> {
        let item_id = validate_uuid("item_id", &self.item_id)?;
        validate_quantity(self.quantity)?;
        Ok(UpdateItemFromCartRequest {
            item_id,
            quantity: self.quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    const SNACK: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn test_add_request_validation() {
        assert!(AddItemToCartRequest::new(SNACK, 3).validate().is_ok());
        assert!(matches!(
            AddItemToCartRequest::new(SNACK, 0).validate(),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            AddItemToCartRequest::new("", 1).validate(),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_update_request_validation() {
        assert!(UpdateItemFromCartRequest::new(SNACK, 999).validate().is_ok());
        assert!(UpdateItemFromCartRequest::new(SNACK, 1000).validate().is_err());
        assert!(UpdateItemFromCartRequest::new("item-1", 2).validate().is_err());
    }

    #[test]
    fn test_validated_request_has_canonical_id() {
        let req = AddItemToCartRequest::new(SNACK.to_uppercase(), 2)
            .validate()
            .unwrap();
        assert_eq!(req, AddItemToCartRequest::new(SNACK, 2));

        let req = UpdateItemFromCartRequest::new(SNACK.replace('-', ""), 4)
            .validate()
            .unwrap();
        assert_eq!(req.item_id, SNACK);
    }

    #[test]
    fn test_add_request_deserializes() {
        let req: AddItemToCartRequest =
            serde_json::from_str(&format!(r#"{{"snack_id":"{SNACK}","quantity":2}}"#)).unwrap();
        assert_eq!(req, AddItemToCartRequest::new(SNACK, 2));
    }
}
