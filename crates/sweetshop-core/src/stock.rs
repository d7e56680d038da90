//! # Stock Arithmetic
//!
//! The two quantity-changing operations, as pure functions over an `Item`.
//!
//! ```text
//! purchase(item, qty)                      restock(item, qty)
//!   qty <= 0          → Validation           qty <= 0                 → Validation
//!   qty > quantity    → InsufficientStock    quantity + qty overflows → QuantityOverflow
//!   otherwise         → quantity - qty       otherwise                → quantity + qty
//! ```
//!
//! The SQLite store performs the same checks inside a single guarded
//! `UPDATE`; the in-memory demo source calls these directly while holding
//! its lock. Neither ever observes a negative quantity.

use crate::error::{CoreError, CoreResult};
use crate::types::Item;
use crate::validation::{validate_purchase_quantity, validate_restock_quantity};

/// Returns the quantity left after selling `qty` units of `item`.
///
/// ## Example
/// ```rust
/// # use sweetshop_core::{Item, Money, NewItem, stock::apply_purchase};
/// # let item = Item::from_new(NewItem {
/// #     name: "Sour Worms".into(), category: "Gummy".into(),
/// #     price: Money::from_cents(150), quantity: 10, image_url: None,
/// # }, chrono::Utc::now());
/// assert_eq!(apply_purchase(&item, 2).unwrap(), 8);
/// assert!(apply_purchase(&item, 11).is_err());
/// ```
pub fn apply_purchase(item: &Item, qty: i64) -> CoreResult<i64> {
    validate_purchase_quantity(qty)?;

    if !item.in_stock(qty) {
        return Err(CoreError::InsufficientStock {
            name: item.name.clone(),
            available: item.quantity,
            requested: qty,
        });
    }

    Ok(item.quantity - qty)
}

/// Returns the quantity after adding `qty` units to `item`.
pub fn apply_restock(item: &Item, qty: i64) -> CoreResult<i64> {
    validate_restock_quantity(qty)?;

    item.quantity
        .checked_add(qty)
        .ok_or_else(|| CoreError::QuantityOverflow {
            name: item.name.clone(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::NewItem;
    use chrono::Utc;

    fn item_with(quantity: i64) -> Item {
        Item::from_new(
            NewItem {
                name: "Chocolate Frog".into(),
                category: "Chocolate".into(),
                price: Money::from_cents(400),
                quantity,
                image_url: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_purchase_decrements() {
        assert_eq!(apply_purchase(&item_with(10), 2).unwrap(), 8);
        assert_eq!(apply_purchase(&item_with(10), 10).unwrap(), 0);
    }

    #[test]
    fn test_purchase_insufficient_stock() {
        let err = apply_purchase(&item_with(8), 100).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 8);
                assert_eq!(requested, 100);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_purchase_rejects_non_positive() {
        assert!(matches!(
            apply_purchase(&item_with(10), 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            apply_purchase(&item_with(10), -1),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_restock() {
        assert_eq!(apply_restock(&item_with(8), 10).unwrap(), 18);
        assert!(matches!(
            apply_restock(&item_with(8), 0),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(apply_restock(&item_with(0), 2_000_000).unwrap(), 2_000_000);
        assert!(matches!(
            apply_restock(&item_with(i64::MAX - 1), 2),
            Err(CoreError::QuantityOverflow { .. })
        ));
    }

    #[test]
    fn test_sequence_never_negative() {
        let mut item = item_with(7);
        let mut sold = 0;
        for qty in [3, 3, 3, 1, 5, 1] {
            if let Ok(left) = apply_purchase(&item, qty) {
                item.quantity = left;
                sold += qty;
            }
            assert!(item.quantity >= 0);
        }
        assert_eq!(sold, 7);
        assert_eq!(item.quantity, 0);
    }
}
