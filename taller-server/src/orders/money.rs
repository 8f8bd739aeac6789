//! Money calculation using rust_decimal for precision
//!
//! All arithmetic happens on `Decimal`; results convert back to `f64` for
//! storage and serialization, rounded to 2 decimal places.

use rust_decimal::prelude::*;
use shared::{LineItem, Totals};

use super::lifecycle::LifecycleError;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Fixed tax rate: 18%, applied multiplicatively to the subtotal
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Maximum allowed unit price per line item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
const MAX_QUANTITY: i32 = 9_999;

/// Convert f64 to Decimal for calculation
///
/// Inputs are validated finite at the boundary. If NaN/Infinity slips
/// through anyway, log and use zero instead of corrupting totals.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Validate a line item before it enters an order
pub fn validate_line_item(item: &LineItem) -> Result<(), LifecycleError> {
    if item.description.trim().is_empty() {
        return Err(LifecycleError::InvalidItem(
            "description must not be empty".to_string(),
        ));
    }
    if !item.price.is_finite() {
        return Err(LifecycleError::InvalidItem(format!(
            "price must be a finite number, got {}",
            item.price
        )));
    }
    if item.price < 0.0 {
        return Err(LifecycleError::InvalidItem(format!(
            "price must be non-negative, got {}",
            item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(LifecycleError::InvalidItem(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.price
        )));
    }
    if item.quantity < 1 {
        return Err(LifecycleError::InvalidItem(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(LifecycleError::InvalidItem(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }
    Ok(())
}

/// Compute the persisted totals snapshot from a set of line items
///
/// subtotal = Σ(price × quantity); tax = subtotal × 0.18 rounded to 2dp;
/// total = subtotal + tax.
pub fn compute_totals(items: &[LineItem]) -> Totals {
    let subtotal: Decimal = items
        .iter()
        .map(|item| to_decimal(item.price) * Decimal::from(item.quantity))
        .sum();

    let subtotal = subtotal.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let tax =
        (subtotal * TAX_RATE).round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let total = subtotal + tax;

    Totals {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ItemKind;

    fn item(price: f64, quantity: i32) -> LineItem {
        LineItem {
            description: "item".to_string(),
            kind: ItemKind::Part,
            price,
            quantity,
        }
    }

    #[test]
    fn totals_for_a_typical_brake_job() {
        // Brake pad 40 x2 + labor 30 x1 => 110 / 19.80 / 129.80
        let totals = compute_totals(&[item(40.0, 2), item(30.0, 1)]);
        assert_eq!(totals.subtotal, 110.0);
        assert_eq!(totals.tax, 19.8);
        assert_eq!(totals.total, 129.8);
    }

    #[test]
    fn empty_items_produce_zero_totals() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn total_is_subtotal_plus_tax() {
        let cases = [
            vec![item(0.01, 1)],
            vec![item(19.99, 3), item(5.55, 7)],
            vec![item(123.45, 2), item(0.10, 9), item(999.99, 1)],
        ];
        for items in cases {
            let totals = compute_totals(&items);
            let subtotal = to_decimal(totals.subtotal);
            let tax = to_decimal(totals.tax);
            let total = to_decimal(totals.total);
            assert_eq!(total, subtotal + tax);
            assert_eq!(
                tax,
                (subtotal * TAX_RATE).round_dp_with_strategy(
                    2,
                    RoundingStrategy::MidpointAwayFromZero
                )
            );
        }
    }

    #[test]
    fn rounding_half_up_on_tax() {
        // 12.25 * 0.18 = 2.205 -> 2.21 half-up
        let totals = compute_totals(&[item(12.25, 1)]);
        assert_eq!(totals.tax, 2.21);
        assert_eq!(totals.total, 14.46);
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(validate_line_item(&item(-1.0, 1)).is_err());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        assert!(validate_line_item(&item(10.0, 0)).is_err());
    }

    #[test]
    fn non_finite_price_is_rejected() {
        assert!(validate_line_item(&item(f64::NAN, 1)).is_err());
        assert!(validate_line_item(&item(f64::INFINITY, 1)).is_err());
    }

    #[test]
    fn blank_description_is_rejected() {
        let mut bad = item(10.0, 1);
        bad.description = "   ".to_string();
        assert!(validate_line_item(&bad).is_err());
    }
}
