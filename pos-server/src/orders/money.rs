//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is `Decimal`; storage uses integer cents. Rounding is
//! half-up (away from zero) to 2 decimal places, applied once per derived
//! amount so `total == subtotal + tax + tip` holds exactly.

use rust_decimal::prelude::*;
use shared::models::{OrderItem, OrderTotals, TIP_PRESETS, Tip};

use super::OrderError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed payment amount
pub const MAX_PAYMENT_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round to cents, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Decimal → integer cents (rounded first)
pub fn to_cents(value: Decimal) -> i64 {
    let mut rounded = round_money(value);
    rounded.rescale(DECIMAL_PLACES);
    let mantissa = rounded.mantissa();
    i64::try_from(mantissa).unwrap_or(if mantissa < 0 { i64::MIN } else { i64::MAX })
}

/// Integer cents → Decimal with 2 decimal places
#[inline]
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, DECIMAL_PLACES)
}

/// Validate a menu price: non-negative, at most cents precision, below [`MAX_PRICE`]
pub fn validate_price(price: Decimal) -> Result<(), OrderError> {
    if price.is_sign_negative() {
        return Err(OrderError::InvalidPrice(format!(
            "price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(OrderError::InvalidPrice(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    if price.normalize().scale() > DECIMAL_PLACES {
        return Err(OrderError::InvalidPrice(format!(
            "price has more than {} decimal places: {}",
            DECIMAL_PLACES, price
        )));
    }
    Ok(())
}

/// Validate a line quantity (1..=MAX_QUANTITY)
pub fn validate_quantity(quantity: i32) -> Result<(), OrderError> {
    if quantity <= 0 {
        return Err(OrderError::InvalidQuantity(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidQuantity(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Validate a payment amount (> 0) and tip (>= 0), both in whole cents
pub fn validate_payment(amount: Decimal, tip: Decimal) -> Result<(), OrderError> {
    if amount <= Decimal::ZERO || amount > MAX_PAYMENT_AMOUNT {
        return Err(OrderError::InvalidAmount(format!(
            "payment amount must be between 0.01 and {}, got {}",
            MAX_PAYMENT_AMOUNT, amount
        )));
    }
    if tip.is_sign_negative() || tip > MAX_PAYMENT_AMOUNT {
        return Err(OrderError::InvalidAmount(format!(
            "tip must be non-negative, got {}",
            tip
        )));
    }
    // Stored as cents: finer amounts would be rounded silently
    for (field, value) in [("amount", amount), ("tip", tip)] {
        if value.normalize().scale() > DECIMAL_PLACES {
            return Err(OrderError::InvalidAmount(format!(
                "{} has more than {} decimal places: {}",
                field, DECIMAL_PLACES, value
            )));
        }
    }
    Ok(())
}

/// price × quantity
#[inline]
pub fn line_total(price: Decimal, quantity: i32) -> Decimal {
    price * Decimal::from(quantity)
}

/// Σ(price × quantity)
pub fn subtotal<'a>(items: impl IntoIterator<Item = &'a OrderItem>) -> Decimal {
    round_money(
        items
            .into_iter()
            .map(|item| line_total(item.price, item.quantity))
            .sum(),
    )
}

/// subtotal × rate, rounded to cents
pub fn tax(subtotal: Decimal, rate: Decimal) -> Decimal {
    round_money(subtotal * rate)
}

/// Resolve a tip choice against the subtotal
pub fn tip(subtotal: Decimal, choice: Tip) -> Result<Decimal, OrderError> {
    match choice {
        Tip::Preset(percent) => {
            if !TIP_PRESETS.contains(&percent) {
                return Err(OrderError::InvalidTip(format!(
                    "tip preset must be one of {:?}, got {}",
                    TIP_PRESETS, percent
                )));
            }
            Ok(round_money(
                subtotal * Decimal::from(percent) / Decimal::ONE_HUNDRED,
            ))
        }
        Tip::Amount(amount) => {
            if amount.is_sign_negative() {
                return Err(OrderError::InvalidTip(format!(
                    "tip amount must be non-negative, got {}",
                    amount
                )));
            }
            Ok(round_money(amount))
        }
    }
}

/// Derive subtotal, tax, tip and grand total for a set of lines
pub fn compute_totals(
    items: &[OrderItem],
    tax_rate: Decimal,
    choice: Tip,
) -> Result<OrderTotals, OrderError> {
    let subtotal = subtotal(items);
    let tax = tax(subtotal, tax_rate);
    let tip = tip(subtotal, choice)?;
    Ok(OrderTotals {
        subtotal,
        tax_rate,
        tax,
        tip,
        total: subtotal + tax + tip,
    })
}
