//! Order and line-item state machines
//!
//! ```text
//! new ─► in_progress ─► done ─► delivered ─► paid
//!  │          │           │          │
//!  └──────────┴───────────┴──────────┴─────► cancelled
//! ```
//!
//! No backward moves. `paid` is only reachable through payment capture.

use shared::models::{ItemStatus, OrderItemInput, OrderStatus};

use super::{OrderError, OrderResult};

/// Forward targets reachable from `from`
pub fn allowed_next(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        New => &[InProgress, Cancelled],
        InProgress => &[Done, Cancelled],
        Done => &[Delivered, Cancelled],
        Delivered => &[Paid, Cancelled],
        Paid | Cancelled => &[],
    }
}

pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_next(from).contains(&to)
}

fn terminal_error(order_id: i64, status: OrderStatus) -> Option<OrderError> {
    match status {
        OrderStatus::Paid => Some(OrderError::AlreadyPaid(order_id)),
        OrderStatus::Cancelled => Some(OrderError::AlreadyCancelled(order_id)),
        _ => None,
    }
}

/// Validate a status change requested through the status endpoint.
///
/// `paid` is refused here even from `delivered`: it belongs to payment capture.
pub fn validate_status_change(order_id: i64, from: OrderStatus, to: OrderStatus) -> OrderResult<()> {
    if let Some(err) = terminal_error(order_id, from) {
        return Err(err);
    }
    if to == OrderStatus::Paid {
        return Err(OrderError::PaidRequiresPayment);
    }
    if !can_transition(from, to) {
        return Err(OrderError::InvalidTransition { from, to });
    }
    Ok(())
}

/// Validate that a payment may be captured for an order in `from`
pub fn validate_payment_capture(order_id: i64, from: OrderStatus) -> OrderResult<()> {
    if let Some(err) = terminal_error(order_id, from) {
        return Err(err);
    }
    if from != OrderStatus::Delivered {
        return Err(OrderError::NotDelivered(from));
    }
    Ok(())
}

/// Items may be added or edited only while the order is not terminal
pub fn ensure_editable(order_id: i64, status: OrderStatus) -> OrderResult<()> {
    match terminal_error(order_id, status) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Item preparation moves forward only; staying put is a no-op.
pub fn validate_item_transition(from: ItemStatus, to: ItemStatus) -> OrderResult<()> {
    if to < from {
        return Err(OrderError::ItemInvalidTransition { from, to });
    }
    Ok(())
}

/// Merge duplicate menu items in one submission, keeping first-seen order.
///
/// Quantities are summed; the first non-empty note wins.
pub fn merge_lines(inputs: Vec<OrderItemInput>) -> Vec<OrderItemInput> {
    let mut merged: Vec<OrderItemInput> = Vec::with_capacity(inputs.len());
    for input in inputs {
        match merged
            .iter_mut()
            .find(|m| m.menu_item_id == input.menu_item_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(input.quantity);
                if existing.notes.is_none() {
                    existing.notes = input.notes;
                }
            }
            None => merged.push(input),
        }
    }
    merged
}
