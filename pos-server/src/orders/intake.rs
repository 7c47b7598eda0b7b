//! Order intake: resolving submitted lines against the menu and picking
//! the waiter an order is assigned to.

use rust_decimal::Decimal;
use shared::models::{DiningTable, MenuItem, OrderItemInput, Role};

use super::lifecycle::merge_lines;
use super::money::validate_quantity;
use super::{OrderError, OrderResult};
use crate::auth::CurrentUser;
use crate::utils::validation::{MAX_NOTE_LEN, normalize_optional_text};

/// A line ready to be persisted, with name and price snapshotted from the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLine {
    pub menu_item_id: i64,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Snapshot one menu item into a line.
pub fn snapshot_line(menu_item: &MenuItem, quantity: i32, notes: Option<String>) -> OrderResult<NewLine> {
    validate_quantity(quantity)?;
    if !menu_item.available {
        return Err(OrderError::MenuItemUnavailable(menu_item.name.clone()));
    }
    let notes = normalize_optional_text(notes, "notes", MAX_NOTE_LEN)
        .map_err(|e| OrderError::Invalid(e.message))?;
    Ok(NewLine {
        menu_item_id: menu_item.id,
        name: menu_item.name.clone(),
        price: menu_item.price,
        quantity,
        notes,
    })
}

/// Resolve a submission: merge duplicates, then snapshot each line from `menu`.
///
/// Every submitted quantity is checked before merging; the merged total is
/// checked again when the line is snapshotted. `menu` only needs to contain
/// the referenced items.
pub fn resolve_lines(inputs: Vec<OrderItemInput>, menu: &[MenuItem]) -> OrderResult<Vec<NewLine>> {
    if inputs.is_empty() {
        return Err(OrderError::Empty);
    }
    for input in &inputs {
        validate_quantity(input.quantity)?;
    }
    merge_lines(inputs)
        .into_iter()
        .map(|input| {
            let menu_item = menu
                .iter()
                .find(|m| m.id == input.menu_item_id)
                .ok_or(OrderError::MenuItemNotFound(input.menu_item_id))?;
            snapshot_line(menu_item, input.quantity, input.notes)
        })
        .collect()
}

/// Waiter for a new order: explicit choice, then the table's waiter, then the
/// acting user when they are a waiter.
pub fn default_waiter(
    requested: Option<i64>,
    table: &DiningTable,
    actor: &CurrentUser,
) -> Option<i64> {
    requested
        .or(table.waiter_id)
        .or_else(|| (actor.role == Role::Waiter).then_some(actor.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::money::MAX_QUANTITY;
    use shared::models::{MenuCategory, TableStatus};
    use std::str::FromStr;

    fn menu_item(id: i64, name: &str, price: &str, available: bool) -> MenuItem {
        MenuItem {
            id,
            name: name.into(),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            category: MenuCategory::MainCourse,
            available,
            special: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn input(menu_item_id: i64, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            menu_item_id,
            quantity,
            notes: None,
        }
    }

    fn table(waiter_id: Option<i64>) -> DiningTable {
        DiningTable {
            id: 5,
            number: 5,
            capacity: 4,
            floor: 1,
            status: if waiter_id.is_some() {
                TableStatus::Occupied
            } else {
                TableStatus::Available
            },
            waiter_id,
            guest_count: waiter_id.map(|_| 2),
            reservation_name: None,
            reservation_phone: None,
            reservation_time: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn actor(id: i64, role: Role) -> CurrentUser {
        CurrentUser {
            id,
            name: "someone".into(),
            role,
        }
    }

    #[test]
    fn lines_snapshot_menu_name_and_price() {
        let menu = vec![menu_item(1, "Burger", "10.00", true)];
        let lines = resolve_lines(vec![input(1, 2)], &menu).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "Burger");
        assert_eq!(lines[0].price, Decimal::from_str("10.00").unwrap());
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn duplicates_merge_before_resolution() {
        let menu = vec![menu_item(1, "Burger", "10.00", true)];
        let lines = resolve_lines(vec![input(1, 1), input(1, 1)], &menu).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn each_line_is_checked_before_merging() {
        let menu = vec![menu_item(1, "Burger", "10.00", true)];
        assert!(matches!(
            resolve_lines(vec![input(1, 5), input(1, -3)], &menu),
            Err(OrderError::InvalidQuantity(_))
        ));
        assert!(matches!(
            resolve_lines(vec![input(1, 2), input(1, 0)], &menu),
            Err(OrderError::InvalidQuantity(_))
        ));
        // Individually valid lines can still overflow once merged
        assert!(matches!(
            resolve_lines(vec![input(1, MAX_QUANTITY), input(1, 1)], &menu),
            Err(OrderError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn rejects_empty_unknown_unavailable_and_bad_quantity() {
        let menu = vec![
            menu_item(1, "Burger", "10.00", true),
            menu_item(2, "Soup of the day", "6.50", false),
        ];
        assert!(matches!(resolve_lines(vec![], &menu), Err(OrderError::Empty)));
        assert!(matches!(
            resolve_lines(vec![input(99, 1)], &menu),
            Err(OrderError::MenuItemNotFound(99))
        ));
        assert!(matches!(
            resolve_lines(vec![input(2, 1)], &menu),
            Err(OrderError::MenuItemUnavailable(_))
        ));
        assert!(matches!(
            resolve_lines(vec![input(1, 0)], &menu),
            Err(OrderError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn waiter_defaulting_order() {
        let waiter = actor(7, Role::Waiter);
        let manager = actor(8, Role::Manager);

        assert_eq!(default_waiter(Some(3), &table(Some(4)), &waiter), Some(3));
        assert_eq!(default_waiter(None, &table(Some(4)), &waiter), Some(4));
        assert_eq!(default_waiter(None, &table(None), &waiter), Some(7));
        assert_eq!(default_waiter(None, &table(None), &manager), None);
    }
}
