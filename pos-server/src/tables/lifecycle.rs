//! Table status transitions
//!
//! ```text
//!            ┌──────────► occupied ──┐
//! available ─┤              ▲        ├──► available
//!            └──► reserved ─┘────────┘
//! ```
//!
//! `occupied → reserved` is never allowed. The fields owned by a status are
//! set on entry and cleared on exit, so a table never carries stale waiter or
//! reservation data.

use shared::models::{DiningTable, TableStatus, TableStatusUpdate};

use super::{TableError, TableResult};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, normalize_optional_text};

pub fn can_transition(from: TableStatus, to: TableStatus) -> bool {
    use TableStatus::*;
    !matches!((from, to), (Occupied, Reserved))
}

/// Apply a status change to `table`, returning the new state.
///
/// Nothing is written here: the caller persists the result only when this
/// succeeds, so a rejected change leaves the stored table untouched.
/// Waiter eligibility is checked by the caller against the staff table.
pub fn apply_status_change(
    table: &DiningTable,
    update: &TableStatusUpdate,
    now: i64,
) -> TableResult<DiningTable> {
    if !can_transition(table.status, update.status) {
        return Err(TableError::InvalidTransition {
            from: table.status,
            to: update.status,
        });
    }

    let mut next = DiningTable {
        status: update.status,
        waiter_id: None,
        guest_count: None,
        reservation_name: None,
        reservation_phone: None,
        reservation_time: None,
        updated_at: now,
        ..table.clone()
    };

    match update.status {
        TableStatus::Available => {}
        TableStatus::Occupied => {
            let waiter_id = update.waiter_id.ok_or(TableError::WaiterRequired)?;
            if let Some(guests) = update.guest_count {
                if guests <= 0 {
                    return Err(TableError::Invalid(format!(
                        "guest count must be positive, got {}",
                        guests
                    )));
                }
                if guests > table.capacity {
                    return Err(TableError::CapacityExceeded {
                        guests,
                        capacity: table.capacity,
                    });
                }
            }
            next.waiter_id = Some(waiter_id);
            next.guest_count = update.guest_count;
        }
        TableStatus::Reserved => {
            let name = normalize_optional_text(
                update.reservation_name.clone(),
                "reservation name",
                MAX_NAME_LEN,
            )
            .map_err(|e| TableError::Invalid(e.message))?
            .ok_or(TableError::ReservationRequired)?;
            let phone = normalize_optional_text(
                update.reservation_phone.clone(),
                "reservation phone",
                MAX_SHORT_TEXT_LEN,
            )
            .map_err(|e| TableError::Invalid(e.message))?;
            next.reservation_name = Some(name);
            next.reservation_phone = phone;
            next.reservation_time = update.reservation_time;
        }
    }

    Ok(next)
}

/// Check the per-status field invariant of a stored table
pub fn fields_consistent(table: &DiningTable) -> bool {
    let occupied_fields = table.waiter_id.is_some() || table.guest_count.is_some();
    let reserved_fields = table.reservation_name.is_some()
        || table.reservation_phone.is_some()
        || table.reservation_time.is_some();
    match table.status {
        TableStatus::Available => !occupied_fields && !reserved_fields,
        TableStatus::Occupied => table.waiter_id.is_some() && !reserved_fields,
        TableStatus::Reserved => table.reservation_name.is_some() && !occupied_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TableStatus::*;

    fn table_five() -> DiningTable {
        DiningTable {
            id: 105,
            number: 5,
            capacity: 4,
            floor: 1,
            status: Available,
            waiter_id: None,
            guest_count: None,
            reservation_name: None,
            reservation_phone: None,
            reservation_time: None,
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn seat_guests_sets_waiter_and_count() {
        let seated = apply_status_change(&table_five(), &TableStatusUpdate::occupied(7, 2), 10).unwrap();
        assert_eq!(seated.status, Occupied);
        assert_eq!(seated.waiter_id, Some(7));
        assert_eq!(seated.guest_count, Some(2));
        assert_eq!(seated.updated_at, 10);
        assert!(fields_consistent(&seated));
    }

    #[test]
    fn occupied_without_waiter_is_rejected() {
        let update = TableStatusUpdate {
            waiter_id: None,
            ..TableStatusUpdate::occupied(7, 2)
        };
        assert!(matches!(
            apply_status_change(&table_five(), &update, 10),
            Err(TableError::WaiterRequired)
        ));
    }

    #[test]
    fn guest_count_is_bounded_by_capacity() {
        assert!(matches!(
            apply_status_change(&table_five(), &TableStatusUpdate::occupied(7, 5), 10),
            Err(TableError::CapacityExceeded { guests: 5, capacity: 4 })
        ));
        assert!(matches!(
            apply_status_change(&table_five(), &TableStatusUpdate::occupied(7, 0), 10),
            Err(TableError::Invalid(_))
        ));
    }

    #[test]
    fn reservation_requires_name_and_clears_on_release() {
        let blank = TableStatusUpdate::reserved("  ", None, None);
        assert!(matches!(
            apply_status_change(&table_five(), &blank, 10),
            Err(TableError::ReservationRequired)
        ));

        let reserved = apply_status_change(
            &table_five(),
            &TableStatusUpdate::reserved("Ortega", Some("555-0100".into()), Some(1_700_000_000_000)),
            10,
        )
        .unwrap();
        assert_eq!(reserved.reservation_name.as_deref(), Some("Ortega"));
        assert!(fields_consistent(&reserved));

        let released = apply_status_change(&reserved, &TableStatusUpdate::available(), 20).unwrap();
        assert_eq!(released.status, Available);
        assert!(released.reservation_name.is_none());
        assert!(released.reservation_phone.is_none());
        assert!(released.reservation_time.is_none());
        assert!(fields_consistent(&released));
    }

    #[test]
    fn reserved_to_occupied_drops_reservation_fields() {
        let reserved =
            apply_status_change(&table_five(), &TableStatusUpdate::reserved("Ortega", None, None), 10)
                .unwrap();
        let seated = apply_status_change(&reserved, &TableStatusUpdate::occupied(7, 3), 20).unwrap();
        assert_eq!(seated.status, Occupied);
        assert!(seated.reservation_name.is_none());
        assert!(fields_consistent(&seated));
    }

    #[test]
    fn occupied_cannot_become_reserved() {
        let seated = apply_status_change(&table_five(), &TableStatusUpdate::occupied(7, 2), 10).unwrap();
        assert!(matches!(
            apply_status_change(&seated, &TableStatusUpdate::reserved("Late", None, None), 20),
            Err(TableError::InvalidTransition { from: Occupied, to: Reserved })
        ));
    }

    #[test]
    fn every_outcome_keeps_fields_consistent() {
        let updates = [
            TableStatusUpdate::available(),
            TableStatusUpdate::occupied(7, 2),
            TableStatusUpdate::reserved("Ortega", None, Some(5)),
        ];
        let mut starts = vec![table_five()];
        for u in &updates {
            starts.push(apply_status_change(&table_five(), u, 2).unwrap());
        }
        for start in &starts {
            for u in &updates {
                if let Ok(next) = apply_status_change(start, u, 3) {
                    assert!(fields_consistent(&next), "{} -> {}", start.status, u.status);
                }
            }
        }
    }
}
