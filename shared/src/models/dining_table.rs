//! Dining Table Model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Table occupancy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dining table entity (桌台)
///
/// `waiter_id` / `guest_count` are only set while occupied, the
/// `reservation_*` fields only while reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub number: i32,
    pub capacity: i32,
    pub floor: i32,
    pub status: TableStatus,
    pub waiter_id: Option<i64>,
    pub guest_count: Option<i32>,
    pub reservation_name: Option<String>,
    pub reservation_phone: Option<String>,
    /// Reservation time (Unix millis)
    pub reservation_time: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableCreate {
    pub number: i32,
    pub capacity: i32,
    #[serde(default)]
    pub floor: i32,
}

/// Update dining table payload (layout only, status goes through [`TableStatusUpdate`])
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableUpdate {
    pub number: Option<i32>,
    pub capacity: Option<i32>,
    pub floor: Option<i32>,
}

/// Table status change request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStatusUpdate {
    pub status: TableStatus,
    pub waiter_id: Option<i64>,
    pub guest_count: Option<i32>,
    pub reservation_name: Option<String>,
    pub reservation_phone: Option<String>,
    pub reservation_time: Option<i64>,
}

impl TableStatusUpdate {
    pub fn available() -> Self {
        Self::to(TableStatus::Available)
    }

    pub fn occupied(waiter_id: i64, guest_count: i32) -> Self {
        Self {
            waiter_id: Some(waiter_id),
            guest_count: Some(guest_count),
            ..Self::to(TableStatus::Occupied)
        }
    }

    pub fn reserved(name: impl Into<String>, phone: Option<String>, time: Option<i64>) -> Self {
        Self {
            reservation_name: Some(name.into()),
            reservation_phone: phone,
            reservation_time: time,
            ..Self::to(TableStatus::Reserved)
        }
    }

    fn to(status: TableStatus) -> Self {
        Self {
            status,
            waiter_id: None,
            guest_count: None,
            reservation_name: None,
            reservation_phone: None,
            reservation_time: None,
        }
    }
}

/// Table list filter (query string)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    pub status: Option<TableStatus>,
    pub floor: Option<i32>,
}
