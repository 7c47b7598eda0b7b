//! 桌台领域
//!
//! - [`lifecycle`] - 桌台状态机 (available / occupied / reserved)

pub mod lifecycle;

use shared::models::TableStatus;
use shared::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::repository::RepoError;

/// Table errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table not found: {0}")]
    NotFound(i64),

    #[error("Cannot move table from {from} to {to}")]
    InvalidTransition { from: TableStatus, to: TableStatus },

    #[error("An occupied table requires a waiter")]
    WaiterRequired,

    #[error("A reserved table requires a reservation name")]
    ReservationRequired,

    #[error("Guest count {guests} exceeds table capacity {capacity}")]
    CapacityExceeded { guests: i32, capacity: i32 },

    #[error("Table number {0} already exists")]
    NumberExists(i32),

    #[error("Waiter {0} is not an active waiter")]
    WaiterInvalid(i64),

    #[error("{0}")]
    Invalid(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        let message = err.to_string();
        let code = match err {
            TableError::NotFound(id) => {
                return AppError::with_message(ErrorCode::TableNotFound, message)
                    .with_detail("tableId", id);
            }
            TableError::InvalidTransition { from, to } => {
                return AppError::with_message(ErrorCode::TableInvalidTransition, message)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str());
            }
            TableError::WaiterRequired => ErrorCode::TableWaiterRequired,
            TableError::ReservationRequired => ErrorCode::TableReservationRequired,
            TableError::CapacityExceeded { .. } => ErrorCode::TableCapacityExceeded,
            TableError::NumberExists(_) => ErrorCode::TableNumberExists,
            TableError::WaiterInvalid(_) => ErrorCode::WaiterInvalid,
            TableError::Invalid(_) => ErrorCode::ValidationFailed,
            TableError::Storage(e) => return e.into(),
        };
        AppError::with_message(code, message)
    }
}

pub type TableResult<T> = Result<T, TableError>;
