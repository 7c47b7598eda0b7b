//! 订单领域
//!
//! - [`lifecycle`] - 订单 / 明细状态机
//! - [`money`] - 金额计算 (Decimal)
//! - [`intake`] - 下单时的菜品解析与服务员分配

pub mod intake;
pub mod lifecycle;
pub mod money;

use shared::models::{ItemStatus, OrderStatus};
use shared::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::repository::RepoError;

/// Order errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Order item not found: {0}")]
    ItemNotFound(i64),

    #[error("Order {0} is already paid")]
    AlreadyPaid(i64),

    #[error("Order {0} is already cancelled")]
    AlreadyCancelled(i64),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Orders become paid only by recording a payment")]
    PaidRequiresPayment,

    #[error("Cannot move item from {from} to {to}")]
    ItemInvalidTransition { from: ItemStatus, to: ItemStatus },

    #[error("Order must contain at least one item")]
    Empty,

    #[error("{0}")]
    InvalidQuantity(String),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    InvalidPrice(String),

    #[error("{0}")]
    InvalidTip(String),

    #[error("{0}")]
    InvalidAmount(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    #[error("Menu item is not available: {0}")]
    MenuItemUnavailable(String),

    #[error("Order must be delivered before payment (currently {0})")]
    NotDelivered(OrderStatus),

    #[error("A payment was already recorded for order {0}")]
    PaymentAlreadyRecorded(i64),

    #[error("Order {0} was changed by another request")]
    StatusConflict(i64),

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Waiter {0} is not an active waiter")]
    WaiterInvalid(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        let code = match err {
            OrderError::OrderNotFound(id) => {
                return AppError::with_message(ErrorCode::OrderNotFound, message)
                    .with_detail("orderId", id);
            }
            OrderError::ItemNotFound(_) => ErrorCode::OrderItemNotFound,
            OrderError::AlreadyPaid(_) => ErrorCode::OrderAlreadyPaid,
            OrderError::AlreadyCancelled(_) => ErrorCode::OrderAlreadyCancelled,
            OrderError::InvalidTransition { from, to } => {
                return AppError::with_message(ErrorCode::OrderInvalidTransition, message)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str());
            }
            OrderError::PaidRequiresPayment => ErrorCode::OrderPaidRequiresPayment,
            OrderError::ItemInvalidTransition { .. } => ErrorCode::OrderItemInvalidTransition,
            OrderError::Empty => ErrorCode::OrderEmpty,
            OrderError::InvalidQuantity(_) => ErrorCode::OrderInvalidQuantity,
            OrderError::Invalid(_) => ErrorCode::ValidationFailed,
            OrderError::InvalidPrice(_) => ErrorCode::MenuItemInvalidPrice,
            OrderError::InvalidTip(_) => ErrorCode::InvalidTipPreset,
            OrderError::InvalidAmount(_) => ErrorCode::PaymentInvalidAmount,
            OrderError::MenuItemNotFound(_) => ErrorCode::MenuItemNotFound,
            OrderError::MenuItemUnavailable(_) => ErrorCode::MenuItemUnavailable,
            OrderError::NotDelivered(_) => ErrorCode::PaymentOrderNotDelivered,
            OrderError::PaymentAlreadyRecorded(_) => ErrorCode::PaymentAlreadyRecorded,
            OrderError::StatusConflict(_) => ErrorCode::OrderStatusConflict,
            OrderError::TableNotFound(_) => ErrorCode::TableNotFound,
            OrderError::WaiterInvalid(_) => ErrorCode::WaiterInvalid,
            OrderError::Storage(e) => return e.into(),
        };
        AppError::with_message(code, message)
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
