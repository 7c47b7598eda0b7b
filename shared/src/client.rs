//! Client-related types shared between server and client
//!
//! Request/response envelopes used in API communication. Every success body
//! wraps its payload in a field named after the resource (`{ "tables": [...] }`).

use serde::{Deserialize, Serialize};

use crate::models::{
    DiningTable, ItemReport, MenuItem, Order, OrderReport, OrderTotals, Payment, RevenueReport,
    Role, User,
};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request; `role` is an optional hint that must match the account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// `{ user }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

/// `{ staff }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffListResponse {
    pub staff: Vec<User>,
}

// =============================================================================
// Resource envelopes
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableListResponse {
    pub tables: Vec<DiningTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableResponse {
    pub table: DiningTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuListResponse {
    pub menu_items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub menu_item: MenuItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsResponse {
    pub totals: OrderTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment: Payment,
}

/// Kitchen display queue plus the refresh interval clients should poll at
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenQueueResponse {
    pub orders: Vec<Order>,
    pub poll_interval_secs: u64,
}

/// `{ report }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse<T> {
    pub report: T,
}

pub type RevenueReportResponse = ReportResponse<RevenueReport>;
pub type ItemReportResponse = ReportResponse<ItemReport>;
pub type OrderReportResponse = ReportResponse<OrderReport>;
