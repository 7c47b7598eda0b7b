//! Report Models
//!
//! Read-only aggregations over a date range. Every report carries `no_data`
//! so an empty range renders as an explicit empty state instead of an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderStatus, PaymentMethod};

/// Report date range (query string, `YYYY-MM-DD`, both ends inclusive)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub from: String,
    pub to: String,
    /// Only used by the item report
    pub limit: Option<usize>,
}

/// Revenue for one payment method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRevenue {
    pub method: PaymentMethod,
    pub payments: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tips: Decimal,
}

/// Revenue for one calendar day (business timezone)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    /// `YYYY-MM-DD`
    pub date: String,
    pub payments: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tips: Decimal,
}

/// Revenue report (营业额)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub from: String,
    pub to: String,
    /// Sum of payment amounts, tips excluded
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_tips: Decimal,
    pub by_method: Vec<MethodRevenue>,
    pub by_day: Vec<DailyRevenue>,
    pub no_data: bool,
}

/// Sales volume for one menu item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFrequency {
    pub menu_item_id: i64,
    pub name: String,
    /// Units ordered
    pub quantity: u32,
    /// Distinct orders containing the item
    pub orders: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// Item popularity report, ranked by order count, then units, then name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReport {
    pub from: String,
    pub to: String,
    pub items: Vec<ItemFrequency>,
    pub no_data: bool,
}

/// Order count for one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u32,
}

/// Order count for one day of the week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayCount {
    /// `Mon` .. `Sun`
    pub weekday: String,
    pub count: u32,
}

/// Order volume report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub from: String,
    pub to: String,
    pub total_orders: u32,
    pub by_status: Vec<StatusCount>,
    pub by_weekday: Vec<WeekdayCount>,
    /// Mean subtotal of paid orders
    #[serde(with = "rust_decimal::serde::float")]
    pub average_order_value: Decimal,
    pub no_data: bool,
}
