//! 报表
//!
//! 只读聚合。handler 解析日期区间 (业务时区)，这里负责加载记录，
//! 再交给 [`aggregate`] 中的纯函数折叠。

pub mod aggregate;

use chrono_tz::Tz;
use shared::AppResult;
use shared::models::{ItemReport, OrderReport, ReportQuery, RevenueReport};
use sqlx::SqlitePool;

use crate::db::repository::order::{self, OrderFilter};
use crate::db::repository::payment::{self, PaymentFilter};
use crate::utils::time::date_range;

/// Upper bound for the item report `limit`
pub const MAX_ITEM_LIMIT: usize = 100;

/// Revenue from payments captured in range
pub async fn revenue(pool: &SqlitePool, query: &ReportQuery, tz: Tz) -> AppResult<RevenueReport> {
    let (start, end) = date_range(&query.from, &query.to, tz)?;
    let payments = payment::find_all(
        pool,
        &PaymentFilter {
            order_id: None,
            created_from: Some(start),
            created_to: Some(end),
        },
    )
    .await?;
    Ok(aggregate::revenue_report(&query.from, &query.to, &payments, tz))
}

/// Item popularity for orders created in range
pub async fn items(pool: &SqlitePool, query: &ReportQuery, tz: Tz) -> AppResult<ItemReport> {
    let (start, end) = date_range(&query.from, &query.to, tz)?;
    let orders = order::find_all(pool, &created_between(start, end)).await?;
    let limit = query.limit.map(|l| l.clamp(1, MAX_ITEM_LIMIT));
    Ok(aggregate::item_report(&query.from, &query.to, &orders, limit))
}

/// Order volume for orders created in range
pub async fn orders(pool: &SqlitePool, query: &ReportQuery, tz: Tz) -> AppResult<OrderReport> {
    let (start, end) = date_range(&query.from, &query.to, tz)?;
    let orders = order::find_all(pool, &created_between(start, end)).await?;
    Ok(aggregate::order_report(&query.from, &query.to, &orders, tz))
}

fn created_between(start: i64, end: i64) -> OrderFilter {
    OrderFilter {
        created_from: Some(start),
        created_to: Some(end),
        ..OrderFilter::default()
    }
}
