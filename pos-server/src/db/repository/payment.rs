//! Payment Repository

use super::order::touch_if_status;
use super::{RepoError, RepoResult};
use crate::orders::money::{from_cents, to_cents};
use shared::models::{OrderStatus, Payment, PaymentCreate, PaymentMethod};
use sqlx::SqlitePool;

const PAYMENT_COLUMNS: &str =
    "id, order_id, amount_cents, tip_cents, method, recorded_by, created_at";

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    order_id: i64,
    amount_cents: i64,
    tip_cents: i64,
    method: PaymentMethod,
    recorded_by: Option<i64>,
    created_at: i64,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            amount: from_cents(row.amount_cents),
            tip: from_cents(row.tip_cents),
            method: row.method,
            recorded_by: row.recorded_by,
            created_at: row.created_at,
        }
    }
}

/// Payment list filter; bounds are inclusive Unix millis
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub order_id: Option<i64>,
    pub created_from: Option<i64>,
    pub created_to: Option<i64>,
}

/// Record the payment and move the order `delivered → paid` in one transaction.
///
/// Fails with `Conflict` when the order left `delivered` concurrently and with
/// `Duplicate` when a payment already exists for it.
pub async fn record(
    pool: &SqlitePool,
    order_id: i64,
    data: &PaymentCreate,
    recorded_by: Option<i64>,
) -> RepoResult<Payment> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    touch_if_status(
        &mut *tx,
        order_id,
        OrderStatus::Delivered,
        OrderStatus::Paid,
        now,
    )
    .await?;

    sqlx::query(
        "INSERT INTO payments (id, order_id, amount_cents, tip_cents, method, recorded_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(order_id)
    .bind(to_cents(data.amount))
    .bind(to_cents(data.tip))
    .bind(data.method.as_str())
    .bind(recorded_by)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Order {} already has a payment", order_id))
        }
        other => other,
    })?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to record payment".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Payment>> {
    let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?");
    let row = sqlx::query_as::<_, PaymentRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Payment::from))
}

/// Find payments, newest first
pub async fn find_all(pool: &SqlitePool, filter: &PaymentFilter) -> RepoResult<Vec<Payment>> {
    let sql = format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments \
         WHERE (?1 IS NULL OR order_id = ?1) \
           AND (?2 IS NULL OR created_at >= ?2) \
           AND (?3 IS NULL OR created_at <= ?3) \
         ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, PaymentRow>(&sql)
        .bind(filter.order_id)
        .bind(filter.created_from)
        .bind(filter.created_to)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Payment::from).collect())
}
