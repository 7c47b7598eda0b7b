//! Order Repository
//!
//! Orders and their lines live in two tables; reads assemble them back into
//! [`Order`]. Status writes are compare-and-set on the expected status so two
//! racing transitions cannot both succeed.

use std::collections::HashMap;

use super::{RepoError, RepoResult};
use crate::orders::intake::NewLine;
use crate::orders::money::{from_cents, to_cents};
use shared::models::{ItemStatus, Order, OrderItem, OrderStatus};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const ORDER_COLUMNS: &str = "id, table_id, waiter_id, status, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "id, order_id, menu_item_id, name, price_cents, quantity, notes, status";

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    table_id: i64,
    waiter_id: Option<i64>,
    status: OrderStatus,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    menu_item_id: i64,
    name: String,
    price_cents: i64,
    quantity: i32,
    notes: Option<String>,
    status: ItemStatus,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            menu_item_id: row.menu_item_id,
            name: row.name,
            price: from_cents(row.price_cents),
            quantity: row.quantity,
            notes: row.notes,
            status: row.status,
        }
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            table_id: self.table_id,
            waiter_id: self.waiter_id,
            status: self.status,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Order list filter; `created_from` / `created_to` are inclusive Unix millis
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
    pub waiter_id: Option<i64>,
    pub created_from: Option<i64>,
    pub created_to: Option<i64>,
}

/// Attach lines (in position order) to a batch of order rows
async fn assemble(pool: &SqlitePool, rows: Vec<OrderRow>) -> RepoResult<Vec<Order>> {
    if rows.is_empty() {
        return Ok(vec![]);
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id IN ("
    ));
    let mut separated = qb.separated(", ");
    for row in &rows {
        separated.push_bind(row.id);
    }
    separated.push_unseparated(") ORDER BY order_id, position");
    let item_rows = qb.build_query_as::<OrderItemRow>().fetch_all(pool).await?;

    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in item_rows {
        by_order.entry(item.order_id).or_default().push(item.into());
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let items = by_order.remove(&row.id).unwrap_or_default();
            row.into_order(items)
        })
        .collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) => Ok(assemble(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Find orders, newest first
pub async fn find_all(pool: &SqlitePool, filter: &OrderFilter) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders \
         WHERE (?1 IS NULL OR status = ?1) \
           AND (?2 IS NULL OR table_id = ?2) \
           AND (?3 IS NULL OR waiter_id = ?3) \
           AND (?4 IS NULL OR created_at >= ?4) \
           AND (?5 IS NULL OR created_at <= ?5) \
         ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.table_id)
        .bind(filter.waiter_id)
        .bind(filter.created_from)
        .bind(filter.created_to)
        .fetch_all(pool)
        .await?;
    assemble(pool, rows).await
}

/// Orders the kitchen still has to work on, oldest first
pub async fn find_kitchen_queue(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders \
         WHERE status IN ('new', 'in_progress', 'done') \
         ORDER BY created_at ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, OrderRow>(&sql).fetch_all(pool).await?;
    assemble(pool, rows).await
}

/// Insert an order with its (already merged) lines in one transaction
pub async fn create(
    pool: &SqlitePool,
    table_id: i64,
    waiter_id: Option<i64>,
    lines: &[NewLine],
) -> RepoResult<Order> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO orders (id, table_id, waiter_id, status, created_at, updated_at) \
         VALUES (?, ?, ?, 'new', ?, ?)",
    )
    .bind(id)
    .bind(table_id)
    .bind(waiter_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for (position, line) in lines.iter().enumerate() {
        sqlx::query(
            "INSERT INTO order_items \
                (id, order_id, menu_item_id, name, price_cents, quantity, notes, status, position) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 'pending', ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(line.menu_item_id)
        .bind(&line.name)
        .bind(to_cents(line.price))
        .bind(line.quantity)
        .bind(line.notes.as_deref())
        .bind(position as i64 + 1)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
}

/// Move the order to `next` (or just bump `updated_at`) only if it is still in `expected`
pub(crate) async fn touch_if_status(
    tx: &mut sqlx::SqliteConnection,
    id: i64,
    expected: OrderStatus,
    next: OrderStatus,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
        .bind(next.as_str())
        .bind(now)
        .bind(id)
        .bind(expected.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::Conflict(format!(
            "Order {} is no longer {}",
            id, expected
        )));
    }
    Ok(())
}

/// Compare-and-set status change
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    expected: OrderStatus,
    next: OrderStatus,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    touch_if_status(&mut *tx, id, expected, next, now).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
}

/// Append a line, or add to the quantity of the existing line for the same menu item
pub async fn add_item(
    pool: &SqlitePool,
    order_id: i64,
    expected: OrderStatus,
    line: &NewLine,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    touch_if_status(&mut *tx, order_id, expected, expected, now).await?;

    sqlx::query(
        "INSERT INTO order_items \
            (id, order_id, menu_item_id, name, price_cents, quantity, notes, status, position) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', \
                 (SELECT COALESCE(MAX(position), 0) + 1 FROM order_items WHERE order_id = ?2)) \
         ON CONFLICT (order_id, menu_item_id) DO UPDATE SET \
            quantity = order_items.quantity + excluded.quantity, \
            notes = COALESCE(order_items.notes, excluded.notes)",
    )
    .bind(shared::util::snowflake_id())
    .bind(order_id)
    .bind(line.menu_item_id)
    .bind(&line.name)
    .bind(to_cents(line.price))
    .bind(line.quantity)
    .bind(line.notes.as_deref())
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
}

/// Line changes for [`update_item`]; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub quantity: Option<i32>,
    pub notes: Option<String>,
    pub status: Option<ItemStatus>,
}

pub async fn update_item(
    pool: &SqlitePool,
    order_id: i64,
    item_id: i64,
    expected: OrderStatus,
    changes: &ItemChanges,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    touch_if_status(&mut *tx, order_id, expected, expected, now).await?;

    let rows = sqlx::query(
        "UPDATE order_items SET \
            quantity = COALESCE(?1, quantity), \
            notes = COALESCE(?2, notes), \
            status = COALESCE(?3, status) \
         WHERE id = ?4 AND order_id = ?5",
    )
    .bind(changes.quantity)
    .bind(changes.notes.as_deref())
    .bind(changes.status.map(|s| s.as_str()))
    .bind(item_id)
    .bind(order_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(format!(
            "Order item {} not found",
            item_id
        )));
    }
    tx.commit().await?;

    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
}
