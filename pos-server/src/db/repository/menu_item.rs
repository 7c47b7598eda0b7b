//! Menu Item Repository

use super::{RepoError, RepoResult};
use crate::orders::money::{from_cents, to_cents};
use shared::models::{MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate, MenuQuery};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const MENU_COLUMNS: &str =
    "id, name, description, price_cents, category, available, special, created_at, updated_at";

/// Storage row: price kept as integer cents
#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: i64,
    name: String,
    description: Option<String>,
    price_cents: i64,
    category: MenuCategory,
    available: bool,
    special: bool,
    created_at: i64,
    updated_at: i64,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: from_cents(row.price_cents),
            category: row.category,
            available: row.available,
            special: row.special,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Find menu items, grouped by category then name
pub async fn find_all(pool: &SqlitePool, filter: &MenuQuery) -> RepoResult<Vec<MenuItem>> {
    let sql = format!(
        "SELECT {MENU_COLUMNS} FROM menu_items \
         WHERE (?1 IS NULL OR category = ?1) AND (?2 IS NULL OR available = ?2) \
         ORDER BY category, name COLLATE NOCASE, id"
    );
    let rows = sqlx::query_as::<_, MenuItemRow>(&sql)
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.available)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE id = ?");
    let row = sqlx::query_as::<_, MenuItemRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(MenuItem::from))
}

/// Batch lookup; missing ids are simply absent from the result
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<MenuItem>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut qb: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE id IN ("));
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
    let rows = qb.build_query_as::<MenuItemRow>().fetch_all(pool).await?;
    Ok(rows.into_iter().map(MenuItem::from).collect())
}

/// Create a menu item; price must already be validated
pub async fn create(pool: &SqlitePool, data: &MenuItemCreate) -> RepoResult<MenuItem> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO menu_items \
            (id, name, description, price_cents, category, available, special, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.description.as_deref())
    .bind(to_cents(data.price))
    .bind(data.category.as_str())
    .bind(data.available.unwrap_or(true))
    .bind(data.special.unwrap_or(false))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
}

/// Partial update. Existing orders keep their snapshots.
pub async fn update(pool: &SqlitePool, id: i64, data: &MenuItemUpdate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE menu_items SET \
            name = COALESCE(?1, name), \
            description = COALESCE(?2, description), \
            price_cents = COALESCE(?3, price_cents), \
            category = COALESCE(?4, category), \
            available = COALESCE(?5, available), \
            special = COALESCE(?6, special), \
            updated_at = ?7 \
         WHERE id = ?8",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.description.as_deref())
    .bind(data.price.map(to_cents))
    .bind(data.category.map(|c| c.as_str()))
    .bind(data.available)
    .bind(data.special)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("Menu item {} not found", id)));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
}

/// Hard delete. Order lines reference menu items by id only and keep their snapshot.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows > 0)
}
