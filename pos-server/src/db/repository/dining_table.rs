//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableQuery};
use sqlx::SqlitePool;

const TABLE_COLUMNS: &str = "id, number, capacity, floor, status, waiter_id, guest_count, \
     reservation_name, reservation_phone, reservation_time, created_at, updated_at";

fn duplicate_number(err: sqlx::Error, number: Option<i32>) -> RepoError {
    match RepoError::from(err) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "Table number {} already exists",
            number.map(|n| n.to_string()).unwrap_or_default()
        )),
        other => other,
    }
}

/// Find tables, ordered by floor then number
pub async fn find_all(pool: &SqlitePool, filter: &TableQuery) -> RepoResult<Vec<DiningTable>> {
    let sql = format!(
        "SELECT {TABLE_COLUMNS} FROM dining_tables \
         WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR floor = ?2) \
         ORDER BY floor, number"
    );
    let tables = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.floor)
        .fetch_all(pool)
        .await?;
    Ok(tables)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let sql = format!("SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = ?");
    let table = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(table)
}

/// Create a new table; it starts `available`
pub async fn create(pool: &SqlitePool, data: &DiningTableCreate) -> RepoResult<DiningTable> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO dining_tables (id, number, capacity, floor, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 'available', ?, ?)",
    )
    .bind(id)
    .bind(data.number)
    .bind(data.capacity)
    .bind(data.floor)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| duplicate_number(e, Some(data.number)))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
}

/// Update layout fields (number / capacity / floor)
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &DiningTableUpdate,
) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_tables SET \
            number = COALESCE(?1, number), \
            capacity = COALESCE(?2, capacity), \
            floor = COALESCE(?3, floor), \
            updated_at = ?4 \
         WHERE id = ?5",
    )
    .bind(data.number)
    .bind(data.capacity)
    .bind(data.floor)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| duplicate_number(e, data.number))?
    .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("Dining table {} not found", id)));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
}

/// Persist the status fields of an already validated table
pub async fn save_status(pool: &SqlitePool, table: &DiningTable) -> RepoResult<DiningTable> {
    let rows = sqlx::query(
        "UPDATE dining_tables SET \
            status = ?, waiter_id = ?, guest_count = ?, \
            reservation_name = ?, reservation_phone = ?, reservation_time = ?, \
            updated_at = ? \
         WHERE id = ?",
    )
    .bind(table.status.as_str())
    .bind(table.waiter_id)
    .bind(table.guest_count)
    .bind(table.reservation_name.as_deref())
    .bind(table.reservation_phone.as_deref())
    .bind(table.reservation_time)
    .bind(table.updated_at)
    .bind(table.id)
    .execute(pool)
    .await?
    .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!(
            "Dining table {} not found",
            table.id
        )));
    }
    Ok(table.clone())
}
