//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::client::{TableListResponse, TableResponse};
use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableQuery, TableStatus, TableStatusUpdate,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, dining_table, user};
use crate::tables::{TableError, lifecycle};
use crate::utils::AppResult;

/// Table numbers and capacities are small positive integers
const MAX_CAPACITY: i32 = 100;

async fn load(state: &ServerState, id: i64) -> Result<DiningTable, TableError> {
    dining_table::find_by_id(&state.pool, id)
        .await?
        .ok_or(TableError::NotFound(id))
}

fn map_duplicate(err: RepoError, number: Option<i32>) -> TableError {
    match (err, number) {
        (RepoError::Duplicate(_), Some(n)) => TableError::NumberExists(n),
        (err, _) => TableError::Storage(err),
    }
}

fn validate_layout(number: Option<i32>, capacity: Option<i32>, floor: Option<i32>) -> Result<(), TableError> {
    if let Some(n) = number
        && n <= 0
    {
        return Err(TableError::Invalid(format!("table number must be positive, got {}", n)));
    }
    if let Some(c) = capacity
        && !(1..=MAX_CAPACITY).contains(&c)
    {
        return Err(TableError::Invalid(format!(
            "capacity must be between 1 and {}, got {}",
            MAX_CAPACITY, c
        )));
    }
    if let Some(f) = floor
        && f < 0
    {
        return Err(TableError::Invalid(format!("floor must not be negative, got {}", f)));
    }
    Ok(())
}

/// GET /api/tables - 获取桌台 (可按状态 / 楼层过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<TableQuery>,
) -> AppResult<Json<TableListResponse>> {
    let tables = dining_table::find_all(&state.pool, &filter).await?;
    Ok(Json(TableListResponse { tables }))
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TableResponse>> {
    let table = load(&state, id).await?;
    Ok(Json(TableResponse { table }))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<TableResponse>> {
    validate_layout(Some(payload.number), Some(payload.capacity), Some(payload.floor))?;
    let table = dining_table::create(&state.pool, &payload)
        .await
        .map_err(|e| map_duplicate(e, Some(payload.number)))?;

    tracing::info!(table_id = table.id, number = table.number, "Table created");
    Ok(Json(TableResponse { table }))
}

/// PUT /api/tables/{id} - 更新桌台布局 (编号 / 容量 / 楼层)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<TableResponse>> {
    validate_layout(payload.number, payload.capacity, payload.floor)?;
    let existing = load(&state, id).await?;
    if let (Some(capacity), Some(guests)) = (payload.capacity, existing.guest_count)
        && guests > capacity
    {
        return Err(TableError::CapacityExceeded { guests, capacity }.into());
    }

    let table = dining_table::update(&state.pool, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => TableError::NotFound(id),
            other => map_duplicate(other, payload.number),
        })?;
    Ok(Json(TableResponse { table }))
}

/// PUT /api/tables/{id}/status - 变更桌台状态
///
/// 校验失败时不写库 (无部分更新)。
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<TableResponse>> {
    let existing = load(&state, id).await?;
    let next = lifecycle::apply_status_change(&existing, &payload, shared::util::now_millis())?;

    if next.status == TableStatus::Occupied
        && let Some(waiter_id) = next.waiter_id
        && !user::is_active_waiter(&state.pool, waiter_id).await?
    {
        return Err(TableError::WaiterInvalid(waiter_id).into());
    }
    debug_assert!(lifecycle::fields_consistent(&next));

    let table = dining_table::save_status(&state.pool, &next).await?;

    tracing::info!(
        table_id = table.id,
        number = table.number,
        from = %existing.status,
        to = %table.status,
        waiter_id = ?table.waiter_id,
        by = current_user.id,
        "Table status changed"
    );
    Ok(Json(TableResponse { table }))
}
