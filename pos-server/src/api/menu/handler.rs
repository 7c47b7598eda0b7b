//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::client::{DeletedResponse, MenuItemResponse, MenuListResponse};
use shared::models::{MenuItemCreate, MenuItemUpdate, MenuQuery};
use shared::{AppError, ErrorCode};

use crate::core::ServerState;
use crate::db::repository::{RepoError, menu_item};
use crate::orders::money::validate_price;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};

fn menu_item_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {} not found", id))
        .with_detail("menuItemId", id)
}

/// GET /api/menu - 获取菜单 (可按分类 / 是否可售过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<MenuQuery>,
) -> AppResult<Json<MenuListResponse>> {
    let menu_items = menu_item::find_all(&state.pool, &filter).await?;
    Ok(Json(MenuListResponse { menu_items }))
}

/// GET /api/menu/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItemResponse>> {
    let menu_item = menu_item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| menu_item_not_found(id))?;
    Ok(Json(MenuItemResponse { menu_item }))
}

/// POST /api/menu - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItemResponse>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_price(payload.price)?;

    let menu_item = menu_item::create(&state.pool, &payload).await?;
    tracing::info!(menu_item_id = menu_item.id, name = %menu_item.name, price = %menu_item.price, "Menu item created");
    Ok(Json(MenuItemResponse { menu_item }))
}

/// PUT /api/menu/{id} - 更新菜品
///
/// 价格变更不影响已有订单 (订单明细保存快照)。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItemResponse>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    let menu_item = menu_item::update(&state.pool, id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => menu_item_not_found(id),
            other => other.into(),
        })?;
    Ok(Json(MenuItemResponse { menu_item }))
}

/// DELETE /api/menu/{id} - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeletedResponse>> {
    let deleted = menu_item::delete(&state.pool, id).await?;
    if !deleted {
        return Err(menu_item_not_found(id));
    }
    tracing::info!(menu_item_id = id, "Menu item deleted");
    Ok(Json(DeletedResponse { deleted }))
}
