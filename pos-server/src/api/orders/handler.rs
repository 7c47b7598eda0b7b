//! Order API Handlers
//!
//! 状态校验在 [`crate::orders::lifecycle`]，写库由 repository 以
//! compare-and-set 完成；并发下输掉的一方得到 409 OrderStatusConflict。

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::client::{OrderListResponse, OrderResponse, TotalsResponse};
use shared::models::{
    Order, OrderCreate, OrderItemInput, OrderItemUpdate, OrderQuery, OrderStatusUpdate,
    PaymentCreate, PaymentReceipt, Role, Tip, TotalsQuery,
};
use shared::AppError;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order::{self, ItemChanges, OrderFilter};
use crate::db::repository::{RepoError, dining_table, menu_item, payment, user};
use crate::orders::{OrderError, intake, lifecycle, money};
use crate::utils::AppResult;
use crate::utils::time::optional_range;
use crate::utils::validation::{MAX_NOTE_LEN, normalize_optional_text};

async fn load(state: &ServerState, id: i64) -> Result<Order, OrderError> {
    order::find_by_id(&state.pool, id)
        .await?
        .ok_or(OrderError::OrderNotFound(id))
}

/// Lost compare-and-set → StatusConflict, row gone → OrderNotFound
fn map_write_error(err: RepoError, order_id: i64) -> OrderError {
    match err {
        RepoError::Conflict(_) => OrderError::StatusConflict(order_id),
        RepoError::NotFound(_) => OrderError::OrderNotFound(order_id),
        other => OrderError::Storage(other),
    }
}

async fn ensure_waiter(state: &ServerState, waiter_id: i64) -> Result<(), OrderError> {
    if !user::is_active_waiter(&state.pool, waiter_id).await? {
        return Err(OrderError::WaiterInvalid(waiter_id));
    }
    Ok(())
}

/// GET /api/orders - 订单列表 (状态 / 桌台 / 服务员 / 日期过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<OrderListResponse>> {
    let (created_from, created_to) = optional_range(
        query.from.as_deref(),
        query.to.as_deref(),
        state.config.business_timezone,
    )?;
    let filter = OrderFilter {
        status: query.status,
        table_id: query.table_id,
        waiter_id: query.waiter_id,
        created_from,
        created_to,
    };
    let orders = order::find_all(&state.pool, &filter).await?;
    Ok(Json(OrderListResponse { orders }))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderResponse>> {
    let order = load(&state, id).await?;
    Ok(Json(OrderResponse { order }))
}

/// POST /api/orders - 下单
///
/// 同一菜品合并为一行；菜名与价格从菜单快照。
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderResponse>> {
    let table = dining_table::find_by_id(&state.pool, payload.table_id)
        .await?
        .ok_or(OrderError::TableNotFound(payload.table_id))?;

    let ids: Vec<i64> = payload.items.iter().map(|i| i.menu_item_id).collect();
    let menu = menu_item::find_by_ids(&state.pool, &ids).await?;
    let lines = intake::resolve_lines(payload.items, &menu)?;

    let waiter_id = intake::default_waiter(payload.waiter_id, &table, &current_user);
    if let Some(waiter_id) = waiter_id {
        ensure_waiter(&state, waiter_id).await?;
    }

    let order = order::create(&state.pool, table.id, waiter_id, &lines).await?;

    tracing::info!(
        order_id = order.id,
        table_id = table.id,
        waiter_id = ?waiter_id,
        lines = order.items.len(),
        by = current_user.id,
        "Order created"
    );
    Ok(Json(OrderResponse { order }))
}

/// PUT /api/orders/{id}/status - 推进或取消订单 (不可直接设为 paid)
pub async fn update_status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<OrderResponse>> {
    let existing = load(&state, id).await?;
    lifecycle::validate_status_change(id, existing.status, payload.status)?;

    let order = order::update_status(&state.pool, id, existing.status, payload.status)
        .await
        .map_err(|e| map_write_error(e, id))?;

    tracing::info!(
        order_id = id,
        from = %existing.status,
        to = %order.status,
        by = current_user.id,
        role = %current_user.role,
        "Order status changed"
    );
    Ok(Json(OrderResponse { order }))
}

/// POST /api/orders/{id}/items - 加菜
///
/// 订单已有该菜品时累加数量，不新增行。
pub async fn add_item(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderItemInput>,
) -> AppResult<Json<OrderResponse>> {
    let existing = load(&state, id).await?;
    lifecycle::ensure_editable(id, existing.status)?;

    let menu_item = menu_item::find_by_id(&state.pool, payload.menu_item_id)
        .await?
        .ok_or(OrderError::MenuItemNotFound(payload.menu_item_id))?;
    let line = intake::snapshot_line(&menu_item, payload.quantity, payload.notes)?;

    if let Some(current) = existing.line_for(line.menu_item_id) {
        money::validate_quantity(current.quantity.saturating_add(line.quantity))?;
    }

    let order = order::add_item(&state.pool, id, existing.status, &line)
        .await
        .map_err(|e| map_write_error(e, id))?;

    tracing::info!(
        order_id = id,
        menu_item_id = line.menu_item_id,
        quantity = line.quantity,
        by = current_user.id,
        "Order item added"
    );
    Ok(Json(OrderResponse { order }))
}

/// PUT /api/orders/{id}/items/{item_id} - 修改明细 (数量 / 备注 / 制作状态)
///
/// 厨房 (chef) 只能推进制作状态。
pub async fn update_item(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path((id, item_id)): Path<(i64, i64)>,
    Json(payload): Json<OrderItemUpdate>,
) -> AppResult<Json<OrderResponse>> {
    if current_user.role == Role::Chef && (payload.quantity.is_some() || payload.notes.is_some()) {
        return Err(AppError::forbidden("Kitchen staff may only change preparation status"));
    }

    let existing = load(&state, id).await?;
    lifecycle::ensure_editable(id, existing.status)?;
    let item = existing
        .items
        .iter()
        .find(|i| i.id == item_id)
        .ok_or(OrderError::ItemNotFound(item_id))?;

    if let Some(quantity) = payload.quantity {
        money::validate_quantity(quantity)?;
    }
    if let Some(status) = payload.status {
        lifecycle::validate_item_transition(item.status, status)?;
    }
    let notes = normalize_optional_text(payload.notes, "notes", MAX_NOTE_LEN)?;

    let changes = ItemChanges {
        quantity: payload.quantity,
        notes,
        status: payload.status,
    };
    let order = order::update_item(&state.pool, id, item_id, existing.status, &changes)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => OrderError::ItemNotFound(item_id),
            other => map_write_error(other, id),
        })?;

    if let Some(status) = changes.status {
        tracing::info!(order_id = id, item_id, status = %status, by = current_user.id, "Order item status changed");
    }
    Ok(Json(OrderResponse { order }))
}

/// GET /api/orders/{id}/totals - 小计 / 税 / 小费 / 合计
///
/// `tipPercent` 仅限预设值 (0 / 15 / 20)，`tipAmount` 为固定金额，二者互斥。
pub async fn totals(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<TotalsQuery>,
) -> AppResult<Json<TotalsResponse>> {
    let tip = match (query.tip_percent, query.tip_amount) {
        (Some(_), Some(_)) => {
            return Err(AppError::validation("Provide either tipPercent or tipAmount, not both"));
        }
        (Some(percent), None) => Tip::Preset(percent),
        (None, Some(amount)) => Tip::Amount(amount),
        (None, None) => Tip::Preset(0),
    };

    let order = load(&state, id).await?;
    let totals = money::compute_totals(&order.items, state.config.tax_rate, tip)?;
    Ok(Json(TotalsResponse { totals }))
}

/// POST /api/orders/{id}/payments - 收款
///
/// 仅限 delivered 订单；支付记录写入与 `delivered → paid` 在同一事务内完成。
pub async fn capture_payment(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<Json<PaymentReceipt>> {
    let existing = load(&state, id).await?;
    lifecycle::validate_payment_capture(id, existing.status)?;
    money::validate_payment(payload.amount, payload.tip)?;

    let payment = payment::record(&state.pool, id, &payload, Some(current_user.id))
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => OrderError::PaymentAlreadyRecorded(id),
            other => map_write_error(other, id),
        })?;
    let order = load(&state, id).await?;

    tracing::info!(
        order_id = id,
        payment_id = payment.id,
        amount = %payment.amount,
        tip = %payment.tip,
        method = %payment.method,
        by = current_user.id,
        "Payment captured, order paid"
    );
    Ok(Json(PaymentReceipt { payment, order }))
}
