//! 厨房显示 API
//!
//! 客户端按响应中的 `pollIntervalSecs` 轮询；服务端为唯一数据源，
//! 每次拉取的最新状态即为准。

use axum::{Json, Router, extract::State, middleware, routing::get};
use shared::client::KitchenQueueResponse;
use shared::models::SERVICE_ROLES;

use crate::auth::require_role;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/kitchen",
        Router::new()
            .route("/orders", get(queue))
            .layer(middleware::from_fn(require_role(SERVICE_ROLES))),
    )
}

/// GET /api/kitchen/orders - 待制作订单 (new / in_progress / done，按下单时间升序)
async fn queue(State(state): State<ServerState>) -> AppResult<Json<KitchenQueueResponse>> {
    let orders = order::find_kitchen_queue(&state.pool).await?;
    Ok(Json(KitchenQueueResponse {
        orders,
        poll_interval_secs: state.config.kitchen_poll_interval_secs,
    }))
}
