//! 报表 API
//!
//! | 路径 | 说明 |
//! |------|------|
//! | /api/reports/revenue | 营业额 (按支付方式 / 按日)，含小费合计 |
//! | /api/reports/items | 菜品销量排行 |
//! | /api/reports/orders | 订单量 (按状态 / 按星期)，平均客单价 |
//!
//! 区间为 `from` / `to` (YYYY-MM-DD，闭区间，业务时区)。空区间返回 `noData: true`。

use axum::{
    Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};
use shared::client::{ItemReportResponse, OrderReportResponse, ReportResponse, RevenueReportResponse};
use shared::models::{MANAGEMENT_ROLES, ReportQuery};

use crate::auth::require_role;
use crate::core::ServerState;
use crate::reports;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/reports",
        Router::new()
            .route("/revenue", get(revenue))
            .route("/items", get(items))
            .route("/orders", get(orders))
            .layer(middleware::from_fn(require_role(MANAGEMENT_ROLES))),
    )
}

async fn revenue(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<RevenueReportResponse>> {
    let report = reports::revenue(&state.pool, &query, state.config.business_timezone).await?;
    Ok(Json(ReportResponse { report }))
}

async fn items(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ItemReportResponse>> {
    let report = reports::items(&state.pool, &query, state.config.business_timezone).await?;
    Ok(Json(ReportResponse { report }))
}

async fn orders(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<OrderReportResponse>> {
    let report = reports::orders(&state.pool, &query, state.config.business_timezone).await?;
    Ok(Json(ReportResponse { report }))
}
