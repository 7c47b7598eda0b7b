//! Payment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::client::{PaymentListResponse, PaymentResponse};
use shared::models::PaymentQuery;
use shared::{AppError, ErrorCode};

use crate::core::ServerState;
use crate::db::repository::payment::{self, PaymentFilter};
use crate::utils::AppResult;
use crate::utils::time::optional_range;

/// GET /api/payments - 支付记录 (订单 / 日期过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PaymentQuery>,
) -> AppResult<Json<PaymentListResponse>> {
    let (created_from, created_to) = optional_range(
        query.from.as_deref(),
        query.to.as_deref(),
        state.config.business_timezone,
    )?;
    let filter = PaymentFilter {
        order_id: query.order_id,
        created_from,
        created_to,
    };
    let payments = payment::find_all(&state.pool, &filter).await?;
    Ok(Json(PaymentListResponse { payments }))
}

/// GET /api/payments/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PaymentResponse>> {
    let payment = payment::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::PaymentNotFound, format!("Payment {} not found", id))
    })?;
    Ok(Json(PaymentResponse { payment }))
}
