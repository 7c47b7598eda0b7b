//! Payment API 模块 (只读；收款走 POST /api/orders/{id}/payments)

mod handler;

use axum::{Router, middleware, routing::get};
use shared::models::MANAGEMENT_ROLES;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_role(MANAGEMENT_ROLES)))
}
