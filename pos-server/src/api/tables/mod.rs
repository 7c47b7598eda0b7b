//! Dining Table API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use shared::models::{FLOOR_ROLES, MANAGEMENT_ROLES};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let floor_routes = Router::new()
        .route("/{id}/status", put(handler::update_status))
        .layer(middleware::from_fn(require_role(FLOOR_ROLES)));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_role(MANAGEMENT_ROLES)));

    read_routes.merge(floor_routes).merge(manage_routes)
}
