//! Menu API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use shared::models::MANAGEMENT_ROLES;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_role(MANAGEMENT_ROLES)));

    read_routes.merge(manage_routes)
}
