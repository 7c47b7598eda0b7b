//! Order API 模块
//!
//! | 路径 | 方法 | 角色 |
//! |------|------|------|
//! | /api/orders | GET | 任意 |
//! | /api/orders/{id} | GET | 任意 |
//! | /api/orders/{id}/totals | GET | 任意 |
//! | /api/orders | POST | waiter / manager / owner / admin |
//! | /api/orders/{id}/items | POST | waiter / manager / owner / admin |
//! | /api/orders/{id}/payments | POST | waiter / manager / owner / admin |
//! | /api/orders/{id}/status | PUT | waiter / chef / manager / owner / admin |
//! | /api/orders/{id}/items/{item_id} | PUT | waiter / chef / manager / owner / admin |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use shared::models::{ORDER_ROLES, SERVICE_ROLES};

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/totals", get(handler::totals));

    let order_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}/items", post(handler::add_item))
        .route("/{id}/payments", post(handler::capture_payment))
        .layer(middleware::from_fn(require_role(ORDER_ROLES)));

    let service_routes = Router::new()
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/items/{item_id}", put(handler::update_item))
        .layer(middleware::from_fn(require_role(SERVICE_ROLES)));

    read_routes.merge(order_routes).merge(service_routes)
}
