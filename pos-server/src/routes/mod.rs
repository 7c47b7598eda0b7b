//! 路由装配
//!
//! [`build_router`] 只注册路由；[`build_app`] 再套上中间件与状态，
//! HTTP 服务和集成测试 (oneshot) 共用同一个入口。

use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::auth::require_auth;
use crate::core::ServerState;
use crate::middleware::logging_middleware;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Requests still running after `timeout_ms` are answered with 408
fn timeout_layer(timeout_ms: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_millis(timeout_ms))
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Public
        .merge(api::health::router())
        .merge(api::auth::router())
        // Floor & kitchen
        .merge(api::tables::router())
        .merge(api::menu::router())
        .merge(api::orders::router())
        .merge(api::kitchen::router())
        // Back office
        .merge(api::payments::router())
        .merge(api::staff::router())
        .merge(api::reports::router())
}

/// Build the application with middleware and state applied
///
/// Layers run outermost first: request id → CORS → compression → timeout →
/// trace → JWT → request log → handler.
pub fn build_app(state: &ServerState) -> Router {
    build_router()
        // Request log - 在认证之后执行，可以记录 CurrentUser
        .layer(axum_middleware::from_fn(logging_middleware))
        // JWT 认证 - 注入 CurrentUser，公共路由跳过
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(timeout_layer(state.config.request_timeout_ms))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .with_state(state.clone())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::routing::get;
    use http::Request;
    use tower::ServiceExt;

    use super::*;

    async fn call(router: Router, uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        router.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn slow_handlers_time_out_with_408() {
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .route("/fast", get(|| async { "ok" }))
            .layer(timeout_layer(20));

        assert_eq!(call(router.clone(), "/slow").await, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(call(router, "/fast").await, StatusCode::OK);
    }
}
