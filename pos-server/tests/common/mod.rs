//! 集成测试公共工具
//!
//! 内存数据库 + 完整中间件栈，通过 oneshot 直接调用 Router。

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use pos_server::auth::password;
use pos_server::db::repository::user;
use pos_server::{Config, ServerState, build_app};
use rust_decimal::Decimal;
use serde_json::Value;
use shared::models::{Role, User};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-42";

/// One seeded account plus a ready-to-use bearer token
pub struct Staff {
    pub user: User,
    pub token: String,
}

pub struct TestApp {
    pub state: ServerState,
    router: Router,
    password_hash: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut config = Config::in_memory();
        config.tax_rate = Decimal::new(85, 3);
        config.business_timezone = chrono_tz::Tz::UTC;

        let state = ServerState::initialize(&config)
            .await
            .expect("failed to initialize state");
        let router = build_app(&state);
        let password_hash = password::hash_password(PASSWORD).expect("hash");

        Self {
            state,
            router,
            password_hash,
        }
    }

    /// Insert an account directly and mint a token for it
    pub async fn staff(&self, name: &str, role: Role) -> Staff {
        let email = format!("{}@pos.test", name.to_lowercase().replace(' ', "."));
        let user = user::create(&self.state.pool, name, &email, &self.password_hash, role)
            .await
            .expect("seed user");
        let token = self
            .state
            .get_jwt_service()
            .generate_token(user.id, &user.name, user.role)
            .expect("token");
        Staff { user, token }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    /// Create a table through the API and return its id
    pub async fn table(&self, admin: &Staff, number: i32, capacity: i32) -> i64 {
        let (status, body) = self
            .post(
                "/api/tables",
                &admin.token,
                serde_json::json!({ "number": number, "capacity": capacity, "floor": 1 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create table: {body}");
        body["table"]["id"].as_i64().expect("table id")
    }

    /// Create a menu item through the API and return its id
    pub async fn menu_item(&self, admin: &Staff, name: &str, price: f64) -> i64 {
        let (status, body) = self
            .post(
                "/api/menu",
                &admin.token,
                serde_json::json!({ "name": name, "price": price, "category": "main_course" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create menu item: {body}");
        body["menuItem"]["id"].as_i64().expect("menu item id")
    }
}

/// Error code carried in an error body
pub fn error_code(body: &Value) -> u64 {
    body["code"].as_u64().unwrap_or_default()
}
