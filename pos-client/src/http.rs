//! HTTP client for the POS REST API

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::{
    DeletedResponse, HealthResponse, ItemReportResponse, KitchenQueueResponse, LoginRequest,
    LoginResponse, MenuItemResponse, MenuListResponse, OrderListResponse, OrderReportResponse,
    OrderResponse, PaymentListResponse, PaymentResponse, RevenueReportResponse,
    StaffListResponse, TableListResponse, TableResponse, TotalsResponse, UserResponse,
};
use shared::models::{
    DiningTableCreate, DiningTableUpdate, MenuItemCreate, MenuItemUpdate, MenuQuery,
    OrderCreate, OrderItemInput, OrderItemUpdate, OrderQuery, OrderStatus, OrderStatusUpdate,
    PaymentCreate, PaymentQuery, PaymentReceipt, ReportQuery, Role, StaffCreate, StaffQuery,
    StaffUpdate, TableQuery, TableStatusUpdate, Tip, User,
};
use shared::{ApiResponse, ErrorCode};

use crate::guard::ProfileSource;
use crate::kitchen::KitchenSource;
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for the POS server
///
/// Cheap to clone; clones share the connection pool but not the token.
#[derive(Debug, Clone)]
pub struct PosClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl PosClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, url);
        if let Some(token) = token.or(self.token.as_deref()) {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        }
        req
    }

    async fn send<T: DeserializeOwned>(req: RequestBuilder) -> ClientResult<T> {
        let response = req.send().await?;
        Self::handle_response(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Self::send(self.request(Method::GET, path, None)).await
    }

    async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        Self::send(self.request(Method::GET, path, None).query(query)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        Self::send(self.request(Method::POST, path, None).json(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        Self::send(self.request(Method::PUT, path, None).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Self::send(self.request(Method::DELETE, path, None)).await
    }

    /// Map non-2xx responses onto [`ClientError`]
    ///
    /// 401 always becomes [`ClientError::Unauthorized`], even when the body
    /// is not the usual error envelope.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await?;
        let parsed = serde_json::from_str::<ApiResponse>(&text)
            .ok()
            .map(ApiResponse::into_error);
        tracing::debug!(status = %status, body = %text, "API request failed");

        Err(match (status, parsed) {
            (StatusCode::UNAUTHORIZED, Some(err)) => ClientError::Unauthorized {
                code: err.code,
                message: err.message,
            },
            (StatusCode::UNAUTHORIZED, None) => ClientError::Unauthorized {
                code: ErrorCode::NotAuthenticated,
                message: text,
            },
            (StatusCode::FORBIDDEN, Some(err)) => ClientError::Forbidden(err.message),
            (StatusCode::FORBIDDEN, None) => ClientError::Forbidden(text),
            (_, Some(err)) => ClientError::Api {
                code: err.code,
                message: err.message,
                details: err.details,
            },
            (_, None) => ClientError::InvalidResponse(format!("{}: {}", status, text)),
        })
    }

    // ========== Auth API ==========

    /// Log in and keep the returned token for subsequent calls
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> ClientResult<LoginResponse> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        let resp: LoginResponse = self.post("/api/auth/login", &req).await?;
        self.token = Some(resp.token.clone());
        Ok(resp)
    }

    pub async fn me(&self) -> ClientResult<User> {
        let resp: UserResponse = self.get("/api/auth/me").await?;
        Ok(resp.user)
    }

    /// Forget the token (tokens are stateless, there is no server call)
    pub fn logout(&mut self) {
        self.token = None;
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get("/api/health").await
    }

    // ========== Tables ==========

    pub async fn list_tables(&self, query: &TableQuery) -> ClientResult<TableListResponse> {
        self.get_query("/api/tables", query).await
    }

    pub async fn get_table(&self, id: i64) -> ClientResult<TableResponse> {
        self.get(&format!("/api/tables/{}", id)).await
    }

    pub async fn create_table(&self, data: &DiningTableCreate) -> ClientResult<TableResponse> {
        self.post("/api/tables", data).await
    }

    pub async fn update_table(
        &self,
        id: i64,
        data: &DiningTableUpdate,
    ) -> ClientResult<TableResponse> {
        self.put(&format!("/api/tables/{}", id), data).await
    }

    pub async fn update_table_status(
        &self,
        id: i64,
        data: &TableStatusUpdate,
    ) -> ClientResult<TableResponse> {
        self.put(&format!("/api/tables/{}/status", id), data).await
    }

    // ========== Menu ==========

    pub async fn list_menu(&self, query: &MenuQuery) -> ClientResult<MenuListResponse> {
        self.get_query("/api/menu", query).await
    }

    pub async fn get_menu_item(&self, id: i64) -> ClientResult<MenuItemResponse> {
        self.get(&format!("/api/menu/{}", id)).await
    }

    pub async fn create_menu_item(&self, data: &MenuItemCreate) -> ClientResult<MenuItemResponse> {
        self.post("/api/menu", data).await
    }

    pub async fn update_menu_item(
        &self,
        id: i64,
        data: &MenuItemUpdate,
    ) -> ClientResult<MenuItemResponse> {
        self.put(&format!("/api/menu/{}", id), data).await
    }

    pub async fn delete_menu_item(&self, id: i64) -> ClientResult<DeletedResponse> {
        self.delete(&format!("/api/menu/{}", id)).await
    }

    // ========== Orders ==========

    pub async fn list_orders(&self, query: &OrderQuery) -> ClientResult<OrderListResponse> {
        self.get_query("/api/orders", query).await
    }

    pub async fn get_order(&self, id: i64) -> ClientResult<OrderResponse> {
        self.get(&format!("/api/orders/{}", id)).await
    }

    pub async fn create_order(&self, data: &OrderCreate) -> ClientResult<OrderResponse> {
        self.post("/api/orders", data).await
    }

    /// Advance or cancel an order; `paid` is reached through [`Self::capture_payment`]
    pub async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> ClientResult<OrderResponse> {
        self.put(
            &format!("/api/orders/{}/status", id),
            &OrderStatusUpdate { status },
        )
        .await
    }

    pub async fn add_order_item(
        &self,
        id: i64,
        item: &OrderItemInput,
    ) -> ClientResult<OrderResponse> {
        self.post(&format!("/api/orders/{}/items", id), item).await
    }

    pub async fn update_order_item(
        &self,
        id: i64,
        item_id: i64,
        data: &OrderItemUpdate,
    ) -> ClientResult<OrderResponse> {
        self.put(&format!("/api/orders/{}/items/{}", id, item_id), data)
            .await
    }

    pub async fn order_totals(&self, id: i64, tip: Tip) -> ClientResult<TotalsResponse> {
        let query: [(&str, String); 1] = match tip {
            Tip::Preset(percent) => [("tipPercent", percent.to_string())],
            Tip::Amount(amount) => [("tipAmount", amount.to_string())],
        };
        self.get_query(&format!("/api/orders/{}/totals", id), &query)
            .await
    }

    pub async fn capture_payment(
        &self,
        id: i64,
        data: &PaymentCreate,
    ) -> ClientResult<PaymentReceipt> {
        self.post(&format!("/api/orders/{}/payments", id), data).await
    }

    // ========== Payments ==========

    pub async fn list_payments(&self, query: &PaymentQuery) -> ClientResult<PaymentListResponse> {
        self.get_query("/api/payments", query).await
    }

    pub async fn get_payment(&self, id: i64) -> ClientResult<PaymentResponse> {
        self.get(&format!("/api/payments/{}", id)).await
    }

    // ========== Kitchen ==========

    pub async fn kitchen_queue(&self) -> ClientResult<KitchenQueueResponse> {
        self.get("/api/kitchen/orders").await
    }

    // ========== Staff ==========

    pub async fn list_staff(&self, query: &StaffQuery) -> ClientResult<StaffListResponse> {
        self.get_query("/api/staff", query).await
    }

    pub async fn get_staff(&self, id: i64) -> ClientResult<UserResponse> {
        self.get(&format!("/api/staff/{}", id)).await
    }

    pub async fn create_staff(&self, data: &StaffCreate) -> ClientResult<UserResponse> {
        self.post("/api/staff", data).await
    }

    pub async fn update_staff(&self, id: i64, data: &StaffUpdate) -> ClientResult<UserResponse> {
        self.put(&format!("/api/staff/{}", id), data).await
    }

    // ========== Reports ==========

    pub async fn revenue_report(&self, query: &ReportQuery) -> ClientResult<RevenueReportResponse> {
        self.get_query("/api/reports/revenue", query).await
    }

    pub async fn item_report(&self, query: &ReportQuery) -> ClientResult<ItemReportResponse> {
        self.get_query("/api/reports/items", query).await
    }

    pub async fn order_report(&self, query: &ReportQuery) -> ClientResult<OrderReportResponse> {
        self.get_query("/api/reports/orders", query).await
    }
}

#[async_trait]
impl ProfileSource for PosClient {
    async fn fetch_profile(&self, token: &str) -> ClientResult<User> {
        let resp: UserResponse =
            Self::send(self.request(Method::GET, "/api/auth/me", Some(token))).await?;
        Ok(resp.user)
    }
}

#[async_trait]
impl KitchenSource for PosClient {
    async fn fetch_queue(&self) -> ClientResult<KitchenQueueResponse> {
        self.kitchen_queue().await
    }
}
