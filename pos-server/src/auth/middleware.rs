//! 认证中间件
//!
//! 为 JWT 认证和角色授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::ErrorCode;
use shared::models::Role;

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;

/// 不需要认证的 API 路由
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login", "/api/health"];

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/auth/login`, `/api/health`
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
/// | 账号已停用 | 401 AccountDisabled |
/// | 账号不存在 | 401 SessionExpired |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") || PUBLIC_API_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    let user = authenticate(&state.jwt_service, token, req.uri())?;
    ensure_account_active(&state, &user).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 验证令牌并解析当前用户 (中间件与提取器共用)
pub(crate) fn authenticate(
    jwt_service: &JwtService,
    token: &str,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let claims = jwt_service.validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", uri)
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))
}

/// 令牌有效期内账号可能已被停用或删除，每个请求都回库确认
async fn ensure_account_active(state: &ServerState, current: &CurrentUser) -> Result<(), AppError> {
    match user::is_active(&state.pool, current.id).await? {
        Some(true) => Ok(()),
        Some(false) => {
            security_log!("WARN", "auth_disabled_account", user_id = current.id);
            Err(AppError::new(ErrorCode::AccountDisabled))
        }
        None => {
            security_log!("WARN", "auth_unknown_account", user_id = current.id);
            Err(AppError::new(ErrorCode::SessionExpired))
        }
    }
}

/// 角色检查中间件 - 要求用户角色在允许列表中
///
/// 空列表表示任意已登录用户。
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// use shared::models::MANAGEMENT_ROLES;
/// Router::new()
///     .route("/", post(handler::create))
///     .layer(middleware::from_fn(require_role(MANAGEMENT_ROLES)));
/// ```
///
/// # 错误
///
/// 角色不符返回 403 Forbidden
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_role(allowed) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = user.id,
                    user_role = user.role.as_str(),
                    path = req.uri().path().to_string()
                );
                return Err(AppError::forbidden(format!(
                    "Role '{}' may not access this resource",
                    user.role
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
