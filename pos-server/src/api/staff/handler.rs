//! Staff API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::client::{StaffListResponse, UserResponse};
use shared::models::{StaffCreate, StaffQuery, StaffUpdate};
use shared::{AppError, ErrorCode};

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::user::{self, UserChanges};
use crate::db::repository::RepoError;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_email, validate_required_text,
};

fn staff_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::StaffNotFound, format!("Staff member {} not found", id))
        .with_detail("userId", id)
}

fn map_repo_error(err: RepoError, id: Option<i64>) -> AppError {
    match (err, id) {
        (RepoError::Duplicate(msg), _) => AppError::with_message(ErrorCode::StaffEmailExists, msg),
        (RepoError::NotFound(_), Some(id)) => staff_not_found(id),
        (other, _) => other.into(),
    }
}

/// Hash a new password after checking its length
fn hash_new_password(plain: &str) -> Result<String, AppError> {
    let len = plain.chars().count();
    if len < password::MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    password::hash_password(plain)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
}

/// GET /api/staff - 员工列表 (可按角色 / 在职过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<StaffQuery>,
) -> AppResult<Json<StaffListResponse>> {
    let staff = user::find_all(&state.pool, query.role, query.active).await?;
    Ok(Json(StaffListResponse { staff }))
}

/// GET /api/staff/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let account = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| staff_not_found(id))?;
    Ok(Json(UserResponse { user: account }))
}

/// POST /api/staff - 新增员工
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<UserResponse>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    let hash = hash_new_password(&payload.password)?;

    let account = user::create(
        &state.pool,
        payload.name.trim(),
        &payload.email,
        &hash,
        payload.role,
    )
    .await
    .map_err(|e| map_repo_error(e, None))?;

    tracing::info!(
        user_id = account.id,
        role = %account.role,
        by = current_user.id,
        "Staff member created"
    );
    Ok(Json(UserResponse { user: account }))
}

/// PUT /api/staff/{id} - 修改员工 (含停用)
///
/// 角色变更在对方下次登录后生效 (令牌内角色不变)。
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<UserResponse>> {
    if payload.active == Some(false) && id == current_user.id {
        return Err(AppError::new(ErrorCode::StaffCannotDeactivateSelf));
    }
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    let password_hash = payload
        .password
        .as_deref()
        .map(hash_new_password)
        .transpose()?;

    let changes = UserChanges {
        name: payload.name.map(|n| n.trim().to_string()),
        email: payload.email,
        password_hash,
        role: payload.role,
        active: payload.active,
    };
    let account = user::update(&state.pool, id, changes)
        .await
        .map_err(|e| map_repo_error(e, Some(id)))?;

    tracing::info!(
        user_id = account.id,
        role = %account.role,
        active = account.active,
        by = current_user.id,
        "Staff member updated"
    );
    Ok(Json(UserResponse { user: account }))
}
