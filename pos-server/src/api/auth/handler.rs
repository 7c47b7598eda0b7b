//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use shared::client::{LoginRequest, LoginResponse, UserResponse};
use shared::{AppError, ErrorCode};

use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Login handler
///
/// Unknown email, wrong password and a mismatching role hint all produce the
/// same error so accounts cannot be enumerated.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim().to_string();
    let creds = user::find_credentials_by_email(&state.pool, &email).await?;

    // Fixed delay before looking at the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let Some(creds) = creds else {
        security_log!("WARN", "login_failed", email = email.as_str(), reason = "user_not_found");
        return Err(AppError::invalid_credentials());
    };

    let password_valid = password::verify_password(&req.password, &creds.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !password_valid {
        security_log!("WARN", "login_failed", email = email.as_str(), reason = "invalid_password");
        return Err(AppError::invalid_credentials());
    }

    if let Some(hint) = req.role
        && hint != creds.user.role
    {
        security_log!(
            "WARN",
            "login_failed",
            email = email.as_str(),
            reason = "role_mismatch"
        );
        return Err(AppError::invalid_credentials());
    }

    if !creds.user.active {
        security_log!("WARN", "login_failed", email = email.as_str(), reason = "account_disabled");
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let account = creds.user;
    let token = state
        .get_jwt_service()
        .generate_token(account.id, &account.name, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = account.id,
        email = %account.email,
        role = %account.role,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        user: account,
        token,
    }))
}

/// Get current user profile
///
/// Reloads the account so a deactivated user is rejected even with a live token.
pub async fn me(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::SessionExpired))?;
    if !account.active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }
    Ok(Json(UserResponse { user: account }))
}
