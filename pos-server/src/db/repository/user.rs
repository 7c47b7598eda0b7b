//! Staff User Repository

use super::{RepoError, RepoResult};
use shared::models::{Role, User};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, name, email, role, active, created_at, updated_at";

/// User row together with its password hash (login only)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Field changes for [`update`]; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// List staff, optionally filtered by role and active flag
pub async fn find_all(
    pool: &SqlitePool,
    role: Option<Role>,
    active: Option<bool>,
) -> RepoResult<Vec<User>> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users \
         WHERE (?1 IS NULL OR role = ?1) AND (?2 IS NULL OR active = ?2) \
         ORDER BY name COLLATE NOCASE, id"
    );
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(role.map(|r| r.as_str()))
        .bind(active)
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Email lookup is case-insensitive (column collation)
pub async fn find_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> RepoResult<Option<UserCredentials>> {
    let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ? LIMIT 1");
    let creds = sqlx::query_as::<_, UserCredentials>(&sql)
        .bind(email.trim())
        .fetch_optional(pool)
        .await?;
    Ok(creds)
}

/// Create an active staff account; `password_hash` must already be hashed
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(email.trim())
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Email '{}' already exists", email)),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
}

/// Partial update; returns the stored row afterwards
pub async fn update(pool: &SqlitePool, id: i64, changes: UserChanges) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let email = changes.email.as_deref().map(str::trim);
    let rows = sqlx::query(
        "UPDATE users SET \
            name = COALESCE(?1, name), \
            email = COALESCE(?2, email), \
            password_hash = COALESCE(?3, password_hash), \
            role = COALESCE(?4, role), \
            active = COALESCE(?5, active), \
            updated_at = ?6 \
         WHERE id = ?7",
    )
    .bind(changes.name.as_deref())
    .bind(email)
    .bind(changes.password_hash.as_deref())
    .bind(changes.role.map(|r| r.as_str()))
    .bind(changes.active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Email '{}' already exists", email.unwrap_or_default()))
        }
        other => other,
    })?
    .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("User {} not found", id)));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
}

/// Active flag of an account, `None` when the account does not exist
pub async fn is_active(pool: &SqlitePool, id: i64) -> RepoResult<Option<bool>> {
    let active = sqlx::query_scalar::<_, bool>("SELECT active FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(active)
}

/// True when `id` is an active waiter (the only role that may hold a table)
pub async fn is_active_waiter(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE id = ? AND role = 'waiter' AND active = 1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(found > 0)
}
