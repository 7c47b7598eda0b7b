use std::sync::Arc;

use shared::models::Role;
use sqlx::SqlitePool;

use crate::auth::{JwtService, password};
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::user;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池句柄实现浅拷贝，clone 成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库 (连接池 + 迁移)
    /// 2. JWT 服务
    /// 3. 初始管理员账号 (仅空库)
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db.pool, jwt_service);
        state.bootstrap_admin().await?;
        Ok(state)
    }

    /// 空库时根据 ADMIN_EMAIL / ADMIN_PASSWORD 创建管理员
    async fn bootstrap_admin(&self) -> Result<()> {
        let (Some(email), Some(pass)) = (&self.config.admin_email, &self.config.admin_password)
        else {
            return Ok(());
        };

        let count = user::count(&self.pool)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        if count > 0 {
            return Ok(());
        }

        let hash = password::hash_password(pass)
            .map_err(|e| ServerError::Config(format!("Failed to hash admin password: {e}")))?;
        let admin = user::create(&self.pool, "Administrator", email, &hash, Role::Admin)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        tracing::info!(user_id = admin.id, email = %admin.email, "Bootstrap admin account created");
        Ok(())
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
