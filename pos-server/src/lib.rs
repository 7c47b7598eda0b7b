//! POS Server - 餐厅点餐收银服务
//!
//! # 架构概述
//!
//! 单进程 HTTP 服务，嵌入式 SQLite 存储，服务端为唯一数据源：
//!
//! - **认证** (`auth`): JWT + Argon2，按角色授权
//! - **桌台** (`tables`): 桌台状态机 (空闲 / 占用 / 预订 / 清洁)
//! - **订单** (`orders`): 订单状态机、菜品快照、金额计算
//! - **报表** (`reports`): 营业额、菜品销量、订单量
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务
//! ├── auth/          # JWT 认证、角色检查
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由与中间件装配
//! ├── middleware/    # 请求日志
//! ├── db/            # 连接池、迁移、仓储
//! ├── tables/        # 桌台规则
//! ├── orders/        # 订单规则与金额
//! ├── reports/       # 报表聚合
//! └── utils/         # 日志、时间、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod reports;
pub mod routes;
pub mod tables;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerError, ServerState};
pub use routes::{build_app, build_router};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境
///
/// 1. 读取 `.env` (不存在时忽略)
/// 2. 按 `LOG_LEVEL` / `LOG_DIR` 初始化日志
pub fn setup_environment() -> Result<Config, ServerError> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(ServerError::Config(format!("Failed to read .env: {e}")));
    }

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
