use std::str::FromStr;

use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::auth::JwtConfig;

/// 默认税率 8.5%
const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(85, 0, 0, false, 3);

/// 服务器配置 - POS 服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite:pos.db | SQLite 数据库 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TAX_RATE | 0.085 | 税率 (小数) |
/// | KITCHEN_POLL_INTERVAL_SECS | 15 | 厨房显示刷新间隔 (秒) |
/// | BUSINESS_TIMEZONE | UTC | 报表日期分组使用的业务时区 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，设置后按天滚动 |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | (无) | 空库启动时创建的管理员账号 |
///
/// JWT 相关变量见 [`JwtConfig`]。
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/pos.db TAX_RATE=0.07 cargo run -p pos-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 数据库连接串 (`sqlite:<path>` 或 `sqlite::memory:`)
    pub database_url: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | production
    pub environment: String,
    /// 税率，如 0.085
    pub tax_rate: Decimal,
    /// 厨房显示轮询间隔 (秒)，通过 `/api/kitchen/orders` 下发给客户端
    pub kitchen_poll_interval_secs: u64,
    /// 业务时区 (报表按天 / 星期分组)
    pub business_timezone: Tz,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// 初始管理员 (仅在 users 表为空时创建)
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:pos.db".into()),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            tax_rate: std::env::var("TAX_RATE")
                .ok()
                .and_then(|v| parse_tax_rate(&v))
                .unwrap_or(DEFAULT_TAX_RATE),
            kitchen_poll_interval_secs: env_parse("KITCHEN_POLL_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .unwrap_or(15),
            business_timezone: std::env::var("BUSINESS_TIMEZONE")
                .ok()
                .and_then(|tz| {
                    Tz::from_str(&tz)
                        .inspect_err(|_| {
                            tracing::warn!("Unknown BUSINESS_TIMEZONE '{}', falling back to UTC", tz)
                        })
                        .ok()
                })
                .unwrap_or(Tz::UTC),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS").unwrap_or(30000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        }
    }

    /// 使用内存数据库覆盖配置
    ///
    /// 常用于测试场景
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            admin_email: None,
            admin_password: None,
            ..Self::from_env()
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// 解析税率: 必须在 [0, 1) 区间内
fn parse_tax_rate(value: &str) -> Option<Decimal> {
    match Decimal::from_str(value.trim()) {
        Ok(rate) if rate >= Decimal::ZERO && rate < Decimal::ONE => Some(rate),
        _ => {
            tracing::warn!("Invalid TAX_RATE '{}', using default {}", value, DEFAULT_TAX_RATE);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tax_rate_is_eight_and_a_half_percent() {
        assert_eq!(DEFAULT_TAX_RATE, Decimal::from_str("0.085").unwrap());
    }

    #[test]
    fn tax_rate_parsing() {
        assert_eq!(parse_tax_rate("0.07"), Some(Decimal::from_str("0.07").unwrap()));
        assert_eq!(parse_tax_rate(" 0 "), Some(Decimal::ZERO));
        assert_eq!(parse_tax_rate("1.5"), None);
        assert_eq!(parse_tax_rate("-0.1"), None);
        assert_eq!(parse_tax_rate("abc"), None);
    }
}
