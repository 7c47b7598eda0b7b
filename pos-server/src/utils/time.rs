//! 时间工具函数 - 业务时区转换
//!
//! 日期 → 时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::{AppError, AppResult};

/// 单次查询允许的最大天数
pub const MAX_RANGE_DAYS: i64 = 366;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期 00:00:00 → Unix millis (业务时区)
///
/// DST gap fallback: 本地时间不存在时按 UTC 计算。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期最后一毫秒 → Unix millis (业务时区，闭区间)
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    match date.succ_opt() {
        Some(next) => day_start_millis(next, tz) - 1,
        None => i64::MAX,
    }
}

/// 解析闭区间 `[from, to]` → `(start_millis, end_millis)`
pub fn date_range(from: &str, to: &str, tz: Tz) -> AppResult<(i64, i64)> {
    let from_date = parse_date(from)?;
    let to_date = parse_date(to)?;
    if to_date < from_date {
        return Err(AppError::validation(format!(
            "Date range end {} is before start {}",
            to_date, from_date
        )));
    }
    if (to_date - from_date).num_days() >= MAX_RANGE_DAYS {
        return Err(AppError::validation(format!(
            "Date range may span at most {} days",
            MAX_RANGE_DAYS
        )));
    }
    Ok((day_start_millis(from_date, tz), day_end_millis(to_date, tz)))
}

/// 可选区间 (列表过滤): 任一端缺省则该端不限
pub fn optional_range(
    from: Option<&str>,
    to: Option<&str>,
    tz: Tz,
) -> AppResult<(Option<i64>, Option<i64>)> {
    let start = from
        .map(|d| parse_date(d).map(|d| day_start_millis(d, tz)))
        .transpose()?;
    let end = to
        .map(|d| parse_date(d).map(|d| day_end_millis(d, tz)))
        .transpose()?;
    if let (Some(s), Some(e)) = (start, end)
        && e < s
    {
        return Err(AppError::validation("Date range end is before start"));
    }
    Ok((start, end))
}

/// Unix millis → 业务时区日期
pub fn local_date(millis: i64, tz: Tz) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz).date_naive())
}
