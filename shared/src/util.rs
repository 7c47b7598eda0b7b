/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at POS scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Placeholder shown for timestamps that cannot be parsed or formatted.
pub const INVALID_DATE: &str = "Invalid date";

/// Format an RFC 3339 / ISO-8601 string for display, e.g. `Mar 5, 2025 7:30 PM`.
///
/// Malformed input yields [`INVALID_DATE`] instead of an error.
pub fn display_date(value: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return dt.format("%b %-d, %Y %-I:%M %p").to_string();
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    INVALID_DATE.to_string()
}

/// Format Unix millis (UTC) for display; out-of-range values yield [`INVALID_DATE`].
pub fn display_millis(millis: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%b %-d, %Y %-I:%M %p").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_are_positive_and_ordered_by_time() {
        let a = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > a);
    }

    #[test]
    fn display_date_formats_valid_input() {
        assert_eq!(display_date("2025-03-05T19:30:00Z"), "Mar 5, 2025 7:30 PM");
        assert_eq!(display_date("2025-03-05"), "Mar 5, 2025");
    }

    #[test]
    fn display_date_falls_back_on_garbage() {
        assert_eq!(display_date("not a date"), INVALID_DATE);
        assert_eq!(display_date(""), INVALID_DATE);
        assert_eq!(display_date("2025-13-40"), INVALID_DATE);
        assert_eq!(display_millis(i64::MAX), INVALID_DATE);
    }
}
