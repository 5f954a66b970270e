// ==========================================
// 到港货柜看板 - 日期解析与相对天数
// ==========================================
// 红线: 无法解析的日期返回 None,绝不 panic
// 天数口径: round((eta - now) / 1 天),.5 向正无穷取整
// ==========================================

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// 解析时间戳
///
/// 支持:
/// - RFC 3339（带时区）
/// - 无时区的日期时间,按 UTC
/// - 纯日期 YYYY-MM-DD,按 UTC 零点
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    parse_date_only(s).and_then(|d| d.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n)))
}

fn parse_date_only(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// 日期区间下界: 纯日期 → 当天 00:00:00.000 UTC
pub fn lower_bound(raw: &str) -> Option<DateTime<Utc>> {
    match parse_date_only(raw) {
        Some(d) => d
            .and_hms_milli_opt(0, 0, 0, 0)
            .map(|n| Utc.from_utc_datetime(&n)),
        None => parse_timestamp(raw),
    }
}

/// 日期区间上界: 纯日期 → 当天 23:59:59.999 UTC
pub fn upper_bound(raw: &str) -> Option<DateTime<Utc>> {
    match parse_date_only(raw) {
        Some(d) => d
            .and_hms_milli_opt(23, 59, 59, 999)
            .map(|n| Utc.from_utc_datetime(&n)),
        None => parse_timestamp(raw),
    }
}

/// 距到港天数（四舍五入）
pub fn days_until(eta: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff_ms = (eta - now).num_milliseconds() as f64;
    round_half_up(diff_ms / MS_PER_DAY)
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// now < eta <= now + days
///
/// now + days 超出可表示范围时,上界视为无限
pub fn in_next_window(eta: DateTime<Utc>, now: DateTime<Utc>, days: i64) -> bool {
    if eta <= now {
        return false;
    }
    match Duration::try_days(days).and_then(|d| now.checked_add_signed(d)) {
        Some(limit) => eta <= limit,
        None => days > 0,
    }
}
