//! 时间工具函数 (业务时区转换)
//!
//! Ticket timestamps are Unix millis; the business day ("today" for stats
//! and phone lookups) is midnight-to-midnight in the venue's time zone.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

const DAY_MILLIS: i64 = 86_400_000;

/// 日期 → 营业日所在日期 (业务时区)
pub fn business_date(now_ms: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(now_ms).map(|dt| dt.with_timezone(&tz).date_naive())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地零点不存在，取当天最早的有效时间；再失败则按 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of the business day containing `now_ms`
pub fn business_day_start(now_ms: i64, tz: Tz) -> i64 {
    match business_date(now_ms, tz) {
        Some(date) => day_start_millis(date, tz),
        None => now_ms - now_ms.rem_euclid(DAY_MILLIS),
    }
}

/// Parse an IANA zone name, e.g. `Asia/Seoul`
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_business_day_start_seoul() {
        let tz: Tz = chrono_tz::Asia::Seoul;
        // 2024-03-10 01:30 KST == 2024-03-09 16:30 UTC
        let now = tz
            .with_ymd_and_hms(2024, 3, 10, 1, 30, 0)
            .unwrap()
            .timestamp_millis();
        let start = business_day_start(now, tz);
        let expected = tz.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap().timestamp_millis();
        assert_eq!(start, expected);
        assert_eq!(now - start, 90 * 60_000);
    }

    #[test]
    fn test_business_day_differs_from_utc_day() {
        let seoul: Tz = chrono_tz::Asia::Seoul;
        let utc: Tz = chrono_tz::UTC;
        let now = utc.with_ymd_and_hms(2024, 3, 9, 16, 30, 0).unwrap().timestamp_millis();
        assert_ne!(business_day_start(now, seoul), business_day_start(now, utc));
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Asia/Seoul"), Some(chrono_tz::Asia::Seoul));
        assert_eq!(parse_timezone("Mars/Olympus"), None);
    }
}
