// ABOUTME: Date parsing for WXR exports.
// ABOUTME: Strict parsing of wp:*_gmt timestamps and lenient parsing of RSS pubDate text.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

/// Layout of `wp:post_modified_gmt` and the other `*_gmt` elements.
pub const WP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a WordPress GMT timestamp (`2023-05-10 12:00:00`) as UTC.
pub fn parse_wp_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), WP_TIMESTAMP_FORMAT)?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Parses a pubDate string using the formats seen in WordPress exports and
/// common RSS feeds. Returns None when nothing matches or the result is
/// WordPress's "never published" placeholder.
pub fn parse_flexible_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let parsed = DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_with_offset_formats(s))
        .or_else(|| parse_naive_formats(s))?;

    published_date(parsed)
}

/// Drops dates WordPress writes for items that were never published, such
/// as `Mon, 30 Nov -0001 00:00:00 +0000`.
pub fn published_date(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if dt.year() <= 0 {
        None
    } else {
        Some(dt)
    }
}

fn parse_with_offset_formats(s: &str) -> Option<DateTime<Utc>> {
    let formats = [
        // Single digit day: "Mon, 2 Jan 2006 15:04:05 -0700"
        "%a, %e %b %Y %H:%M:%S %z",
        // Without weekday: "02 Jan 2006 15:04:05 -0700"
        "%d %b %Y %H:%M:%S %z",
        // ISO-like compact offset: "2006-01-02T15:04:05-0700"
        "%Y-%m-%dT%H:%M:%S%z",
    ];
    formats
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive_formats(s: &str) -> Option<DateTime<Utc>> {
    // Named zones other than GMT/UTC are not used by WordPress.
    let s = s
        .strip_suffix(" GMT")
        .or_else(|| s.strip_suffix(" UTC"))
        .unwrap_or(s);
    let formats = [
        "%a, %d %b %Y %H:%M:%S",
        "%a, %e %b %Y %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        WP_TIMESTAMP_FORMAT,
    ];
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wp_timestamp_is_utc() {
        let dt = parse_wp_timestamp("2023-05-10 12:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 5, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn wp_timestamp_rejects_other_layouts() {
        assert!(parse_wp_timestamp("not-a-date").is_err());
        assert!(parse_wp_timestamp("2023-05-10T12:00:00").is_err());
        assert!(parse_wp_timestamp("2023-05-10").is_err());
        assert!(parse_wp_timestamp("").is_err());
    }

    #[test]
    fn rfc2822_pub_date() {
        let dt = parse_flexible_time("Wed, 10 May 2023 12:00:00 +0000").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 5, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn gmt_suffix_is_utc() {
        let dt = parse_flexible_time("Wed, 10 May 2023 12:00:00 GMT").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 5, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn never_published_placeholder_is_none() {
        assert!(parse_flexible_time("Mon, 30 Nov -0001 00:00:00 +0000").is_none());
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_flexible_time("").is_none());
        assert!(parse_flexible_time("yesterday").is_none());
    }
}
