//! Date formatting for Contentful's JSON and query conventions.

use chrono::{DateTime, TimeZone, Timelike, Utc};

/// Formats a date-time the way Contentful expects it in JSON payloads.
///
/// The value is rendered in UTC with a `Z` suffix; milliseconds appear
/// only when non-zero.
pub fn format_for_json<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let date = date.with_timezone(&Utc);
    let mut result = date.format("%Y-%m-%dT%H:%M:%S").to_string();

    let milliseconds = date.timestamp_subsec_millis();
    if milliseconds > 0 {
        result.push_str(&format!(".{:03}", milliseconds));
    }

    result.push('Z');
    result
}

/// Formats a date-time for use in query filters.
///
/// The API matches query dates at minute precision, so seconds are
/// forced to zero and the UTC offset is kept explicit.
pub fn format_for_query<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.with_second(0)
        .unwrap_or_else(|| date.clone())
        .format("%Y-%m-%dT%H:%M:%S%:z")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn json_format_omits_zero_milliseconds() {
        let date = Utc.with_ymd_and_hms(2017, 6, 24, 14, 30, 0).unwrap();

        assert_eq!(format_for_json(&date), "2017-06-24T14:30:00Z");
    }

    #[test]
    fn json_format_keeps_milliseconds() {
        let date = Utc
            .with_ymd_and_hms(2017, 6, 24, 14, 30, 0)
            .unwrap()
            .with_nanosecond(123_000_000)
            .unwrap();

        assert_eq!(format_for_json(&date), "2017-06-24T14:30:00.123Z");
    }

    #[test]
    fn json_format_converts_to_utc() {
        let date = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2017, 6, 24, 16, 30, 0)
            .unwrap();

        assert_eq!(format_for_json(&date), "2017-06-24T14:30:00Z");
    }

    #[test]
    fn query_format_zeroes_seconds_and_keeps_offset() {
        let date = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2017, 6, 24, 16, 30, 59)
            .unwrap();

        assert_eq!(format_for_query(&date), "2017-06-24T16:30:00+02:00");
    }
}
