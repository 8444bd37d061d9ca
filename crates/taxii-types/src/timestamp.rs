//! ISO-8601 timestamps as stored in manifests and status records.

use chrono::{DateTime, SecondsFormat, Utc};

/// Render a UTC instant as ISO-8601 with microseconds and an explicit
/// `+00:00` offset, e.g. `2023-05-10T09:16:08.755587+00:00`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// The current wall-clock time, formatted with [`format_timestamp`].
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn explicit_utc_offset() {
        let at = Utc.with_ymd_and_hms(2023, 5, 10, 9, 16, 8).unwrap();
        assert_eq!(format_timestamp(at), "2023-05-10T09:16:08.000000+00:00");
    }

    #[test]
    fn now_parses_back() {
        let ts = now_timestamp();
        assert!(ts.ends_with("+00:00"));
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
