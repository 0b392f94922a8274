//! Timestamp rendering and parsing.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format of COVID-19 admission and discharge dates in the extract,
/// e.g. `2020-04-01T00:00:00.000-05:00`.
pub const EPISODE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Render a FHIR `instant` at second precision in UTC.
pub fn instant(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an episode boundary to its calendar date in the source offset.
pub fn parse_episode_date(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_str(value.trim(), EPISODE_DATE_FORMAT)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn instant_is_second_precision_utc() {
        let ts = Utc.with_ymd_and_hms(2021, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(instant(&ts), "2021-03-01T12:30:05Z");
    }

    #[test]
    fn parses_episode_dates_in_source_offset() {
        assert_eq!(
            parse_episode_date("2020-04-01T23:30:00.000-05:00"),
            NaiveDate::from_ymd_opt(2020, 4, 1)
        );
        assert_eq!(
            parse_episode_date("2020-12-31T00:00:00.123+00:00"),
            NaiveDate::from_ymd_opt(2020, 12, 31)
        );
    }

    #[test]
    fn rejects_other_date_shapes() {
        assert_eq!(parse_episode_date("2020-04-01"), None);
        assert_eq!(parse_episode_date("2020-04-01T00:00:00Z"), None);
        assert_eq!(parse_episode_date("04/01/2020"), None);
        assert_eq!(parse_episode_date(""), None);
    }
}
