use super::models::Event;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an event start timestamp.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) and bare dates.
pub fn parse_start(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whether the event starts strictly after `now`; undated events never do
pub fn is_upcoming(event: &Event, now: DateTime<Utc>) -> bool {
    event
        .start_date
        .as_deref()
        .and_then(parse_start)
        .is_some_and(|start| start > now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event_at(start: Option<&str>) -> Event {
        Event {
            start_date: start.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_start_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 11, 3, 18, 30, 0).unwrap();
        assert_eq!(parse_start("2026-11-03T18:30:00Z"), Some(expected));
        assert_eq!(parse_start("2026-11-03T13:30:00-05:00"), Some(expected));
        assert_eq!(parse_start("2026-11-03T18:30:00"), Some(expected));
        assert_eq!(
            parse_start("2026-11-03"),
            Some(Utc.with_ymd_and_hms(2026, 11, 3, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_start("next tuesday"), None);
    }

    #[test]
    fn test_is_upcoming() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        assert!(is_upcoming(&event_at(Some("2026-10-17T00:00:00Z")), now));
        assert!(!is_upcoming(&event_at(Some("2026-10-15T00:00:00Z")), now));
        assert!(!is_upcoming(&event_at(Some("2026-10-16T12:00:00Z")), now));
        assert!(!is_upcoming(&event_at(None), now));
    }
}
