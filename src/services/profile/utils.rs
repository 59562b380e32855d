use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Built-in date formats, tried in order. Each format is attempted with a
/// time component first, then as a bare date parsed to midnight.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
];

/// Parses a raw cell as a finite float. `NaN` and the infinities parse as
/// floats but are not usable data, so they are rejected here.
pub fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses a raw cell as a timestamp: RFC 3339 first, then each configured
/// format as a datetime and as a bare date.
pub fn parse_date_value(value: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }

    for format in formats {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(parsed.and_time(NaiveTime::MIN));
        }
    }

    None
}

/// Presentation rounding for statistics; internal computation always uses
/// the unrounded value. NaN passes through untouched.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<String> {
        DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn parse_finite_accepts_plain_numbers() {
        assert_eq!(parse_finite("42"), Some(42.0));
        assert_eq!(parse_finite(" -3.5 "), Some(-3.5));
        assert_eq!(parse_finite("1e3"), Some(1000.0));
    }

    #[test]
    fn parse_finite_rejects_non_finite_and_garbage() {
        assert_eq!(parse_finite("NaN"), None);
        assert_eq!(parse_finite("inf"), None);
        assert_eq!(parse_finite("-infinity"), None);
        assert_eq!(parse_finite("12abc"), None);
        assert_eq!(parse_finite(""), None);
    }

    #[test]
    fn parse_date_value_handles_common_layouts() {
        let fmts = formats();
        let midnight = parse_date_value("2024-03-01", &fmts).unwrap();
        assert_eq!(midnight.format("%H:%M:%S").to_string(), "00:00:00");

        let stamped = parse_date_value("2024-03-01 10:30:00", &fmts).unwrap();
        assert_eq!(stamped.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-01 10:30:00");

        let rfc = parse_date_value("2024-03-01T10:30:00Z", &fmts).unwrap();
        assert_eq!(rfc.format("%H:%M:%S").to_string(), "10:30:00");
    }

    #[test]
    fn parse_date_value_rejects_numbers_and_garbage() {
        let fmts = formats();
        assert!(parse_date_value("12345", &fmts).is_none());
        assert!(parse_date_value("not a date", &fmts).is_none());
        assert!(parse_date_value("", &fmts).is_none());
    }

    #[test]
    fn ambiguous_day_month_resolves_to_first_format() {
        // %d/%m/%Y is listed before %m/%d/%Y
        let fmts = formats();
        let parsed = parse_date_value("03/04/2024", &fmts).unwrap();
        assert_eq!(parsed.format("%Y-%m-%d").to_string(), "2024-04-03");
    }

    #[test]
    fn rounding_truncates_to_four_places() {
        assert_eq!(round4(2.87228), 2.8723);
        assert_eq!(round4(1.0 / 3.0), 0.3333);
        assert!(round4(f64::NAN).is_nan());
        assert_eq!(round2(100.0 / 3.0), 33.33);
    }
}
