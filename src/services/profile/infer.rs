use super::types::ColumnType;
use super::utils::{parse_date_value, parse_finite};

/// Column-name substrings that short-circuit to DateTime before any value
/// is inspected.
const DATE_NAME_KEYWORDS: &[&str] = &["date", "time", "timestamp", "created", "updated"];

/// Fraction of the sample that must parse as a date. Strictly exceeded.
const DATE_FRACTION_THRESHOLD: f64 = 0.5;
/// Fraction of the sample that must parse as a finite float. Strictly exceeded.
const NUMERIC_FRACTION_THRESHOLD: f64 = 0.8;

/// Classifies a column from its name and a sample of non-missing values.
/// Deterministic for a given sample; both thresholds are strict.
pub fn infer_column_type(name: &str, sample: &[&str], date_formats: &[String]) -> ColumnType {
    if sample.is_empty() {
        // String data of unknown content
        return ColumnType::Categorical;
    }

    let lowered = name.to_lowercase();
    if DATE_NAME_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        return ColumnType::DateTime;
    }

    let date_count = sample
        .iter()
        .filter(|value| parse_date_value(value, date_formats).is_some())
        .count();
    if date_count as f64 / sample.len() as f64 > DATE_FRACTION_THRESHOLD {
        return ColumnType::DateTime;
    }

    let numeric_count = sample
        .iter()
        .filter(|value| parse_finite(value).is_some())
        .count();
    if numeric_count as f64 / sample.len() as f64 > NUMERIC_FRACTION_THRESHOLD {
        return ColumnType::Numeric;
    }

    ColumnType::Categorical
}
