use serde::Serialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;

use super::utils::DEFAULT_DATE_FORMATS;

/// Rows drawn from the head of the dataset for type inference.
pub const DEFAULT_SAMPLE_ROWS: usize = 100;
/// Distinct categorical values reported in frequency order.
pub const TOP_VALUE_LIMIT: usize = 10;
/// Distinct categorical values reported in first-encounter order.
pub const SAMPLE_VALUE_LIMIT: usize = 5;
/// Outlier values reported alongside the total outlier count.
pub const OUTLIER_VALUE_LIMIT: usize = 10;
/// Histogram bin count cap; below the cap the bin count is ceil(sqrt(n)).
pub const MAX_HISTOGRAM_BINS: usize = 20;

/// Knobs for one profiling pass.
#[derive(Debug, Clone)]
pub struct ProfileOptions {
    pub sample_rows: usize,
    /// Formats tried in order when parsing date values; the first match wins.
    pub date_formats: Vec<String>,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            sample_rows: DEFAULT_SAMPLE_ROWS,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Column classification. Inferred once per column per pass and never
/// re-branched downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    DateTime,
    Categorical,
}

/// The complete profile of one dataset. Built once per pass, immutable, and
/// replaced wholesale when a new dataset is profiled.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub summary: Summary,
    pub columns: BTreeMap<String, ColumnProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlations: Option<CorrelationMatrix>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_rows: usize,
    pub total_columns: usize,
    pub missing_data: BTreeMap<String, MissingInfo>,
}

/// Missing-cell accounting over the entire dataset, not the inference sample.
#[derive(Debug, Clone, Serialize)]
pub struct MissingInfo {
    pub count: usize,
    pub percentage: f64,
}

/// Square, symmetric map of Pearson coefficients; diagonal is exactly 1.
pub type CorrelationMatrix = BTreeMap<String, BTreeMap<String, f64>>;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnProfile {
    Numeric(NumericProfile),
    DateTime(DateTimeProfile),
    Categorical(CategoricalProfile),
}

impl ColumnProfile {
    pub fn as_numeric(&self) -> Option<&NumericProfile> {
        match self {
            Self::Numeric(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTimeProfile> {
        match self {
            Self::DateTime(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalProfile> {
        match self {
            Self::Categorical(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Either full numeric statistics or an error-tagged body when no value in
/// the column parsed. The error body is terminal for the column; the rest of
/// the pass is unaffected.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum NumericProfile {
    Stats(NumericStats),
    Invalid { error: String },
}

impl NumericProfile {
    pub fn as_stats(&self) -> Option<&NumericStats> {
        match self {
            Self::Stats(stats) => Some(stats),
            Self::Invalid { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
    pub iqr: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub outliers: OutlierSummary,
    pub histogram: Histogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlierSummary {
    /// Total outliers, not the length of `values`.
    pub count: usize,
    /// First outliers in dataset-encounter order, not sorted order.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    pub bins: Vec<usize>,
    pub bin_edges: Vec<f64>,
    pub bin_width: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DateTimeProfile {
    Stats(DateTimeStats),
    Invalid { error: String },
}

impl DateTimeProfile {
    pub fn as_stats(&self) -> Option<&DateTimeStats> {
        match self {
            Self::Stats(stats) => Some(stats),
            Self::Invalid { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeStats {
    pub count: usize,
    pub min: String,
    pub max: String,
    /// Truncating whole-day span, e.g. "9 days".
    pub range: String,
    /// Distinct calendar days; same-day timestamps count once.
    pub unique_dates: usize,
}

/// Categorical statistics never carry an error body; an empty column is a
/// valid zero-count profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalProfile {
    pub count: usize,
    pub unique_count: usize,
    pub top_values: Vec<TopValue>,
    pub sample_values: SmallVec<[String; SAMPLE_VALUE_LIMIT]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopValue {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_tagged_profile_keeps_type_tag() {
        let profile = ColumnProfile::Numeric(NumericProfile::Invalid {
            error: "No valid numeric data".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({"type": "numeric", "error": "No valid numeric data"})
        );
    }

    #[test]
    fn datetime_stats_serialize_flat_under_type_tag() {
        let profile = ColumnProfile::DateTime(DateTimeProfile::Stats(DateTimeStats {
            count: 2,
            min: "2024-01-01 00:00:00".to_string(),
            max: "2024-01-10 00:00:00".to_string(),
            range: "9 days".to_string(),
            unique_dates: 2,
        }));
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["type"], "datetime");
        assert_eq!(value["uniqueDates"], 2);
        assert_eq!(value["range"], "9 days");
    }

    #[test]
    fn categorical_profile_uses_camel_case_keys() {
        let profile = ColumnProfile::Categorical(CategoricalProfile {
            count: 3,
            unique_count: 2,
            top_values: vec![TopValue {
                value: "a".to_string(),
                count: 2,
                percentage: 66.67,
            }],
            sample_values: SmallVec::from_vec(vec!["a".to_string(), "b".to_string()]),
        });
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["type"], "categorical");
        assert_eq!(value["uniqueCount"], 2);
        assert_eq!(value["topValues"][0]["percentage"], 66.67);
        assert_eq!(value["sampleValues"], json!(["a", "b"]));
    }

    #[test]
    fn column_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ColumnType::DateTime).unwrap(), json!("datetime"));
        assert_eq!(serde_json::to_value(ColumnType::Numeric).unwrap(), json!("numeric"));
    }

    #[test]
    fn correlations_key_absent_without_matrix() {
        let profile = Profile {
            summary: Summary {
                total_rows: 0,
                total_columns: 0,
                missing_data: BTreeMap::new(),
            },
            columns: BTreeMap::new(),
            correlations: None,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("correlations").is_none());
        assert_eq!(value["summary"]["totalRows"], 0);
    }
}
