use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use super::types::{
    CategoricalProfile, DateTimeProfile, DateTimeStats, Histogram, NumericProfile, NumericStats,
    OutlierSummary, TopValue, MAX_HISTOGRAM_BINS, OUTLIER_VALUE_LIMIT, SAMPLE_VALUE_LIMIT,
    TOP_VALUE_LIMIT,
};
use super::utils::{parse_date_value, parse_finite, round2, round4};

/// Descriptive statistics over a numeric column's raw values. Entries that
/// fail to parse are dropped silently and do not count toward `count`.
pub fn compute_numeric(values: &[&str]) -> NumericProfile {
    let numbers: Vec<f64> = values.iter().filter_map(|v| parse_finite(v)).collect();

    if numbers.is_empty() {
        return NumericProfile::Invalid {
            error: "No valid numeric data".to_string(),
        };
    }

    let n = numbers.len();
    let mut sorted = numbers.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let sum: f64 = numbers.iter().sum();
    let mean = sum / n as f64;
    let variance = numbers.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    let std_dev = variance.sqrt();

    // Nearest-rank percentiles, no interpolation
    let q25 = sorted[(n as f64 * 0.25).floor() as usize];
    let median = sorted[(n as f64 * 0.5).floor() as usize];
    let q75 = sorted[(n as f64 * 0.75).floor() as usize];
    let iqr = q75 - q25;

    // Outliers (IQR method), strict bounds, encounter order
    let lower_bound = q25 - 1.5 * iqr;
    let upper_bound = q75 + 1.5 * iqr;
    let mut outlier_values: Vec<f64> = numbers
        .iter()
        .copied()
        .filter(|v| *v < lower_bound || *v > upper_bound)
        .collect();
    let outlier_count = outlier_values.len();
    outlier_values.truncate(OUTLIER_VALUE_LIMIT);

    // A constant column has std_dev == 0; the moments stay NaN and
    // serialize as null.
    let skewness = numbers
        .iter()
        .map(|v| ((v - mean) / std_dev).powi(3))
        .sum::<f64>()
        / n as f64;
    let kurtosis = numbers
        .iter()
        .map(|v| ((v - mean) / std_dev).powi(4))
        .sum::<f64>()
        / n as f64
        - 3.0;

    let min = sorted[0];
    let max = sorted[n - 1];
    let bin_count = ((n as f64).sqrt().ceil() as usize).min(MAX_HISTOGRAM_BINS);
    let bin_width = (max - min) / bin_count as f64;
    let mut bins = vec![0usize; bin_count];
    for value in &numbers {
        let index = if bin_width > 0.0 {
            (((value - min) / bin_width).floor() as usize).min(bin_count - 1)
        } else {
            // Zero-width histogram: every value is the minimum
            0
        };
        bins[index] += 1;
    }
    let bin_edges: Vec<f64> = (0..=bin_count).map(|i| min + i as f64 * bin_width).collect();

    NumericProfile::Stats(NumericStats {
        count: n,
        mean: round4(mean),
        median: round4(median),
        std_dev: round4(std_dev),
        min: round4(min),
        max: round4(max),
        q25: round4(q25),
        q75: round4(q75),
        iqr: round4(iqr),
        skewness: round4(skewness),
        kurtosis: round4(kurtosis),
        outliers: OutlierSummary {
            count: outlier_count,
            values: outlier_values,
        },
        histogram: Histogram {
            bins,
            bin_edges,
            bin_width: round4(bin_width),
        },
    })
}

/// Range and cardinality over a datetime column's raw values.
pub fn compute_datetime(values: &[&str], date_formats: &[String]) -> DateTimeProfile {
    let mut dates: Vec<chrono::NaiveDateTime> = values
        .iter()
        .filter_map(|v| parse_date_value(v, date_formats))
        .collect();

    if dates.is_empty() {
        return DateTimeProfile::Invalid {
            error: "No valid date data".to_string(),
        };
    }

    let count = dates.len();
    let unique_dates = dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect::<HashSet<_>>()
        .len();

    dates.sort();
    let min = dates[0];
    let max = dates[count - 1];
    let range_days = (max - min).num_days();

    DateTimeProfile::Stats(DateTimeStats {
        count,
        min: min.format("%Y-%m-%d %H:%M:%S").to_string(),
        max: max.format("%Y-%m-%d %H:%M:%S").to_string(),
        range: format!("{} days", range_days),
        unique_dates,
    })
}

/// Frequency distribution over a categorical column's raw values. Exact
/// string equality, no normalization. Never errors; an empty column is a
/// valid zero-count profile.
pub fn compute_categorical(values: &[&str]) -> CategoricalProfile {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut encounter_order: Vec<&str> = Vec::new();
    for &value in values {
        let entry = counts.entry(value).or_insert(0);
        if *entry == 0 {
            encounter_order.push(value);
        }
        *entry += 1;
    }

    let total = values.len();
    let unique_count = encounter_order.len();

    // Stable sort: ties keep first-encounter order
    let mut ranked = encounter_order.clone();
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));

    let top_values = ranked
        .iter()
        .take(TOP_VALUE_LIMIT)
        .map(|&value| TopValue {
            value: value.to_string(),
            count: counts[value],
            percentage: round2(counts[value] as f64 / total as f64 * 100.0),
        })
        .collect();

    let sample_values: SmallVec<[String; SAMPLE_VALUE_LIMIT]> = encounter_order
        .iter()
        .take(SAMPLE_VALUE_LIMIT)
        .map(|&value| value.to_string())
        .collect();

    CategoricalProfile {
        count: total,
        unique_count,
        top_values,
        sample_values,
    }
}
