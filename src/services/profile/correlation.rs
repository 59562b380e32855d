use std::collections::BTreeMap;

use crate::models::Dataset;

use super::types::CorrelationMatrix;
use super::utils::{parse_finite, round4};

/// Pairwise Pearson matrix over the numeric columns. Each column's series is
/// filtered independently over the full dataset; the two series of a pair are
/// NOT row-aligned, and a pair whose series end up different lengths (or
/// empty) degrades to a coefficient of 0.
pub fn compute_matrix(dataset: &Dataset, numeric_columns: &[String]) -> CorrelationMatrix {
    let series: BTreeMap<&String, Vec<f64>> = numeric_columns
        .iter()
        .map(|name| (name, column_series(dataset, name)))
        .collect();

    let mut matrix = CorrelationMatrix::new();
    for a in numeric_columns {
        let mut row = BTreeMap::new();
        for b in numeric_columns {
            let coefficient = if a == b {
                1.0
            } else {
                pearson(&series[a], &series[b])
            };
            row.insert(b.clone(), coefficient);
        }
        matrix.insert(a.clone(), row);
    }

    matrix
}

/// All finite parses of one column, in row order. Missing and unparseable
/// cells are skipped, which is what makes per-pair lengths diverge.
fn column_series(dataset: &Dataset, name: &str) -> Vec<f64> {
    let Some(index) = dataset.columns.iter().position(|c| c == name) else {
        return Vec::new();
    };
    dataset
        .rows
        .iter()
        .filter_map(|row| row.get(index).and_then(|cell| cell.as_deref()))
        .filter_map(parse_finite)
        .collect()
}

/// Sum-based Pearson's r. A zero denominator (either series constant) also
/// degrades to 0.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_x_sq: f64 = x.iter().map(|v| v * v).sum();
    let sum_y_sq: f64 = y.iter().map(|v| v * v).sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();

    let numerator = sum_xy - sum_x * sum_y / n;
    let denominator = ((sum_x_sq - sum_x * sum_x / n) * (sum_y_sq - sum_y * sum_y / n)).sqrt();

    if denominator == 0.0 {
        0.0
    } else {
        round4(numerator / denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: &[&str], rows: &[&[Option<&str>]]) -> Dataset {
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.map(|v| v.to_string())).collect())
                .collect(),
        )
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn diagonal_is_exactly_one() {
        let ds = dataset(
            &["x", "y"],
            &[
                &[Some("1"), Some("5")],
                &[Some("2"), Some("3")],
                &[Some("3"), Some("8")],
            ],
        );
        let matrix = compute_matrix(&ds, &cols(&["x", "y"]));
        assert_eq!(matrix["x"]["x"], 1.0);
        assert_eq!(matrix["y"]["y"], 1.0);
    }

    #[test]
    fn matrix_is_symmetric() {
        let ds = dataset(
            &["x", "y"],
            &[
                &[Some("1"), Some("4")],
                &[Some("2"), Some("1")],
                &[Some("3"), Some("7")],
                &[Some("4"), Some("2")],
            ],
        );
        let matrix = compute_matrix(&ds, &cols(&["x", "y"]));
        assert_eq!(matrix["x"]["y"], matrix["y"]["x"]);
    }

    #[test]
    fn perfect_linear_relationship_is_one() {
        let ds = dataset(
            &["x", "y"],
            &[
                &[Some("1"), Some("2")],
                &[Some("2"), Some("4")],
                &[Some("3"), Some("6")],
            ],
        );
        let matrix = compute_matrix(&ds, &cols(&["x", "y"]));
        assert_eq!(matrix["x"]["y"], 1.0);
    }

    #[test]
    fn identical_columns_correlate_to_one() {
        let ds = dataset(
            &["x", "y"],
            &[
                &[Some("1"), Some("1")],
                &[Some("5"), Some("5")],
                &[Some("9"), Some("9")],
            ],
        );
        let matrix = compute_matrix(&ds, &cols(&["x", "y"]));
        assert_eq!(matrix["x"]["y"], 1.0);
    }

    #[test]
    fn exact_negation_is_minus_one() {
        let ds = dataset(
            &["x", "y"],
            &[
                &[Some("1"), Some("-1")],
                &[Some("2"), Some("-2")],
                &[Some("3"), Some("-3")],
            ],
        );
        let matrix = compute_matrix(&ds, &cols(&["x", "y"]));
        assert_eq!(matrix["x"]["y"], -1.0);
    }

    #[test]
    fn mismatched_series_lengths_degrade_to_zero() {
        // y is missing one value, so the filtered series differ in length
        let ds = dataset(
            &["x", "y"],
            &[
                &[Some("1"), Some("2")],
                &[Some("2"), None],
                &[Some("3"), Some("6")],
            ],
        );
        let matrix = compute_matrix(&ds, &cols(&["x", "y"]));
        assert_eq!(matrix["x"]["y"], 0.0);
        assert_eq!(matrix["x"]["x"], 1.0);
    }

    #[test]
    fn constant_series_degrades_to_zero() {
        let ds = dataset(
            &["x", "y"],
            &[
                &[Some("5"), Some("1")],
                &[Some("5"), Some("2")],
                &[Some("5"), Some("3")],
            ],
        );
        let matrix = compute_matrix(&ds, &cols(&["x", "y"]));
        assert_eq!(matrix["x"]["y"], 0.0);
    }

    #[test]
    fn unparseable_cells_are_skipped_per_column() {
        // Both columns lose the same row to garbage, lengths still match
        let ds = dataset(
            &["x", "y"],
            &[
                &[Some("1"), Some("2")],
                &[Some("oops"), Some("nope")],
                &[Some("2"), Some("4")],
                &[Some("3"), Some("6")],
            ],
        );
        let matrix = compute_matrix(&ds, &cols(&["x", "y"]));
        assert_eq!(matrix["x"]["y"], 1.0);
    }
}
