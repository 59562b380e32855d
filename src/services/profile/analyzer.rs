use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::models::Dataset;

use super::correlation;
use super::infer::infer_column_type;
use super::stats::{compute_categorical, compute_datetime, compute_numeric};
use super::types::{
    ColumnProfile, ColumnType, MissingInfo, Profile, ProfileOptions, Summary,
};

/// Drives one profiling pass: per-column inference and dispatch, the
/// missing-data summary, and the correlation rendezvous.
pub struct ProfileAnalyzer {
    options: ProfileOptions,
}

struct ColumnOutcome {
    name: String,
    column_type: ColumnType,
    missing: MissingInfo,
    profile: ColumnProfile,
}

impl ProfileAnalyzer {
    pub fn new(options: ProfileOptions) -> Self {
        Self { options }
    }

    /// Profiles the whole dataset and assembles an immutable [`Profile`].
    ///
    /// Columns write into disjoint slots, so they are computed in parallel;
    /// the correlation matrix starts only after every column has finished,
    /// since it needs the full set of columns classified Numeric.
    pub fn profile(&self, dataset: &Dataset) -> Profile {
        let start = std::time::Instant::now();
        let total_rows = dataset.row_count();
        let total_columns = dataset.column_count();
        tracing::info!("Profiling dataset: {} rows, {} columns", total_rows, total_columns);

        let outcomes: Vec<ColumnOutcome> = (0..total_columns)
            .into_par_iter()
            .map(|index| self.profile_column(dataset, index, total_rows))
            .collect();

        let numeric_columns: Vec<String> = outcomes
            .iter()
            .filter(|outcome| outcome.column_type == ColumnType::Numeric)
            .map(|outcome| outcome.name.clone())
            .collect();

        let mut missing_data = BTreeMap::new();
        let mut columns = BTreeMap::new();
        for outcome in outcomes {
            missing_data.insert(outcome.name.clone(), outcome.missing);
            columns.insert(outcome.name, outcome.profile);
        }

        let correlations = if numeric_columns.len() > 1 {
            Some(correlation::compute_matrix(dataset, &numeric_columns))
        } else {
            None
        };

        tracing::info!(
            "Profiling pass completed in {:?} ({} numeric columns)",
            start.elapsed(),
            numeric_columns.len()
        );

        Profile {
            summary: Summary {
                total_rows,
                total_columns,
                missing_data,
            },
            columns,
            correlations,
        }
    }

    fn profile_column(&self, dataset: &Dataset, index: usize, total_rows: usize) -> ColumnOutcome {
        let name = dataset.columns[index].clone();

        // Inference looks at the leading sample; everything after runs over
        // the full column.
        let sample = dataset.sample_values(index, self.options.sample_rows);
        let column_type = infer_column_type(&name, &sample, &self.options.date_formats);

        let values = dataset.present_values(index);
        let missing_count = total_rows - values.len();
        let missing = MissingInfo {
            count: missing_count,
            percentage: if total_rows > 0 {
                missing_count as f64 / total_rows as f64 * 100.0
            } else {
                0.0
            },
        };

        let profile = match column_type {
            ColumnType::Numeric => ColumnProfile::Numeric(compute_numeric(&values)),
            ColumnType::DateTime => {
                ColumnProfile::DateTime(compute_datetime(&values, &self.options.date_formats))
            }
            ColumnType::Categorical => ColumnProfile::Categorical(compute_categorical(&values)),
        };

        ColumnOutcome {
            name,
            column_type,
            missing,
            profile,
        }
    }
}

impl Default for ProfileAnalyzer {
    fn default() -> Self {
        Self::new(ProfileOptions::default())
    }
}
