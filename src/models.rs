use std::collections::HashSet;

/// Column-indexed tabular data, as handed to the profiling engine by the
/// reader. A cell is missing when it is `None` or the empty string.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Builds a dataset from raw headers and rows. Duplicate or blank header
    /// names are disambiguated, and every row is width-aligned to the header
    /// count (short rows padded with missing cells, long rows truncated).
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let mut existing = HashSet::new();
        let columns: Vec<String> = columns
            .iter()
            .map(|name| dedupe_column_name(name, &mut existing))
            .collect();

        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize_with(width, || None);
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Non-missing values of one column, in row order.
    pub fn present_values(&self, col: usize) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(col).and_then(|cell| cell.as_deref()))
            .filter(|value| !value.is_empty())
            .collect()
    }

    /// Non-missing values among the first `rows` rows of one column. The
    /// type inferencer looks only at this slice, never the full column.
    pub fn sample_values(&self, col: usize, rows: usize) -> Vec<&str> {
        self.rows
            .iter()
            .take(rows)
            .filter_map(|row| row.get(col).and_then(|cell| cell.as_deref()))
            .filter(|value| !value.is_empty())
            .collect()
    }
}

fn dedupe_column_name(name: &str, existing: &mut HashSet<String>) -> String {
    let base_name = if name.trim().is_empty() {
        "column".to_string()
    } else {
        name.trim().to_string()
    };

    // If the name already exists, add a numeric suffix
    let mut counter = 1;
    let mut cleaned = base_name.clone();
    while !existing.insert(cleaned.clone()) {
        cleaned = format!("{}_{}", base_name, counter);
        counter += 1;
    }

    cleaned
}
