use std::io::Cursor;

use bytes::Bytes;
use reqwest::Client;

use crate::error::AppError;
use crate::models::Dataset;

pub async fn load_file_from_url(url: &str) -> Result<Bytes, AppError> {
    let client = Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::FileProcessingError(format!("Failed to fetch file: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::FileProcessingError(
            format!("Failed to fetch file. Status: {}", response.status())
        ));
    }

    response
        .bytes()
        .await
        .map_err(|e| AppError::FileProcessingError(format!("Failed to read response bytes: {}", e)))
}

/// Splits a CSV payload into a [`Dataset`]. The first record is the header
/// row and defines the schema domain; fully-empty lines are skipped and
/// short records are padded with missing cells. Malformed-file recovery ends
/// here; the profiling engine never sees a broken file.
pub fn parse_csv_bytes(data: Bytes) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(data));

    let headers = reader
        .headers()
        .map_err(|e| AppError::ParseError(format!("Failed to read CSV header row: {}", e)))?
        .clone();
    if headers.is_empty() {
        return Err(AppError::FileProcessingError(
            "No header row found in CSV".to_string(),
        ));
    }
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AppError::ParseError(format!("Failed to read CSV record: {}", e)))?;

        // PapaParse-style skipEmptyLines
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let cells = (0..columns.len())
            .map(|i| {
                record
                    .get(i)
                    .filter(|field| !field.is_empty())
                    .map(|field| field.to_string())
            })
            .collect();
        rows.push(cells);
    }

    if rows.is_empty() {
        return Err(AppError::FileProcessingError(
            "No data rows found in CSV".to_string(),
        ));
    }

    tracing::info!("Parsed CSV: {} rows, {} columns", rows.len(), columns.len());
    Ok(Dataset::new(columns, rows))
}
