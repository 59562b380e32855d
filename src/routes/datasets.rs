use axum::{
    extract::State,
    routing::post,
    Router,
    Json,
    http::Method,
};
use serde::Deserialize;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::Dataset,
    services::{
        ingest,
        profile::{Profile, ProfileAnalyzer, ProfileOptions},
    },
};
use tower_http::cors::{Any, CorsLayer};

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/datasets/profile", post(profile_dataset))
        .layer(cors)
}

#[derive(Debug, Deserialize)]
pub struct FileInfo {
    #[serde(rename = "type")]
    file_type: String,
    signed_url: String,
}

#[derive(Debug, Deserialize)]
pub struct InlineDataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    dataset: Option<InlineDataset>,
    #[serde(default)]
    files: Vec<FileInfo>,
}

#[axum::debug_handler]
async fn profile_dataset(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let start = std::time::Instant::now();

    let dataset = resolve_dataset(&state, request).await?;
    if dataset.row_count() == 0 || dataset.column_count() == 0 {
        return Err(AppError::InvalidInput("Dataset has no rows to profile".to_string()));
    }
    tracing::info!(
        "Dataset resolved: {} rows, {} columns, took {:?}",
        dataset.row_count(),
        dataset.column_count(),
        start.elapsed()
    );

    let mut options = ProfileOptions::default();
    if let Some(formats) = &state.config.date_formats {
        options.date_formats = formats.clone();
    }

    let profiling_start = std::time::Instant::now();
    let analyzer = ProfileAnalyzer::new(options);
    let profile = analyzer.profile(&dataset);
    tracing::info!("Profile computed in {:?}", profiling_start.elapsed());

    tracing::info!("Total processing completed in {:?}", start.elapsed());

    Ok(Json(profile))
}

async fn resolve_dataset(state: &AppState, request: ProfileRequest) -> Result<Dataset, AppError> {
    if let Some(inline) = request.dataset {
        tracing::info!("Profiling inline dataset with {} columns", inline.columns.len());
        return Ok(Dataset::new(inline.columns, inline.rows));
    }

    let file_info = request.files.first()
        .ok_or_else(|| AppError::InvalidInput("No dataset or file provided".to_string()))?;

    tracing::info!(
        "Processing file type: {}, URL length: {}",
        file_info.file_type,
        file_info.signed_url.len()
    );

    if !file_info.file_type.to_lowercase().contains("csv") {
        tracing::error!("Unsupported file type: {}", file_info.file_type);
        return Err(AppError::InvalidInput("Only CSV files are supported".to_string()));
    }

    let download_start = std::time::Instant::now();
    let file_data = ingest::load_file_from_url(&file_info.signed_url).await?;
    tracing::info!(
        "File downloaded, size: {}KB, took: {:?}",
        file_data.len() / 1024,
        download_start.elapsed()
    );

    if file_data.len() > state.config.max_file_size {
        return Err(AppError::InvalidInput(format!(
            "File exceeds the maximum size of {} bytes",
            state.config.max_file_size
        )));
    }

    ingest::parse_csv_bytes(file_data)
}
