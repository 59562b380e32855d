use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub max_file_size: usize,
    /// Overrides the built-in date format list when set. Formats are tried
    /// in order, so ambiguous day/month layouts resolve to the first match.
    pub date_formats: Option<Vec<String>>,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let max_file_size = std::env::var("PROFILE_MAX_FILE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_max_file_size);

        let date_formats = std::env::var("PROFILE_DATE_FORMATS").ok().map(|raw| {
            raw.split(',')
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect()
        });

        Ok(Config {
            max_file_size,
            date_formats,
        })
    }
}
