pub mod analyzer;
pub mod correlation;
pub mod infer;
pub mod stats;
pub mod types;
pub mod utils;

pub use analyzer::ProfileAnalyzer;
pub use types::{Profile, ProfileOptions};
