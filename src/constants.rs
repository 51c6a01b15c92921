//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

use std::path::PathBuf;

/// Metadata file looked up inside the model directory
pub const DEFAULT_METADATA_FILE: &str = "model_info.json";

/// Default recommendation list length (also the hard cap)
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

/// Importances reported by `model-info`
pub const TOP_FEATURE_COUNT: usize = 10;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "PCOS Risk Core";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Model directory, unset means rules only
pub fn get_model_dir() -> Option<PathBuf> {
    std::env::var("RISK_MODEL_DIR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

/// Metadata file name from environment or use default
pub fn get_metadata_file() -> String {
    std::env::var("RISK_MODEL_METADATA")
        .unwrap_or_else(|_| DEFAULT_METADATA_FILE.to_string())
}

/// Expected sha256 (hex) of the metadata file
pub fn get_expected_checksum() -> Option<String> {
    std::env::var("RISK_MODEL_SHA256")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Check if the statistical strategy is enabled
pub fn is_statistical_enabled() -> bool {
    std::env::var("RISK_STATISTICAL_ENABLED")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}

/// Recommendation limit from environment or use default
pub fn get_max_recommendations() -> usize {
    std::env::var("RISK_MAX_RECOMMENDATIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_RECOMMENDATIONS)
}
