//! Engine Configuration
//!
//! Built once at startup and owned by the orchestrator. Nothing reads the
//! environment after construction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{self, DEFAULT_MAX_RECOMMENDATIONS, DEFAULT_METADATA_FILE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the artifact; `None` = rules only
    pub model_dir: Option<PathBuf>,
    pub metadata_file: String,
    /// sha256 (hex) the metadata file must match
    pub expected_checksum: Option<String>,
    /// Kill switch for the statistical strategy
    pub statistical_enabled: bool,
    /// 1..=5
    pub max_recommendations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
            expected_checksum: None,
            statistical_enabled: true,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            model_dir: constants::get_model_dir(),
            metadata_file: constants::get_metadata_file(),
            expected_checksum: constants::get_expected_checksum(),
            statistical_enabled: constants::is_statistical_enabled(),
            max_recommendations: constants::get_max_recommendations(),
        }
        .normalized()
    }

    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = Some(dir.into());
        self
    }

    pub fn with_statistical(mut self, enabled: bool) -> Self {
        self.statistical_enabled = enabled;
        self
    }

    pub fn with_max_recommendations(mut self, limit: usize) -> Self {
        self.max_recommendations = limit;
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.max_recommendations = self.max_recommendations.clamp(1, DEFAULT_MAX_RECOMMENDATIONS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.model_dir.is_none());
        assert_eq!(config.metadata_file, "model_info.json");
        assert!(config.statistical_enabled);
        assert_eq!(config.max_recommendations, 5);
    }

    #[test]
    fn test_recommendation_limit_clamped() {
        assert_eq!(EngineConfig::default().with_max_recommendations(0).max_recommendations, 1);
        assert_eq!(EngineConfig::default().with_max_recommendations(9).max_recommendations, 5);
        assert_eq!(EngineConfig::default().with_max_recommendations(3).max_recommendations, 3);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_model_dir("/srv/models")
            .with_statistical(false);
        assert_eq!(config.model_dir, Some(PathBuf::from("/srv/models")));
        assert!(!config.statistical_enabled);
    }
}
