//! Error handling
//!
//! One taxonomy for the whole scoring core. Only `ModelUnavailable` is
//! recovered locally (strategy failover); everything else reaches the caller.

use thiserror::Error;

pub type RiskResult<T> = Result<T, RiskError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Request body is not a flat key/value structure
    #[error("Invalid input: {0}")]
    InputParse(String),

    /// A resolved value could not be coerced to a number
    #[error("Cannot compute feature '{feature}': {message}")]
    FeatureComputation { feature: String, message: String },

    /// Artifact missing or its capability calls failed
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Unexpected failure while scoring
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Labeled evaluation set unusable for threshold selection
    #[error("Invalid evaluation set: {0}")]
    InvalidEvaluationSet(String),

    /// Artifact could not be read at startup
    #[error("Artifact load failed: {0}")]
    ArtifactLoad(String),
}

impl RiskError {
    pub fn feature(feature: impl Into<String>, message: impl Into<String>) -> Self {
        RiskError::FeatureComputation {
            feature: feature.into(),
            message: message.into(),
        }
    }

    /// Errors the orchestrator may absorb by switching to the rule engine
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RiskError::ModelUnavailable(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RiskError::InputParse(_) => "input_parse",
            RiskError::FeatureComputation { .. } => "feature_computation",
            RiskError::ModelUnavailable(_) => "model_unavailable",
            RiskError::Prediction(_) => "prediction",
            RiskError::InvalidEvaluationSet(_) => "invalid_evaluation_set",
            RiskError::ArtifactLoad(_) => "artifact_load",
        }
    }
}

impl From<serde_json::Error> for RiskError {
    fn from(err: serde_json::Error) -> Self {
        RiskError::InputParse(err.to_string())
    }
}
