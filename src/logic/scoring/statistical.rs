//! Statistical Strategy - Fitted classifier behind `ModelArtifact`
//!
//! Resolves features in the artifact's own order, scales, predicts, and
//! cuts at the artifact's persisted threshold (never a fixed 0.5).

use std::sync::Arc;

use super::{ScoringStrategy, StrategyKind, StrategyScore};
use crate::error::{RiskError, RiskResult};
use crate::logic::features::{resolve_vector, InputRecord};
use crate::logic::model::{check_probability, ModelArtifact};

/// Anything an artifact call fails with is treated as the artifact being gone
fn unavailable(err: RiskError) -> RiskError {
    match err {
        RiskError::ModelUnavailable(_) => err,
        other => RiskError::ModelUnavailable(other.to_string()),
    }
}

#[derive(Clone)]
pub struct StatisticalStrategy {
    artifact: Arc<dyn ModelArtifact>,
}

impl StatisticalStrategy {
    pub fn new(artifact: Arc<dyn ModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &Arc<dyn ModelArtifact> {
        &self.artifact
    }

    /// `(P(positive), confidence 0-100)`
    pub fn probability(&self, record: &InputRecord) -> RiskResult<(f64, f64)> {
        let metadata = self.artifact.metadata();

        // Type errors surface as-is; they are not an artifact problem
        let vector = resolve_vector(&metadata.feature_order, record)?;
        log::debug!("Feature vector: {}", vector.to_log_entry());

        let scaled = self.artifact.transform(&vector).map_err(unavailable)?;
        // Checked here so every artifact gets the same treatment
        let p = check_probability(self.artifact.predict_probability(&scaled).map_err(unavailable)?)?;

        let confidence = 100.0 * p.max(1.0 - p);
        Ok((p, confidence))
    }
}

impl std::fmt::Debug for StatisticalStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let metadata = self.artifact.metadata();
        f.debug_struct("StatisticalStrategy")
            .field("model_type", &metadata.model_type)
            .field("features", &metadata.feature_count())
            .field("threshold", &metadata.optimal_threshold)
            .finish()
    }
}

impl ScoringStrategy for StatisticalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Statistical
    }

    fn score(&self, record: &InputRecord) -> RiskResult<StrategyScore> {
        let (p, confidence) = self.probability(record)?;
        let metadata = self.artifact.metadata();
        let threshold = metadata.optimal_threshold;

        log::debug!("P(positive) = {:.4}, threshold = {:.3}", p, threshold);

        Ok(StrategyScore {
            kind: StrategyKind::Statistical,
            risk_score: p * 100.0,
            predicted_label: u8::from(p > threshold),
            confidence,
            threshold_used: threshold,
            accuracy_meta: metadata.accuracy,
            features_used: metadata.feature_count(),
        })
    }
}
