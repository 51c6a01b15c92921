//! Risk Orchestrator
//!
//! Start -> ResolveStrategy -> Score -> Classify -> Recommend -> Done
//!
//! Owns the config and the optional artifact for the life of the process.
//! A missing artifact is decided once, at construction; requests never retry
//! the load. A statistical failure classed as recoverable fails over to the
//! rule engine within the same request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{APP_VERSION, TOP_FEATURE_COUNT};
use crate::error::{RiskError, RiskResult};
use crate::logic::config::EngineConfig;
use crate::logic::features::{layout_hash, InputRecord};
use crate::logic::model::{load_artifact, FeatureImportance, ModelArtifact};
use crate::logic::recommend;
use crate::logic::risk::{classify, RiskAssessment, RiskLevel, StrategyKind};
use crate::logic::scoring::rules::{RULE_ACCURACY, RULE_THRESHOLD};
use crate::logic::scoring::{RuleBasedStrategy, ScoringStrategy, StatisticalStrategy, StrategyScore};

// ============================================================================
// STAGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentStage {
    Start,
    ResolveStrategy,
    Score,
    Classify,
    Recommend,
    Done,
}

fn enter(stage: AssessmentStage) {
    log::debug!("Assessment stage: {:?}", stage);
}

// ============================================================================
// RESPONSE
// ============================================================================

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Wire shape handed to the transport layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    /// Percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_used: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssessmentResponse {
    pub fn from_assessment(assessment: &RiskAssessment) -> Self {
        Self {
            success: true,
            prediction: Some(assessment.predicted_label),
            risk_score: Some(round_to(assessment.risk_score, 1)),
            risk_level: Some(assessment.risk_level),
            confidence: Some(round_to(assessment.confidence, 1)),
            recommendations: Some(assessment.recommendations.clone()),
            model_accuracy: Some(round_to(assessment.accuracy_meta * 100.0, 1)),
            threshold_used: Some(round_to(assessment.threshold_used, 3)),
            strategy: Some(assessment.strategy_used),
            features_used: Some(assessment.features_used),
            error: None,
        }
    }

    pub fn failure(err: &RiskError) -> Self {
        Self {
            success: false,
            prediction: None,
            risk_score: None,
            risk_level: None,
            confidence: None,
            recommendations: None,
            model_accuracy: None,
            threshold_used: None,
            strategy: None,
            features_used: None,
            error: Some(err.to_string()),
        }
    }
}

/// Artifact summary for `model-info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub loaded: bool,
    pub model_type: String,
    /// Percent
    pub accuracy: f64,
    pub accuracy_default: Option<f64>,
    pub optimal_threshold: f64,
    pub feature_count: usize,
    pub layout_hash: Option<String>,
    pub top_features: Vec<FeatureImportance>,
    pub loaded_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub version: String,
    pub artifact_loaded: bool,
    pub statistical_enabled: bool,
    pub active_strategy: StrategyKind,
    pub feature_count: usize,
    pub threshold: f64,
    pub max_recommendations: usize,
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct RiskOrchestrator {
    config: EngineConfig,
    statistical: Option<StatisticalStrategy>,
    rule_based: RuleBasedStrategy,
}

impl RiskOrchestrator {
    pub fn new(config: EngineConfig, artifact: Option<Arc<dyn ModelArtifact>>) -> Self {
        let statistical = artifact.map(StatisticalStrategy::new);
        match (&statistical, config.statistical_enabled) {
            (Some(s), true) => log::info!(
                "Statistical strategy active ({} features, threshold {:.3})",
                s.artifact().metadata().feature_count(),
                s.artifact().metadata().optimal_threshold
            ),
            (Some(_), false) => log::warn!("Statistical strategy disabled by config - using clinical rules"),
            (None, _) => log::warn!("No model artifact - using clinical rules"),
        }

        Self {
            config,
            statistical,
            rule_based: RuleBasedStrategy::new(),
        }
    }

    /// Load the artifact named by `config`. Load failures are logged once and
    /// leave the orchestrator on the rule engine.
    pub fn from_config(config: EngineConfig) -> Self {
        let artifact = match &config.model_dir {
            None => {
                log::info!("No model directory configured");
                None
            }
            Some(dir) => match load_artifact(
                dir,
                &config.metadata_file,
                config.expected_checksum.as_deref(),
            ) {
                Ok(artifact) => Some(artifact),
                Err(e) => {
                    log::warn!("Model artifact unavailable: {}", e);
                    None
                }
            },
        };
        Self::new(config, artifact)
    }

    pub fn rules_only() -> Self {
        Self::new(EngineConfig::default(), None)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn has_artifact(&self) -> bool {
        self.statistical.is_some()
    }

    fn statistical(&self) -> Option<&StatisticalStrategy> {
        self.statistical
            .as_ref()
            .filter(|_| self.config.statistical_enabled)
    }

    pub fn active_strategy(&self) -> StrategyKind {
        match self.statistical() {
            Some(_) => StrategyKind::Statistical,
            None => StrategyKind::RuleBased,
        }
    }

    fn score(&self, record: &InputRecord) -> RiskResult<StrategyScore> {
        enter(AssessmentStage::ResolveStrategy);
        let Some(statistical) = self.statistical() else {
            enter(AssessmentStage::Score);
            return self.rule_based.score(record);
        };

        enter(AssessmentStage::Score);
        match statistical.score(record) {
            Ok(score) => Ok(score),
            Err(e) if e.is_recoverable() => {
                log::warn!("Statistical scoring failed ({}) - failing over to clinical rules", e);
                self.rule_based.score(record)
            }
            Err(e) => Err(e),
        }
    }

    pub fn assess(&self, record: &InputRecord) -> RiskResult<RiskAssessment> {
        enter(AssessmentStage::Start);
        let score = self.score(record)?;

        if !(0.0..=100.0).contains(&score.risk_score) {
            return Err(RiskError::Prediction(format!(
                "{} strategy produced score {} outside [0, 100]",
                score.kind, score.risk_score
            )));
        }

        enter(AssessmentStage::Classify);
        let risk_level = classify(score.risk_score, score.kind);

        enter(AssessmentStage::Recommend);
        let recommendations = recommend::generate_with_limit(
            record,
            score.risk_score,
            risk_level,
            self.config.max_recommendations,
        )?;

        enter(AssessmentStage::Done);
        log::debug!(
            "Assessment: {} ({:.1}) via {}",
            risk_level,
            score.risk_score,
            score.kind
        );

        Ok(RiskAssessment {
            predicted_label: score.predicted_label,
            risk_score: score.risk_score,
            risk_level,
            confidence: score.confidence,
            recommendations,
            strategy_used: score.kind,
            threshold_used: score.threshold_used,
            accuracy_meta: score.accuracy_meta,
            features_used: score.features_used,
        })
    }

    /// Parse a request body and render the wire response. Never fails; errors
    /// become `{success: false, error}`.
    pub fn assess_json(&self, body: &str) -> AssessmentResponse {
        let result = InputRecord::from_json_str(body).and_then(|record| self.assess(&record));
        match result {
            Ok(assessment) => AssessmentResponse::from_assessment(&assessment),
            Err(e) => {
                log::warn!("Assessment failed ({}): {}", e.kind(), e);
                AssessmentResponse::failure(&e)
            }
        }
    }

    pub fn model_info(&self) -> ModelInfo {
        match &self.statistical {
            Some(strategy) => {
                let meta = strategy.artifact().metadata();
                ModelInfo {
                    loaded: true,
                    model_type: meta.model_type.clone(),
                    accuracy: round_to(meta.accuracy * 100.0, 1),
                    accuracy_default: meta.accuracy_default.map(|a| round_to(a * 100.0, 1)),
                    optimal_threshold: meta.optimal_threshold,
                    feature_count: meta.feature_count(),
                    layout_hash: Some(format!("{:08x}", layout_hash(&meta.feature_order))),
                    top_features: meta.top_features(TOP_FEATURE_COUNT),
                    loaded_at: meta.loaded_at,
                }
            }
            None => ModelInfo {
                loaded: false,
                model_type: "clinical_rules".to_string(),
                accuracy: round_to(RULE_ACCURACY * 100.0, 1),
                accuracy_default: None,
                optimal_threshold: RULE_THRESHOLD,
                feature_count: crate::logic::scoring::rule_based::RULE_FEATURES.len(),
                layout_hash: None,
                top_features: Vec::new(),
                loaded_at: None,
            },
        }
    }

    pub fn status(&self) -> EngineStatus {
        let (feature_count, threshold) = match self.statistical() {
            Some(s) => {
                let meta = s.artifact().metadata();
                (meta.feature_count(), meta.optimal_threshold)
            }
            None => (
                crate::logic::scoring::rule_based::RULE_FEATURES.len(),
                RULE_THRESHOLD,
            ),
        };

        EngineStatus {
            version: APP_VERSION.to_string(),
            artifact_loaded: self.has_artifact(),
            statistical_enabled: self.config.statistical_enabled,
            active_strategy: self.active_strategy(),
            feature_count,
            threshold,
            max_recommendations: self.config.max_recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::{AGE, BMI, FSH};
    use crate::logic::scoring::statistical::test_support::{BrokenArtifact, FixedArtifact};
    use approx::assert_relative_eq;

    fn with_artifact(artifact: impl ModelArtifact + 'static) -> RiskOrchestrator {
        RiskOrchestrator::new(EngineConfig::default(), Some(Arc::new(artifact)))
    }

    const HIGH_RISK_BODY: &str = r#"{
        "age": 28, "weight": 78, "height": 162, "cycle_regular": 0,
        "weight_gain": 1, "hair_growth": 1, "pimples": 1,
        "regular_exercise": 0, "fast_food": 1
    }"#;

    #[test]
    fn test_missing_artifact_uses_rules() {
        let orchestrator = RiskOrchestrator::rules_only();
        let response = orchestrator.assess_json(HIGH_RISK_BODY);

        assert!(response.success);
        assert_eq!(response.strategy, Some(StrategyKind::RuleBased));
        assert_eq!(response.risk_score, Some(95.0));
        assert_eq!(response.risk_level, Some(RiskLevel::VeryHigh));
        assert_eq!(response.prediction, Some(1));
        assert_eq!(response.model_accuracy, Some(68.5));
        assert_eq!(response.threshold_used, Some(0.5));
        assert!(response.recommendations.as_ref().map_or(false, |r| r.len() <= 5));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_statistical_path() {
        let orchestrator = with_artifact(FixedArtifact::new(&[AGE, BMI], 0.312_34, 0.4567));
        let assessment = orchestrator.assess(&InputRecord::new().with("age", 30)).unwrap();

        assert_eq!(assessment.strategy_used, StrategyKind::Statistical);
        assert_relative_eq!(assessment.risk_score, 45.67, epsilon = 1e-9);
        assert_eq!(assessment.risk_level, RiskLevel::Moderate);
        assert_eq!(assessment.predicted_label, 1);

        let response = AssessmentResponse::from_assessment(&assessment);
        assert_eq!(response.risk_score, Some(45.7));
        assert_eq!(response.confidence, Some(54.3));
        assert_eq!(response.threshold_used, Some(0.312));
        assert_eq!(response.model_accuracy, Some(81.0));
        assert_eq!(response.features_used, Some(2));
    }

    #[test]
    fn test_failover_on_broken_artifact() {
        let orchestrator = with_artifact(BrokenArtifact::new(&[AGE]));
        let assessment = orchestrator.assess(&InputRecord::new()).unwrap();
        assert_eq!(assessment.strategy_used, StrategyKind::RuleBased);
        assert!((5.0..=95.0).contains(&assessment.risk_score));
    }

    #[test]
    fn test_failover_on_invalid_probability() {
        for p in [f64::NAN, 1.5, -0.2] {
            let orchestrator = with_artifact(FixedArtifact::new(&[AGE], 0.5, p));
            let assessment = orchestrator.assess(&InputRecord::new()).unwrap();
            assert_eq!(assessment.strategy_used, StrategyKind::RuleBased, "p = {}", p);
            assert!((5.0..=95.0).contains(&assessment.risk_score));
        }
    }

    #[test]
    fn test_kill_switch_routes_to_rules() {
        let orchestrator = RiskOrchestrator::new(
            EngineConfig::default().with_statistical(false),
            Some(Arc::new(FixedArtifact::new(&[AGE], 0.5, 0.9))),
        );
        assert_eq!(orchestrator.active_strategy(), StrategyKind::RuleBased);
        let assessment = orchestrator.assess(&InputRecord::new()).unwrap();
        assert_eq!(assessment.strategy_used, StrategyKind::RuleBased);
        assert!(orchestrator.status().artifact_loaded);
    }

    #[test]
    fn test_unparseable_body_fails() {
        let orchestrator = RiskOrchestrator::rules_only();
        for body in ["not json", "[1, 2]", r#"{"age": [28]}"#] {
            let response = orchestrator.assess_json(body);
            assert!(!response.success, "{}", body);
            assert!(response.error.is_some());
            assert!(response.risk_score.is_none());
        }
    }

    #[test]
    fn test_type_error_is_surfaced_not_failed_over() {
        let orchestrator = with_artifact(FixedArtifact::new(&[AGE, FSH], 0.5, 0.2));
        let err = orchestrator
            .assess(&InputRecord::new().with("fsh", "lots"))
            .unwrap_err();
        assert!(matches!(err, RiskError::FeatureComputation { .. }));
    }

    #[test]
    fn test_empty_request_degrades_to_defaults() {
        let response = RiskOrchestrator::rules_only().assess_json("{}");
        assert!(response.success);
        let score = response.risk_score.unwrap_or(-1.0);
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn test_recommendation_limit_from_config() {
        let orchestrator =
            RiskOrchestrator::new(EngineConfig::default().with_max_recommendations(2), None);
        let assessment = orchestrator
            .assess(&InputRecord::from_json_str(HIGH_RISK_BODY).unwrap())
            .unwrap();
        assert_eq!(assessment.recommendations.len(), 2);
        assert_eq!(
            assessment.recommendations[0],
            "Schedule an appointment with a gynecologist soon"
        );
    }

    #[test]
    fn test_from_config_with_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = RiskOrchestrator::from_config(
            EngineConfig::default().with_model_dir(dir.path().join("absent")),
        );
        assert!(!orchestrator.has_artifact());
        assert_eq!(orchestrator.status().active_strategy, StrategyKind::RuleBased);
    }

    #[test]
    fn test_model_info() {
        let info = RiskOrchestrator::rules_only().model_info();
        assert!(!info.loaded);
        assert_relative_eq!(info.accuracy, 68.5);

        let mut artifact = FixedArtifact::new(&[AGE, BMI], 0.4, 0.5);
        artifact.metadata.feature_importances = (0..12)
            .map(|i| FeatureImportance { feature: format!("f{}", i), importance: i as f64 })
            .collect();
        let info = with_artifact(artifact).model_info();
        assert!(info.loaded);
        assert_eq!(info.top_features.len(), 10);
        assert_eq!(info.top_features[0].feature, "f11");
        assert_relative_eq!(info.accuracy, 81.0);
    }

    #[test]
    fn test_response_wire_shape() {
        let response = RiskOrchestrator::rules_only().assess_json(HIGH_RISK_BODY);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["risk_level"], "Very High");
        assert_eq!(value["strategy"], "rule_based");
        assert!(value.get("error").is_none());

        let failure = serde_json::to_value(RiskOrchestrator::rules_only().assess_json("42")).unwrap();
        assert_eq!(failure["success"], false);
        assert!(failure.get("prediction").is_none());
    }
}
