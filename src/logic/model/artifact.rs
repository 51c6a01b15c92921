//! Model Artifact - Capability surface of a fitted model
//!
//! The scoring core never trains anything. It sees a fitted model only as
//! `transform` + `predict_probability` plus immutable metadata. Artifacts are
//! loaded once at startup and shared read-only behind an `Arc`.

use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};
use crate::logic::features::{layout_hash, FeatureVector};

// ============================================================================
// METADATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Immutable facts recorded when the model was fit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Accuracy at `optimal_threshold` on the held-out set (0.0 - 1.0)
    pub accuracy: f64,
    /// Accuracy at the fixed 0.5 cut, when recorded
    pub accuracy_default: Option<f64>,
    /// Youden-optimal decision threshold
    pub optimal_threshold: f64,
    /// Exact column order the model was fit with
    pub feature_order: Vec<String>,
    pub feature_importances: Vec<FeatureImportance>,
    pub model_type: String,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl ArtifactMetadata {
    pub fn new(feature_order: Vec<String>, optimal_threshold: f64, accuracy: f64) -> Self {
        Self {
            accuracy,
            accuracy_default: None,
            optimal_threshold,
            feature_order,
            feature_importances: Vec::new(),
            model_type: "logistic".to_string(),
            loaded_at: None,
        }
    }

    pub fn layout_hash(&self) -> u32 {
        layout_hash(&self.feature_order)
    }

    pub fn feature_count(&self) -> usize {
        self.feature_order.len()
    }

    /// Highest-importance features first
    pub fn top_features(&self, n: usize) -> Vec<FeatureImportance> {
        let mut ranked = self.feature_importances.clone();
        ranked.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }
}

// ============================================================================
// CAPABILITY TRAIT
// ============================================================================

/// Trait for fitted models (in-process linear, ONNX, ...)
pub trait ModelArtifact: Send + Sync {
    fn metadata(&self) -> &ArtifactMetadata;

    /// Scale a vector built in `metadata().feature_order`
    fn transform(&self, vector: &FeatureVector) -> RiskResult<Array1<f64>>;

    /// Probability of the positive class for a scaled vector
    fn predict_probability(&self, scaled: &Array1<f64>) -> RiskResult<f64>;
}

/// Reject probabilities a broken model could emit
pub fn check_probability(p: f64) -> RiskResult<f64> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(RiskError::ModelUnavailable(format!(
            "model returned invalid probability {}",
            p
        )));
    }
    Ok(p)
}

// ============================================================================
// STANDARD SCALER
// ============================================================================

/// z = (x - mean) / scale, as fitted on the training split
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> RiskResult<Self> {
        if mean.len() != scale.len() {
            return Err(RiskError::ArtifactLoad(format!(
                "scaler mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        // Constant columns were fitted with zero variance
        let scale = scale
            .into_iter()
            .map(|s| if s.abs() < f64::EPSILON { 1.0 } else { s })
            .collect::<Vec<_>>();

        Ok(Self {
            mean: Array1::from(mean),
            scale: Array1::from(scale),
        })
    }

    /// Pass-through scaler for models fit on raw features
    pub fn identity(n: usize) -> Self {
        Self {
            mean: Array1::zeros(n),
            scale: Array1::ones(n),
        }
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    pub fn transform(&self, x: &Array1<f64>) -> RiskResult<Array1<f64>> {
        if x.len() != self.mean.len() {
            return Err(RiskError::ModelUnavailable(format!(
                "scaler expects {} features, got {}",
                self.mean.len(),
                x.len()
            )));
        }
        Ok((x - &self.mean) / &self.scale)
    }
}

// ============================================================================
// LOGISTIC ARTIFACT
// ============================================================================

/// Standardized logistic regression evaluated in-process
#[derive(Debug, Clone)]
pub struct LogisticArtifact {
    metadata: ArtifactMetadata,
    scaler: StandardScaler,
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LogisticArtifact {
    pub fn new(
        metadata: ArtifactMetadata,
        scaler: StandardScaler,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> RiskResult<Self> {
        let n = metadata.feature_count();
        if scaler.len() != n || coefficients.len() != n {
            return Err(RiskError::ArtifactLoad(format!(
                "artifact declares {} features but scaler has {} and model has {}",
                n,
                scaler.len(),
                coefficients.len()
            )));
        }

        Ok(Self {
            metadata,
            scaler,
            coefficients: Array1::from(coefficients),
            intercept,
        })
    }
}

impl ModelArtifact for LogisticArtifact {
    fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    fn transform(&self, vector: &FeatureVector) -> RiskResult<Array1<f64>> {
        vector
            .validate(self.metadata.layout_hash())
            .map_err(|e| RiskError::ModelUnavailable(e.to_string()))?;
        self.scaler.transform(&vector.to_array())
    }

    fn predict_probability(&self, scaled: &Array1<f64>) -> RiskResult<f64> {
        if scaled.len() != self.coefficients.len() {
            return Err(RiskError::ModelUnavailable(format!(
                "model expects {} features, got {}",
                self.coefficients.len(),
                scaled.len()
            )));
        }
        let z = self.coefficients.dot(scaled) + self.intercept;
        check_probability(1.0 / (1.0 + (-z).exp()))
    }
}
