//! Artifact Loader - Startup adapter from disk to `ModelArtifact`
//!
//! Reads the metadata JSON written next to the fitted model, verifies it and
//! builds the matching artifact. Called once; a failure here leaves the
//! orchestrator without an artifact rather than aborting the process.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::artifact::{
    ArtifactMetadata, FeatureImportance, LogisticArtifact, ModelArtifact, StandardScaler,
};
use crate::error::{RiskError, RiskResult};
use crate::logic::features::layout::{validate_layout, LayoutInfo};

/// Threshold assumed when an older metadata file does not record one
pub const FALLBACK_THRESHOLD: f64 = 0.5;

// ============================================================================
// FILE FORMAT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerFile {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// `model_info.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub accuracy: f64,
    #[serde(default)]
    pub accuracy_default: Option<f64>,
    #[serde(default = "fallback_threshold")]
    pub optimal_threshold: f64,
    pub features: Vec<String>,
    #[serde(default)]
    pub feature_importance: Vec<FeatureImportance>,
    #[serde(default)]
    pub layout_hash: Option<u32>,
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default)]
    pub scaler: Option<ScalerFile>,
    #[serde(default)]
    pub coefficients: Option<Vec<f64>>,
    #[serde(default)]
    pub intercept: Option<f64>,
    #[serde(default)]
    pub onnx_file: Option<String>,
    #[serde(default)]
    pub onnx_sha256: Option<String>,
}

fn fallback_threshold() -> f64 {
    FALLBACK_THRESHOLD
}

fn default_model_type() -> String {
    "logistic".to_string()
}

impl ArtifactFile {
    fn validate(&self) -> RiskResult<()> {
        if self.features.is_empty() {
            return Err(RiskError::ArtifactLoad("empty feature list".to_string()));
        }
        if !(0.0..=1.0).contains(&self.optimal_threshold) {
            return Err(RiskError::ArtifactLoad(format!(
                "optimal_threshold {} outside [0, 1]",
                self.optimal_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.accuracy) {
            return Err(RiskError::ArtifactLoad(format!(
                "accuracy {} outside [0, 1]",
                self.accuracy
            )));
        }
        if let Some(expected) = self.layout_hash {
            validate_layout(&self.features, expected)?;
        }
        Ok(())
    }

    fn metadata(&self) -> ArtifactMetadata {
        ArtifactMetadata {
            accuracy: self.accuracy,
            accuracy_default: self.accuracy_default,
            optimal_threshold: self.optimal_threshold,
            feature_order: self.features.clone(),
            feature_importances: self.feature_importance.clone(),
            model_type: self.model_type.clone(),
            loaded_at: Some(chrono::Utc::now()),
        }
    }

    fn scaler(&self) -> RiskResult<StandardScaler> {
        match &self.scaler {
            Some(s) => StandardScaler::new(s.mean.clone(), s.scale.clone()),
            None => Ok(StandardScaler::identity(self.features.len())),
        }
    }
}

// ============================================================================
// CHECKSUMS
// ============================================================================

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn verify_checksum(what: &str, bytes: &[u8], expected: &str) -> RiskResult<()> {
    let actual = sha256_hex(bytes);
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(RiskError::ArtifactLoad(format!(
            "{} checksum mismatch: expected {}, got {}",
            what, expected, actual
        )));
    }
    Ok(())
}

// ============================================================================
// LOADING
// ============================================================================

/// Load `<dir>/<metadata_file>` and build the artifact it describes
pub fn load_artifact(
    dir: &Path,
    metadata_file: &str,
    expected_checksum: Option<&str>,
) -> RiskResult<Arc<dyn ModelArtifact>> {
    let path = dir.join(metadata_file);
    log::info!("Loading model artifact from: {}", path.display());

    let bytes = fs::read(&path).map_err(|e| {
        RiskError::ArtifactLoad(format!("cannot read {}: {}", path.display(), e))
    })?;

    if let Some(expected) = expected_checksum {
        verify_checksum("metadata", &bytes, expected)?;
    }

    let file: ArtifactFile = serde_json::from_slice(&bytes)
        .map_err(|e| RiskError::ArtifactLoad(format!("malformed {}: {}", path.display(), e)))?;

    build_artifact(&file, dir)
}

/// Build an artifact from already-parsed metadata. `dir` resolves `onnx_file`.
pub fn build_artifact(file: &ArtifactFile, dir: &Path) -> RiskResult<Arc<dyn ModelArtifact>> {
    file.validate()?;

    let layout = LayoutInfo::of(&file.features);
    if !layout.unknown_features.is_empty() {
        log::debug!(
            "Artifact features outside the feature table (exact key only): {:?}",
            layout.unknown_features
        );
    }

    let artifact: Arc<dyn ModelArtifact> = match file.model_type.as_str() {
        "logistic" => {
            let coefficients = file.coefficients.clone().ok_or_else(|| {
                RiskError::ArtifactLoad("logistic artifact without coefficients".to_string())
            })?;
            Arc::new(LogisticArtifact::new(
                file.metadata(),
                file.scaler()?,
                coefficients,
                file.intercept.unwrap_or(0.0),
            )?)
        }
        "onnx" => build_onnx(file, dir)?,
        other => {
            return Err(RiskError::ArtifactLoad(format!(
                "unsupported model_type '{}'",
                other
            )))
        }
    };

    log::info!(
        "Model artifact ready: {} ({} features, layout {:08x}, threshold {:.3}, accuracy {:.1}%)",
        file.model_type,
        layout.feature_count,
        layout.hash,
        file.optimal_threshold,
        file.accuracy * 100.0
    );

    Ok(artifact)
}

#[cfg(feature = "onnx")]
fn build_onnx(file: &ArtifactFile, dir: &Path) -> RiskResult<Arc<dyn ModelArtifact>> {
    use super::onnx::OnnxArtifact;

    let name = file
        .onnx_file
        .as_deref()
        .ok_or_else(|| RiskError::ArtifactLoad("onnx artifact without onnx_file".to_string()))?;
    let path = dir.join(name);

    let bytes = fs::read(&path).map_err(|e| {
        RiskError::ArtifactLoad(format!("cannot read {}: {}", path.display(), e))
    })?;
    if let Some(expected) = file.onnx_sha256.as_deref() {
        verify_checksum("onnx payload", &bytes, expected)?;
    }

    Ok(Arc::new(OnnxArtifact::from_bytes(
        &bytes,
        file.metadata(),
        file.scaler()?,
    )?))
}

#[cfg(not(feature = "onnx"))]
fn build_onnx(_file: &ArtifactFile, _dir: &Path) -> RiskResult<Arc<dyn ModelArtifact>> {
    Err(RiskError::ArtifactLoad(
        "onnx artifacts need the `onnx` cargo feature".to_string(),
    ))
}
