//! ONNX Artifact - ONNX Runtime backed classifier
//!
//! Runs an exported probabilistic classifier (e.g. a random forest converted
//! with zipmap disabled). Scaling stays in-process; the session only sees the
//! standardized row.

use ndarray::{Array1, Array2};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::artifact::{check_probability, ArtifactMetadata, ModelArtifact, StandardScaler};
use crate::error::{RiskError, RiskResult};
use crate::logic::features::FeatureVector;

/// Output holding per-class probabilities in skl2onnx exports
const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxArtifact {
    metadata: ArtifactMetadata,
    scaler: StandardScaler,
    /// Running a session needs `&mut`; requests serialize on this lock only
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxArtifact {
    /// Load an exported model already in memory
    pub fn from_bytes(
        model_bytes: &[u8],
        metadata: ArtifactMetadata,
        scaler: StandardScaler,
    ) -> RiskResult<Self> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| RiskError::ArtifactLoad(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| RiskError::ArtifactLoad(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| RiskError::ArtifactLoad(format!("Load from memory error: {}", e)))?;

        Self::from_session(session, metadata, scaler)
    }

    fn from_session(
        session: Session,
        metadata: ArtifactMetadata,
        scaler: StandardScaler,
    ) -> RiskResult<Self> {
        if scaler.len() != metadata.feature_count() {
            return Err(RiskError::ArtifactLoad(format!(
                "artifact declares {} features but scaler has {}",
                metadata.feature_count(),
                scaler.len()
            )));
        }

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == PROBABILITY_OUTPUT)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| RiskError::ArtifactLoad("No output defined".to_string()))?;

        log::info!("ONNX model ready (probability output: {})", output_name);

        Ok(Self {
            metadata,
            scaler,
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl ModelArtifact for OnnxArtifact {
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
        let n = scaled.len();
        let row: Vec<f32> = scaled.iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, n), row)
            .map_err(|e| RiskError::ModelUnavailable(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| RiskError::ModelUnavailable(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| RiskError::ModelUnavailable(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| RiskError::ModelUnavailable("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| RiskError::ModelUnavailable(format!("Extract error: {}", e)))?;

        // [P(class 0), P(class 1)] or a single positive-class column
        let p = match data {
            [_, positive, ..] => *positive,
            [positive] => *positive,
            [] => return Err(RiskError::ModelUnavailable("Empty output".to_string())),
        };

        check_probability(p as f64)
    }
}
