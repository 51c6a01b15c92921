//! Model Module - Fitted model capability
//!
//! Artifacts, their startup loader, and the offline threshold selector whose
//! output every artifact carries.

pub mod artifact;
pub mod loader;
pub mod threshold;

#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use artifact::{
    check_probability, ArtifactMetadata, FeatureImportance, LogisticArtifact, ModelArtifact,
    StandardScaler,
};
pub use loader::{load_artifact, ArtifactFile};
pub use threshold::{accuracy_at, select_threshold, LabeledScore, RocPoint, ThresholdSelection};

#[cfg(feature = "onnx")]
pub use onnx::OnnxArtifact;
