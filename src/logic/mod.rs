//! Logic Module - Scoring Core
//!
//! - `features/` - Alias resolution, derived features, ordered vectors
//! - `model/` - Artifact capability, loader, threshold selection
//! - `scoring/` - Statistical and rule-based strategies
//! - `risk/` - Level buckets and result types
//! - `recommend/` - Advice list construction
//! - `orchestrator` - Request state machine

pub mod config;
pub mod features;
pub mod model;
pub mod orchestrator;
pub mod recommend;
pub mod risk;
pub mod scoring;

pub use config::EngineConfig;
pub use orchestrator::{AssessmentResponse, AssessmentStage, EngineStatus, ModelInfo, RiskOrchestrator};
