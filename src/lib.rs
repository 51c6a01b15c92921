//! PCOS risk scoring core.
//!
//! Sparse, loosely named measurements in; risk score, level and a short
//! prioritized advice list out. A fitted model is used when one is loaded,
//! clinical rules otherwise.

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{RiskError, RiskResult};
pub use logic::features::InputRecord;
pub use logic::risk::{RiskAssessment, RiskLevel, StrategyKind};
pub use logic::{AssessmentResponse, EngineConfig, RiskOrchestrator};
