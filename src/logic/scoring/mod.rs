//! Scoring Module - One capability, two implementations
//!
//! The orchestrator picks a strategy once per request and calls `score`.
//! Neither strategy knows the other exists.

pub mod rule_based;
pub mod rules;
pub mod statistical;

use serde::{Deserialize, Serialize};

use crate::error::RiskResult;
use crate::logic::features::InputRecord;
pub use crate::logic::risk::StrategyKind;

pub use rule_based::{RuleBasedStrategy, RuleBreakdown};
pub use statistical::StatisticalStrategy;

/// Output of a strategy before classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyScore {
    pub kind: StrategyKind,
    /// 0 - 100
    pub risk_score: f64,
    pub predicted_label: u8,
    /// 0 - 100
    pub confidence: f64,
    pub threshold_used: f64,
    pub accuracy_meta: f64,
    pub features_used: usize,
}

pub trait ScoringStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn score(&self, record: &InputRecord) -> RiskResult<StrategyScore>;
}
