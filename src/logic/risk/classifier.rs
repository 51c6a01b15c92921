//! Risk Classifier
//!
//! Maps a 0-100 score to a `RiskLevel` using the table of the strategy that
//! produced it.

use super::rules::{BucketTable, RULE_BASED_BUCKETS, STATISTICAL_BUCKETS};
use super::types::{RiskLevel, StrategyKind};

pub fn bucket_table(strategy: StrategyKind) -> &'static BucketTable {
    match strategy {
        StrategyKind::Statistical => &STATISTICAL_BUCKETS,
        StrategyKind::RuleBased => &RULE_BASED_BUCKETS,
    }
}

pub fn classify(score: f64, strategy: StrategyKind) -> RiskLevel {
    let table = bucket_table(strategy);
    let level = table.level(score);
    log::debug!("Score {:.1} -> {} ({} buckets)", score, level, table.name);
    level
}
