//! Risk Module - Level classification and result types

pub mod classifier;
pub mod rules;
pub mod types;

// Re-export common types
pub use classifier::{bucket_table, classify};
pub use rules::{BucketTable, RULE_BASED_BUCKETS, STATISTICAL_BUCKETS};
pub use types::{RiskAssessment, RiskLevel, StrategyKind};
