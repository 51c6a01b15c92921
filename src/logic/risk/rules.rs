//! Risk Bucket Tables
//!
//! Two independent tables, one per strategy. They disagree on purpose:
//! changing a boundary changes what a patient is told, so they are kept as
//! separate named policies.
//! NO classification logic here - constants only.

use super::types::RiskLevel;

// ============================================================================
// BUCKET TABLE
// ============================================================================

/// Ordered `(upper bound exclusive, level)` pairs plus the top bucket
#[derive(Debug, Clone, Copy)]
pub struct BucketTable {
    pub name: &'static str,
    pub buckets: &'static [(f64, RiskLevel)],
    pub top: RiskLevel,
}

impl BucketTable {
    pub fn level(&self, score: f64) -> RiskLevel {
        self.buckets
            .iter()
            .find(|(upper, _)| score < *upper)
            .map(|(_, level)| *level)
            .unwrap_or(self.top)
    }
}

// ============================================================================
// TABLES
// ============================================================================

/// Statistical path, score = probability x 100
pub const STATISTICAL_BUCKETS: BucketTable = BucketTable {
    name: "statistical",
    buckets: &[
        (15.0, RiskLevel::VeryLow),
        (35.0, RiskLevel::Low),
        (60.0, RiskLevel::Moderate),
        (80.0, RiskLevel::High),
    ],
    top: RiskLevel::VeryHigh,
};

/// Rule-based path. Has no Very Low bucket.
pub const RULE_BASED_BUCKETS: BucketTable = BucketTable {
    name: "rule_based",
    buckets: &[
        (25.0, RiskLevel::Low),
        (45.0, RiskLevel::Moderate),
        (70.0, RiskLevel::High),
    ],
    top: RiskLevel::VeryHigh,
};
