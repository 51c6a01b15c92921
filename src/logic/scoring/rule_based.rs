//! Rule-Based Strategy - Clinical heuristics, no artifact
//!
//! Additive point score from raw measurements and symptom flags, a small
//! input-seeded jitter, then a clamp to [5, 95]. Always available.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::rules::*;
use super::{ScoringStrategy, StrategyKind, StrategyScore};
use crate::error::RiskResult;
use crate::logic::features::layout::{
    AGE, CYCLE, EXERCISE, FAST_FOOD, HAIR_GROWTH, HEIGHT, PIMPLES, WEIGHT, WEIGHT_GAIN,
};
use crate::logic::features::{resolve, InputRecord};

/// Canonical features the rules read
pub const RULE_FEATURES: &[&str] = &[
    AGE, WEIGHT, HEIGHT, CYCLE, WEIGHT_GAIN, HAIR_GROWTH, PIMPLES, EXERCISE, FAST_FOOD,
];

// ============================================================================
// INPUTS
// ============================================================================

/// Raw values after alias resolution. Flags are truncated to integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleInputs {
    pub age: f64,
    pub weight: f64,
    pub height: f64,
    pub cycle_regular: i64,
    pub weight_gain: i64,
    pub hair_growth: i64,
    pub pimples: i64,
    pub exercise: i64,
    pub fast_food: i64,
}

fn flag(name: &str, record: &InputRecord) -> RiskResult<i64> {
    Ok(resolve(name, record)?.trunc() as i64)
}

impl RuleInputs {
    pub fn from_record(record: &InputRecord) -> RiskResult<Self> {
        Ok(Self {
            age: resolve(AGE, record)?,
            weight: resolve(WEIGHT, record)?,
            height: resolve(HEIGHT, record)?,
            cycle_regular: flag(CYCLE, record)?,
            weight_gain: flag(WEIGHT_GAIN, record)?,
            hair_growth: flag(HAIR_GROWTH, record)?,
            pimples: flag(PIMPLES, record)?,
            exercise: flag(EXERCISE, record)?,
            fast_food: flag(FAST_FOOD, record)?,
        })
    }

    pub fn bmi(&self) -> f64 {
        bmi_from(self.weight, self.height)
    }

    /// int(age + weight + height)
    pub fn seed(&self) -> i64 {
        (self.age + self.weight + self.height).trunc() as i64
    }
}

/// weight(kg) / height(m)^2, `DEFAULT_BMI` when height is not positive
pub fn bmi_from(weight: f64, height_cm: f64) -> f64 {
    if height_cm > 0.0 {
        let meters = height_cm / 100.0;
        weight / (meters * meters)
    } else {
        DEFAULT_BMI
    }
}

// ============================================================================
// DELTAS
// ============================================================================

pub fn age_delta(age: f64) -> i32 {
    let (peak_lo, peak_hi) = AGE_PEAK_RANGE;
    if age < AGE_MINOR_LIMIT {
        AGE_MINOR_DELTA
    } else if age > AGE_SENIOR_LIMIT {
        AGE_SENIOR_DELTA
    } else if (peak_lo..=peak_hi).contains(&age) {
        AGE_PEAK_DELTA
    } else {
        0
    }
}

pub fn bmi_delta(bmi: f64) -> i32 {
    BMI_BRACKETS
        .iter()
        .find(|(upper, _)| bmi < *upper)
        .map(|(_, delta)| *delta)
        .unwrap_or(BMI_SEVERE_OBESE_DELTA)
}

/// Same seed, same jitter. The generator is local to the call.
pub fn jitter(seed: i64) -> i32 {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    rng.gen_range(-JITTER_SPAN..=JITTER_SPAN)
}

// ============================================================================
// BREAKDOWN
// ============================================================================

/// Every term of a rule-based score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBreakdown {
    pub inputs: RuleInputs,
    pub bmi: f64,
    pub base: i32,
    pub age_delta: i32,
    pub bmi_delta: i32,
    pub cycle_delta: i32,
    pub symptom_delta: i32,
    pub lifestyle_delta: i32,
    pub jitter: i32,
    /// Clamped final score
    pub risk_score: i32,
}

impl RuleBreakdown {
    /// Sum before jitter and clamp
    pub fn subtotal(&self) -> i32 {
        self.base
            + self.age_delta
            + self.bmi_delta
            + self.cycle_delta
            + self.symptom_delta
            + self.lifestyle_delta
    }

    fn compute(inputs: RuleInputs) -> Self {
        let bmi = inputs.bmi();

        let cycle_delta = if inputs.cycle_regular == 0 { IRREGULAR_CYCLE_DELTA } else { 0 };

        let mut symptom_delta = 0;
        if inputs.weight_gain == 1 {
            symptom_delta += WEIGHT_GAIN_DELTA;
        }
        if inputs.hair_growth == 1 {
            symptom_delta += HAIR_GROWTH_DELTA;
        }
        if inputs.pimples == 1 {
            symptom_delta += PIMPLES_DELTA;
        }

        let mut lifestyle_delta = 0;
        if inputs.exercise == 0 {
            lifestyle_delta += NO_EXERCISE_DELTA;
        }
        if inputs.fast_food == 1 {
            lifestyle_delta += FAST_FOOD_DELTA;
        }

        let mut breakdown = Self {
            bmi,
            base: BASE_SCORE,
            age_delta: age_delta(inputs.age),
            bmi_delta: bmi_delta(bmi),
            cycle_delta,
            symptom_delta,
            lifestyle_delta,
            jitter: jitter(inputs.seed()),
            risk_score: 0,
            inputs,
        };
        breakdown.risk_score = (breakdown.subtotal() + breakdown.jitter).clamp(MIN_SCORE, MAX_SCORE);
        breakdown
    }
}

// ============================================================================
// STRATEGY
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedStrategy;

impl RuleBasedStrategy {
    pub fn new() -> Self {
        Self
    }

    pub fn score_breakdown(&self, record: &InputRecord) -> RiskResult<RuleBreakdown> {
        let breakdown = RuleBreakdown::compute(RuleInputs::from_record(record)?);
        log::debug!(
            "Rule score: base {} + age {} + bmi {} (bmi {:.1}) + cycle {} + symptoms {} + lifestyle {} + jitter {} -> {}",
            breakdown.base,
            breakdown.age_delta,
            breakdown.bmi_delta,
            breakdown.bmi,
            breakdown.cycle_delta,
            breakdown.symptom_delta,
            breakdown.lifestyle_delta,
            breakdown.jitter,
            breakdown.risk_score
        );
        Ok(breakdown)
    }
}

impl ScoringStrategy for RuleBasedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RuleBased
    }

    fn score(&self, record: &InputRecord) -> RiskResult<StrategyScore> {
        let breakdown = self.score_breakdown(record)?;
        let score = breakdown.risk_score;

        Ok(StrategyScore {
            kind: StrategyKind::RuleBased,
            risk_score: score as f64,
            predicted_label: u8::from(score as f64 > POSITIVE_SCORE_CUT),
            confidence: CONFIDENCE_BASE + (score % 10) as f64,
            threshold_used: RULE_THRESHOLD,
            accuracy_meta: RULE_ACCURACY,
            features_used: RULE_FEATURES.len(),
        })
    }
}
