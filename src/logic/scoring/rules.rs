//! Clinical Scoring Rules
//!
//! Additive deltas for the rule-based scorer. All integer points.
//! NO scoring logic here - constants only.

// ============================================================================
// BASE & BOUNDS
// ============================================================================

pub const BASE_SCORE: i32 = 20;

pub const MIN_SCORE: i32 = 5;
pub const MAX_SCORE: i32 = 95;

/// Jitter is drawn from [-JITTER_SPAN, JITTER_SPAN]
pub const JITTER_SPAN: i32 = 5;

// ============================================================================
// AGE
// ============================================================================

pub const AGE_MINOR_LIMIT: f64 = 18.0;
pub const AGE_MINOR_DELTA: i32 = 5;

pub const AGE_SENIOR_LIMIT: f64 = 35.0;
pub const AGE_SENIOR_DELTA: i32 = 15;

/// Peak reproductive years, inclusive
pub const AGE_PEAK_RANGE: (f64, f64) = (25.0, 30.0);
pub const AGE_PEAK_DELTA: i32 = 8;

// ============================================================================
// BMI
// ============================================================================

/// Used when height is not positive
pub const DEFAULT_BMI: f64 = 23.0;

/// `(upper bound exclusive, delta)`; anything above the last bound gets
/// `BMI_SEVERE_OBESE_DELTA`
pub const BMI_BRACKETS: &[(f64, i32)] = &[
    (18.5, 10), // Underweight
    (25.0, 0),  // Normal
    (30.0, 20), // Overweight
    (35.0, 35), // Obese class I
];
pub const BMI_SEVERE_OBESE_DELTA: i32 = 45;

// ============================================================================
// CYCLE & SYMPTOMS
// ============================================================================

pub const IRREGULAR_CYCLE_DELTA: i32 = 25;

pub const WEIGHT_GAIN_DELTA: i32 = 12;
/// Hirsutism is a key marker
pub const HAIR_GROWTH_DELTA: i32 = 15;
pub const PIMPLES_DELTA: i32 = 8;

// ============================================================================
// LIFESTYLE
// ============================================================================

pub const NO_EXERCISE_DELTA: i32 = 10;
pub const FAST_FOOD_DELTA: i32 = 8;

// ============================================================================
// PRESENTATION
// ============================================================================

/// confidence = CONFIDENCE_BASE + score mod 10
pub const CONFIDENCE_BASE: f64 = 85.0;

/// Scores above this are reported as the positive class
pub const POSITIVE_SCORE_CUT: f64 = 50.0;

/// Reported threshold on the probability scale
pub const RULE_THRESHOLD: f64 = 0.5;

/// Documented accuracy of the clinical rules
pub const RULE_ACCURACY: f64 = 0.685;
