//! Recommendation Catalog
//!
//! Fixed advice strings. Ordering and selection live in `engine`.

// ============================================================================
// CONDITION-SPECIFIC
// ============================================================================

pub const BMI_OBESE: &[&str] = &[
    "Consult a healthcare provider for weight management strategies",
    "Consider a medically supervised nutrition plan",
];

pub const BMI_OVERWEIGHT: &[&str] = &[
    "Increase physical activity to 150+ minutes per week",
    "Focus on a balanced, portion-controlled diet",
];

pub const BMI_UNDERWEIGHT: &[&str] = &["Consult a nutritionist for healthy weight gain strategies"];

pub const AGE_YOUNG: &str = "Focus on establishing healthy lifestyle habits early";
pub const AGE_SENIOR: &str = "Consider comprehensive hormone panels annually";

pub const WEIGHT_GAIN: &str = "Track weight changes and eating patterns";
pub const HAIR_GROWTH: &str = "Discuss androgen levels with your healthcare provider";
pub const ACNE: &str = "Consider dermatological evaluation for hormonal acne";

pub const NO_EXERCISE: &str = "Start with 30 minutes of moderate exercise daily";
pub const FAST_FOOD: &str = "Reduce processed food intake and increase whole foods";

pub const IRREGULAR_CYCLE: &str = "Keep a detailed menstrual cycle diary for 3 months";

// ============================================================================
// RISK BANDS
// ============================================================================

/// One band of the 0-100 score: anchor goes first, follow-up after the
/// condition-specific advice
#[derive(Debug, Clone, Copy)]
pub struct RiskBand {
    /// Band applies when `score > above`
    pub above: f64,
    pub anchor: &'static str,
    pub follow_up: Option<&'static str>,
}

/// Highest band first; the last band catches everything
pub const RISK_BANDS: &[RiskBand] = &[
    RiskBand {
        above: 70.0,
        anchor: "Schedule an appointment with a gynecologist soon",
        follow_up: Some("Request comprehensive hormone testing (FSH, LH, testosterone, insulin)"),
    },
    RiskBand {
        above: 50.0,
        anchor: "Monitor symptoms closely and track patterns",
        follow_up: Some("Implement stress management techniques"),
    },
    RiskBand {
        above: 30.0,
        anchor: "Continue current healthy habits and monitor changes",
        follow_up: None,
    },
    RiskBand {
        above: f64::NEG_INFINITY,
        anchor: "Maintain your excellent health habits!",
        follow_up: None,
    },
];

// ============================================================================
// GENERAL WELLNESS (always appended, in this order)
// ============================================================================

pub const WELLNESS: &[&str] = &[
    "Ensure 7-9 hours of quality sleep nightly",
    "Practice stress reduction techniques like meditation",
    "Stay well-hydrated throughout the day",
];
