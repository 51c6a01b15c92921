//! Recommendation Engine
//!
//! Order is part of the output contract:
//! 1. condition-specific advice (BMI, age, symptoms, lifestyle, cycle)
//! 2. band follow-up, if any
//! 3. general wellness
//! then the band anchor goes to the front and the list is cut to the limit.
//! The cut may drop wellness items; the anchor always survives.

use serde::{Deserialize, Serialize};

use super::catalog;
use crate::error::RiskResult;
use crate::logic::features::layout::{
    AGE, BMI, CYCLE, EXERCISE, FAST_FOOD, HAIR_GROWTH, HEIGHT, PIMPLES, WEIGHT, WEIGHT_GAIN,
};
use crate::logic::features::{resolve, resolve_traced, InputRecord, ValueSource};
use crate::logic::risk::RiskLevel;
use crate::logic::scoring::rule_based::bmi_from;
use crate::logic::scoring::rules::DEFAULT_BMI;

/// Hard cap on list length
pub const MAX_RECOMMENDATIONS: usize = 5;

fn supplied(name: &str, record: &InputRecord) -> RiskResult<bool> {
    Ok(matches!(
        resolve_traced(name, record)?.source,
        ValueSource::Canonical | ValueSource::Alias(_)
    ))
}

fn is_set(name: &str, record: &InputRecord, value: i64) -> RiskResult<bool> {
    Ok(resolve(name, record)?.trunc() as i64 == value)
}

// ============================================================================
// SIGNALS
// ============================================================================

/// What the advice rules look at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub bmi: f64,
    pub age: f64,
    pub weight_gain: bool,
    pub hair_growth: bool,
    pub acne: bool,
    pub no_exercise: bool,
    pub fast_food: bool,
    pub irregular_cycle: bool,
}

impl Signals {
    pub fn from_record(record: &InputRecord) -> RiskResult<Self> {
        // Explicit BMI, else weight/height, else the population default
        let bmi = if supplied(BMI, record)? {
            resolve(BMI, record)?
        } else if supplied(WEIGHT, record)? || supplied(HEIGHT, record)? {
            bmi_from(resolve(WEIGHT, record)?, resolve(HEIGHT, record)?)
        } else {
            DEFAULT_BMI
        };

        let acne_only = record
            .number("acne", PIMPLES)?
            .map_or(false, |v| v.trunc() as i64 == 1);

        Ok(Self {
            bmi,
            age: resolve(AGE, record)?,
            weight_gain: is_set(WEIGHT_GAIN, record, 1)?,
            hair_growth: is_set(HAIR_GROWTH, record, 1)?,
            acne: is_set(PIMPLES, record, 1)? || acne_only,
            no_exercise: is_set(EXERCISE, record, 0)?,
            fast_food: is_set(FAST_FOOD, record, 1)?,
            irregular_cycle: is_set(CYCLE, record, 0)?,
        })
    }

    fn specific_advice(&self) -> Vec<&'static str> {
        let mut advice = Vec::new();

        if self.bmi > 30.0 {
            advice.extend_from_slice(catalog::BMI_OBESE);
        } else if self.bmi > 25.0 {
            advice.extend_from_slice(catalog::BMI_OVERWEIGHT);
        } else if self.bmi < 18.5 {
            advice.extend_from_slice(catalog::BMI_UNDERWEIGHT);
        }

        if self.age < 20.0 {
            advice.push(catalog::AGE_YOUNG);
        } else if self.age > 35.0 {
            advice.push(catalog::AGE_SENIOR);
        }

        if self.weight_gain {
            advice.push(catalog::WEIGHT_GAIN);
        }
        if self.hair_growth {
            advice.push(catalog::HAIR_GROWTH);
        }
        if self.acne {
            advice.push(catalog::ACNE);
        }

        if self.no_exercise {
            advice.push(catalog::NO_EXERCISE);
        }
        if self.fast_food {
            advice.push(catalog::FAST_FOOD);
        }

        if self.irregular_cycle {
            advice.push(catalog::IRREGULAR_CYCLE);
        }

        advice
    }
}

// ============================================================================
// GENERATION
// ============================================================================

pub fn band_for(risk_score: f64) -> &'static catalog::RiskBand {
    catalog::RISK_BANDS
        .iter()
        .find(|band| risk_score > band.above)
        .unwrap_or(&catalog::RISK_BANDS[catalog::RISK_BANDS.len() - 1])
}

/// Ordered, truncated list from precomputed signals
pub fn build(signals: &Signals, risk_score: f64, limit: usize) -> Vec<String> {
    let band = band_for(risk_score);

    let mut items: Vec<&'static str> = signals.specific_advice();
    if let Some(follow_up) = band.follow_up {
        items.push(follow_up);
    }
    items.insert(0, band.anchor);
    items.extend_from_slice(catalog::WELLNESS);

    items.truncate(limit.clamp(1, MAX_RECOMMENDATIONS));
    items.into_iter().map(str::to_string).collect()
}

pub fn generate(record: &InputRecord, risk_score: f64, risk_level: RiskLevel) -> RiskResult<Vec<String>> {
    generate_with_limit(record, risk_score, risk_level, MAX_RECOMMENDATIONS)
}

pub fn generate_with_limit(
    record: &InputRecord,
    risk_score: f64,
    risk_level: RiskLevel,
    limit: usize,
) -> RiskResult<Vec<String>> {
    let signals = Signals::from_record(record)?;
    let recommendations = build(&signals, risk_score, limit);
    log::debug!(
        "{} recommendations for {} risk ({:.1})",
        recommendations.len(),
        risk_level,
        risk_score
    );
    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Signals {
        Signals {
            bmi: 22.0,
            age: 27.0,
            weight_gain: false,
            hair_growth: false,
            acne: false,
            no_exercise: false,
            fast_food: false,
            irregular_cycle: false,
        }
    }

    #[test]
    fn test_low_risk_is_anchor_plus_wellness() {
        let list = build(&quiet(), 12.0, MAX_RECOMMENDATIONS);
        assert_eq!(list.len(), 4);
        assert_eq!(list[0], "Maintain your excellent health habits!");
        assert_eq!(&list[1..], catalog::WELLNESS);
    }

    #[test]
    fn test_anchor_leads_every_band() {
        for (score, anchor) in [
            (95.0, "Schedule an appointment with a gynecologist soon"),
            (60.0, "Monitor symptoms closely and track patterns"),
            (40.0, "Continue current healthy habits and monitor changes"),
            (30.0, "Maintain your excellent health habits!"),
        ] {
            let list = build(&quiet(), score, MAX_RECOMMENDATIONS);
            assert_eq!(list[0], anchor, "score {}", score);
        }
    }

    #[test]
    fn test_follow_up_after_specific_advice() {
        let signals = Signals { weight_gain: true, ..quiet() };
        let list = build(&signals, 80.0, MAX_RECOMMENDATIONS);
        assert_eq!(
            list,
            vec![
                "Schedule an appointment with a gynecologist soon",
                catalog::WEIGHT_GAIN,
                "Request comprehensive hormone testing (FSH, LH, testosterone, insulin)",
                catalog::WELLNESS[0],
                catalog::WELLNESS[1],
            ]
        );
    }

    #[test]
    fn test_many_rules_crowd_out_wellness() {
        let signals = Signals {
            bmi: 33.0,
            age: 40.0,
            weight_gain: true,
            hair_growth: true,
            acne: true,
            no_exercise: true,
            fast_food: true,
            irregular_cycle: true,
        };
        let list = build(&signals, 95.0, MAX_RECOMMENDATIONS);
        assert_eq!(list.len(), 5);
        assert_eq!(list[0], "Schedule an appointment with a gynecologist soon");
        assert_eq!(list[1], catalog::BMI_OBESE[0]);
        assert_eq!(list[2], catalog::BMI_OBESE[1]);
        assert_eq!(list[3], catalog::AGE_SENIOR);
        assert_eq!(list[4], catalog::WEIGHT_GAIN);
        assert!(list.iter().all(|item| !catalog::WELLNESS.contains(&item.as_str())));
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(build(&quiet(), 12.0, 2).len(), 2);
        assert_eq!(build(&quiet(), 12.0, 0).len(), 1);
        assert_eq!(build(&quiet(), 95.0, 50).len(), 5);
    }

    #[test]
    fn test_bmi_source_precedence() {
        let explicit = InputRecord::new().with("bmi", 31.0).with("weight", 50).with("height", 170);
        assert_eq!(Signals::from_record(&explicit).unwrap().bmi, 31.0);

        let derived = InputRecord::new().with("weight", 81).with("height", 180);
        let bmi = Signals::from_record(&derived).unwrap().bmi;
        assert!((bmi - 25.0).abs() < 1e-9);

        assert_eq!(Signals::from_record(&InputRecord::new()).unwrap().bmi, DEFAULT_BMI);
    }

    #[test]
    fn test_acne_key_triggers_skin_advice() {
        let record = InputRecord::new().with("pimples", 0).with("acne", 1);
        assert!(Signals::from_record(&record).unwrap().acne);

        let list = generate(&record, 20.0, RiskLevel::Low).unwrap();
        assert_eq!(list[1], catalog::ACNE);
    }

    #[test]
    fn test_never_more_than_five() {
        let record = InputRecord::new()
            .with("bmi", 40)
            .with("age", 16)
            .with("weight_gain", 1)
            .with("hair_growth", 1)
            .with("pimples", 1)
            .with("regular_exercise", 0)
            .with("fast_food", 1)
            .with("cycle_regular", 0);
        for score in [5.0, 35.0, 55.0, 75.0, 95.0] {
            let list = generate(&record, score, RiskLevel::High).unwrap();
            assert!(list.len() <= 5);
        }
    }
}
