//! Feature Layout - Declarative feature table
//!
//! **CRITICAL: the vector order is NOT defined here.**
//!
//! The order of a feature vector always comes from the artifact that consumes
//! it (`ArtifactMetadata::feature_order`). This table only says, per canonical
//! name, which request keys may supply the value, what the default is, and
//! whether the value is derived from other features instead of looked up.
//!
//! ## Rules
//! 1. Aliases are checked in declared order, first present wins.
//! 2. A derived feature ignores raw lookup entirely.
//! 3. Missing values fall back to the default; they are never an error.

use std::collections::HashMap;

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::record::InputRecord;
use super::resolver::resolve;
use crate::error::{RiskError, RiskResult};

// ============================================================================
// CANONICAL NAMES (training column names)
// ============================================================================

pub const AGE: &str = "Age (yrs)";
pub const WEIGHT: &str = "Weight (Kg)";
pub const HEIGHT: &str = "Height(Cm)";
pub const BMI: &str = "BMI";
pub const CYCLE: &str = "Cycle(R/I)";
pub const CYCLE_LENGTH: &str = "Cycle length(days)";
pub const WEIGHT_GAIN: &str = "Weight gain(Y/N)";
pub const HAIR_GROWTH: &str = "hair growth(Y/N)";
pub const PIMPLES: &str = "Pimples(Y/N)";
pub const FAST_FOOD: &str = "Fast food (Y/N)";
pub const EXERCISE: &str = "Reg.Exercise(Y/N)";
pub const FSH: &str = "FSH(mIU/mL)";
pub const LH: &str = "LH(mIU/mL)";

pub const BMI_OVERWEIGHT: &str = "BMI_overweight";
pub const BMI_OBESE: &str = "BMI_obese";
pub const BMI_UNDERWEIGHT: &str = "BMI_underweight";
pub const AGE_HIGH_RISK: &str = "Age_high_risk";
pub const AGE_YOUNG: &str = "Age_young";
pub const AGE_PEAK_REPRODUCTIVE: &str = "Age_peak_reproductive";
pub const TOTAL_SYMPTOMS: &str = "Total_symptoms";
pub const MULTIPLE_SYMPTOMS: &str = "Multiple_symptoms";
pub const LH_FSH_RATIO: &str = "LH_FSH_ratio_calc";
pub const HIGH_LH_FSH_RATIO: &str = "High_LH_FSH_ratio";
pub const POOR_LIFESTYLE: &str = "Poor_lifestyle";

// ============================================================================
// FEATURE SPEC
// ============================================================================

/// Computes a feature from other resolved/raw inputs
pub type Derivation = fn(&InputRecord) -> RiskResult<f64>;

#[derive(Clone, Copy)]
pub struct FeatureSpec {
    pub name: &'static str,
    /// Checked in declared order after the canonical key
    pub aliases: &'static [&'static str],
    pub default: f64,
    pub derive: Option<Derivation>,
}

impl FeatureSpec {
    const fn raw(name: &'static str, aliases: &'static [&'static str], default: f64) -> Self {
        Self { name, aliases, default, derive: None }
    }

    const fn derived(name: &'static str, derive: Derivation) -> Self {
        Self { name, aliases: &[], default: 0.0, derive: Some(derive) }
    }

    pub fn is_derived(&self) -> bool {
        self.derive.is_some()
    }
}

impl std::fmt::Debug for FeatureSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("default", &self.default)
            .field("derived", &self.is_derived())
            .finish()
    }
}

/// Every feature the resolver knows how to produce
pub static FEATURE_TABLE: &[FeatureSpec] = &[
    // === Anthropometrics ===
    FeatureSpec::raw(AGE, &["age", "Age"], 25.0),
    FeatureSpec::raw(WEIGHT, &["weight", "Weight"], 60.0),
    FeatureSpec::raw(HEIGHT, &["height", "Height"], 165.0),
    FeatureSpec::raw(BMI, &["bmi"], 23.0),
    FeatureSpec::raw("Waist:Hip Ratio", &["waist_hip_ratio"], 0.0),

    // === Cycle ===
    FeatureSpec::raw(CYCLE, &["cycle_regular", "regular_cycle"], 1.0),
    FeatureSpec::raw(CYCLE_LENGTH, &["cycle_length"], 0.0),

    // === Symptoms (Y/N flags) ===
    FeatureSpec::raw(WEIGHT_GAIN, &["weight_gain"], 0.0),
    FeatureSpec::raw(HAIR_GROWTH, &["hair_growth"], 0.0),
    FeatureSpec::raw(PIMPLES, &["pimples", "acne"], 0.0),
    FeatureSpec::raw("Skin darkening (Y/N)", &["skin_darkening"], 0.0),
    FeatureSpec::raw("Hair loss(Y/N)", &["hair_loss"], 0.0),

    // === Lifestyle ===
    FeatureSpec::raw(FAST_FOOD, &["fast_food"], 0.0),
    FeatureSpec::raw(EXERCISE, &["regular_exercise", "exercise"], 1.0),

    // === Hormones & labs ===
    FeatureSpec::raw(FSH, &["fsh"], 6.0),
    FeatureSpec::raw(LH, &["lh"], 8.0),
    FeatureSpec::raw("FSH/LH", &["fsh_lh"], 0.0),
    FeatureSpec::raw("AMH(ng/mL)", &["amh"], 0.0),
    FeatureSpec::raw("PRL(ng/mL)", &["prl"], 0.0),
    FeatureSpec::raw("TSH (mIU/L)", &["tsh"], 0.0),
    FeatureSpec::raw("PRG(ng/mL)", &["prg"], 0.0),
    FeatureSpec::raw("Vit D3 (ng/mL)", &["vit_d3"], 0.0),
    FeatureSpec::raw("RBS(mg/dl)", &["rbs"], 0.0),
    FeatureSpec::raw("Hb(g/dl)", &["hb"], 0.0),
    FeatureSpec::raw("BP _Systolic (mmHg)", &["bp_systolic"], 0.0),
    FeatureSpec::raw("BP _Diastolic (mmHg)", &["bp_diastolic"], 0.0),

    // === Derived ===
    FeatureSpec::derived(BMI_OVERWEIGHT, bmi_overweight),
    FeatureSpec::derived(BMI_OBESE, bmi_obese),
    FeatureSpec::derived(BMI_UNDERWEIGHT, bmi_underweight),
    FeatureSpec::derived(AGE_HIGH_RISK, age_high_risk),
    FeatureSpec::derived(AGE_YOUNG, age_young),
    FeatureSpec::derived(AGE_PEAK_REPRODUCTIVE, age_peak_reproductive),
    FeatureSpec::derived(TOTAL_SYMPTOMS, total_symptoms),
    FeatureSpec::derived(MULTIPLE_SYMPTOMS, multiple_symptoms),
    FeatureSpec::derived(LH_FSH_RATIO, lh_fsh_ratio),
    FeatureSpec::derived(HIGH_LH_FSH_RATIO, high_lh_fsh_ratio),
    FeatureSpec::derived(POOR_LIFESTYLE, poor_lifestyle),
];

static FEATURE_INDEX: Lazy<HashMap<&'static str, &'static FeatureSpec>> =
    Lazy::new(|| FEATURE_TABLE.iter().map(|spec| (spec.name, spec)).collect());

/// Spec for a canonical name, if the table knows it
pub fn feature_spec(name: &str) -> Option<&'static FeatureSpec> {
    FEATURE_INDEX.get(name).copied()
}

// ============================================================================
// DERIVATIONS
// ============================================================================

fn flag(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

fn bmi_overweight(record: &InputRecord) -> RiskResult<f64> {
    Ok(flag(resolve(BMI, record)? > 25.0))
}

fn bmi_obese(record: &InputRecord) -> RiskResult<f64> {
    Ok(flag(resolve(BMI, record)? > 30.0))
}

fn bmi_underweight(record: &InputRecord) -> RiskResult<f64> {
    Ok(flag(resolve(BMI, record)? < 18.5))
}

fn age_high_risk(record: &InputRecord) -> RiskResult<f64> {
    Ok(flag(resolve(AGE, record)? > 30.0))
}

fn age_young(record: &InputRecord) -> RiskResult<f64> {
    Ok(flag(resolve(AGE, record)? < 20.0))
}

fn age_peak_reproductive(record: &InputRecord) -> RiskResult<f64> {
    let age = resolve(AGE, record)?;
    Ok(flag((20.0..=30.0).contains(&age)))
}

/// weight gain + hair growth + pimples + acne.
/// Pimples and acne are counted as separate raw keys.
fn total_symptoms(record: &InputRecord) -> RiskResult<f64> {
    let weight_gain = resolve(WEIGHT_GAIN, record)?;
    let hair_growth = resolve(HAIR_GROWTH, record)?;
    let pimples = record.first_number(&[PIMPLES, "pimples"], PIMPLES)?.unwrap_or(0.0);
    let acne = record.number("acne", TOTAL_SYMPTOMS)?.unwrap_or(0.0);
    Ok(weight_gain + hair_growth + pimples + acne)
}

fn multiple_symptoms(record: &InputRecord) -> RiskResult<f64> {
    Ok(flag(total_symptoms(record)? >= 3.0))
}

/// lh / fsh, 0 when fsh is not positive
fn lh_fsh_ratio(record: &InputRecord) -> RiskResult<f64> {
    let lh = resolve(LH, record)?;
    let fsh = resolve(FSH, record)?;
    Ok(if fsh > 0.0 { lh / fsh } else { 0.0 })
}

fn high_lh_fsh_ratio(record: &InputRecord) -> RiskResult<f64> {
    Ok(flag(lh_fsh_ratio(record)? > 2.0))
}

fn poor_lifestyle(record: &InputRecord) -> RiskResult<f64> {
    let exercise = resolve(EXERCISE, record)?;
    let fast_food = resolve(FAST_FOOD, record)?;
    Ok(flag(exercise - fast_food < 0.0))
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 of an ordered feature list, used to detect layout drift between
/// the artifact metadata and the order it declares.
pub fn layout_hash<S: AsRef<str>>(order: &[S]) -> u32 {
    let mut hasher = Hasher::new();
    for name in order {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Reject an order whose hash differs from the one recorded at fit time
pub fn validate_layout<S: AsRef<str>>(order: &[S], expected_hash: u32) -> RiskResult<()> {
    let actual = layout_hash(order);
    if actual != expected_hash {
        return Err(RiskError::ArtifactLoad(format!(
            "Feature layout mismatch: expected hash {:08x}, got {:08x} ({} features)",
            expected_hash,
            actual,
            order.len()
        )));
    }
    Ok(())
}

/// Layout summary for status/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub hash: u32,
    pub feature_count: usize,
    pub derived_count: usize,
    pub unknown_features: Vec<String>,
}

impl LayoutInfo {
    pub fn of<S: AsRef<str>>(order: &[S]) -> Self {
        let derived_count = order
            .iter()
            .filter_map(|name| feature_spec(name.as_ref()))
            .filter(|spec| spec.is_derived())
            .count();
        let unknown_features = order
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| feature_spec(name).is_none())
            .map(str::to_string)
            .collect();

        Self {
            hash: layout_hash(order),
            feature_count: order.len(),
            derived_count,
            unknown_features,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_are_unique() {
        assert_eq!(FEATURE_INDEX.len(), FEATURE_TABLE.len());
    }

    #[test]
    fn test_derived_features_have_no_aliases() {
        for spec in FEATURE_TABLE.iter().filter(|s| s.is_derived()) {
            assert!(spec.aliases.is_empty(), "{} should not declare aliases", spec.name);
        }
    }

    #[test]
    fn test_feature_spec_lookup() {
        let spec = feature_spec(PIMPLES).unwrap();
        assert_eq!(spec.aliases, &["pimples", "acne"]);
        assert!(feature_spec("nonexistent").is_none());
    }

    #[test]
    fn test_layout_hash_depends_on_order() {
        let a = layout_hash(&[AGE, BMI]);
        let b = layout_hash(&[BMI, AGE]);
        assert_ne!(a, b);
        assert_eq!(a, layout_hash(&[AGE.to_string(), BMI.to_string()]));
    }

    #[test]
    fn test_validate_layout() {
        let order = [AGE, BMI, TOTAL_SYMPTOMS];
        assert!(validate_layout(&order, layout_hash(&order)).is_ok());
        assert!(validate_layout(&order, layout_hash(&order).wrapping_add(1)).is_err());
    }

    #[test]
    fn test_layout_info_counts() {
        let info = LayoutInfo::of(&[AGE, BMI_OBESE, POOR_LIFESTYLE, "Mystery"]);
        assert_eq!(info.feature_count, 4);
        assert_eq!(info.derived_count, 2);
        assert_eq!(info.unknown_features, vec!["Mystery".to_string()]);
    }
}
