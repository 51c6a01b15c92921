//! Integration Tests for Feature Resolution
//!
//! Realistic requests resolved against a full training-time feature order.

#[cfg(test)]
mod integration_tests {
    use crate::logic::features::{
        layout::*,
        record::InputRecord,
        resolver::resolve_vector,
    };

    /// Base columns followed by engineered columns, as fitted
    const TRAINING_ORDER: &[&str] = &[
        AGE, WEIGHT, HEIGHT, BMI, CYCLE_LENGTH, FSH, LH, "FSH/LH", "Waist:Hip Ratio",
        WEIGHT_GAIN, HAIR_GROWTH, "Skin darkening (Y/N)", "Hair loss(Y/N)", PIMPLES,
        FAST_FOOD, EXERCISE, "BP _Systolic (mmHg)", "BP _Diastolic (mmHg)", "Hb(g/dl)",
        CYCLE, "AMH(ng/mL)", "PRL(ng/mL)", "TSH (mIU/L)", "Vit D3 (ng/mL)", "PRG(ng/mL)",
        "RBS(mg/dl)",
        BMI_OVERWEIGHT, BMI_OBESE, BMI_UNDERWEIGHT,
        AGE_HIGH_RISK, AGE_YOUNG, AGE_PEAK_REPRODUCTIVE,
        TOTAL_SYMPTOMS, MULTIPLE_SYMPTOMS,
        LH_FSH_RATIO, HIGH_LH_FSH_RATIO,
        POOR_LIFESTYLE,
    ];

    #[test]
    fn test_every_training_column_is_in_table() {
        for name in TRAINING_ORDER {
            assert!(feature_spec(name).is_some(), "{} missing from FEATURE_TABLE", name);
        }
        assert_eq!(LayoutInfo::of(TRAINING_ORDER).derived_count, 11);
    }

    /// Shape of the request sent by the web client
    #[test]
    fn test_client_request_resolves() {
        let record = InputRecord::from_json_str(
            r#"{
                "Age (yrs)": 28, "Weight (Kg)": 78, "Height(Cm)": 162, "BMI": 29.7,
                "cycle_regular": 0, "weight_gain": 1, "hair_growth": 1, "pimples": 1,
                "fast_food": 1, "regular_exercise": 0
            }"#,
        )
        .unwrap();

        let vector = resolve_vector(TRAINING_ORDER, &record).unwrap();
        assert_eq!(vector.len(), TRAINING_ORDER.len());

        assert_eq!(vector.get_by_name(AGE), Some(28.0));
        assert_eq!(vector.get_by_name(CYCLE), Some(0.0));
        assert_eq!(vector.get_by_name(PIMPLES), Some(1.0));
        assert_eq!(vector.get_by_name(BMI_OVERWEIGHT), Some(1.0));
        assert_eq!(vector.get_by_name(BMI_OBESE), Some(0.0));
        assert_eq!(vector.get_by_name(AGE_PEAK_REPRODUCTIVE), Some(1.0));
        assert_eq!(vector.get_by_name(TOTAL_SYMPTOMS), Some(3.0));
        assert_eq!(vector.get_by_name(MULTIPLE_SYMPTOMS), Some(1.0));
        assert_eq!(vector.get_by_name(POOR_LIFESTYLE), Some(1.0));
        // Unsupplied labs fall back to defaults
        assert_eq!(vector.get_by_name("AMH(ng/mL)"), Some(0.0));
        assert_eq!(vector.get_by_name(FSH), Some(6.0));
    }

    #[test]
    fn test_empty_request_is_all_defaults() {
        let vector = resolve_vector(TRAINING_ORDER, &InputRecord::new()).unwrap();
        assert_eq!(vector.get_by_name(AGE), Some(25.0));
        assert_eq!(vector.get_by_name(BMI), Some(23.0));
        assert_eq!(vector.get_by_name(EXERCISE), Some(1.0));
        assert_eq!(vector.get_by_name(TOTAL_SYMPTOMS), Some(0.0));
        assert_eq!(vector.get_by_name(POOR_LIFESTYLE), Some(0.0));
        assert_eq!(vector.get_by_name(HIGH_LH_FSH_RATIO), Some(0.0));
    }

    #[test]
    fn test_snake_case_and_training_names_agree() {
        let snake = InputRecord::new()
            .with("age", 34)
            .with("bmi", 31.2)
            .with("fsh", 5.0)
            .with("lh", 11.0);
        let training = InputRecord::new()
            .with(AGE, 34)
            .with(BMI, 31.2)
            .with(FSH, 5.0)
            .with(LH, 11.0);

        let a = resolve_vector(TRAINING_ORDER, &snake).unwrap();
        let b = resolve_vector(TRAINING_ORDER, &training).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get_by_name(HIGH_LH_FSH_RATIO), Some(1.0));
    }

    #[test]
    fn test_non_numeric_field_in_order_fails() {
        let record = InputRecord::new().with("fsh", "n/a");
        assert!(resolve_vector(TRAINING_ORDER, &record).is_err());
        // The same junk is harmless when the order never reads it
        assert!(resolve_vector(&[AGE, BMI], &record).is_ok());
    }
}
