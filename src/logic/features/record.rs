//! Input Record - Raw request data before feature resolution
//!
//! Keys are case-sensitive and may follow any naming convention.
//! Values stay raw until a feature asks for them; coercion happens lazily so
//! an unused junk field never fails a request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RiskError, RiskResult};

// ============================================================================
// RAW VALUE
// ============================================================================

/// Scalar value as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl InputValue {
    /// Coerce to a finite number. Booleans map to 1/0, text must parse.
    pub fn as_number(&self) -> Result<f64, String> {
        match self {
            InputValue::Number(n) if n.is_finite() => Ok(*n),
            InputValue::Number(n) => Err(format!("{} is not a finite number", n)),
            InputValue::Flag(b) => Ok(if *b { 1.0 } else { 0.0 }),
            InputValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| format!("'{}' is not numeric", s)),
        }
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Number(value)
    }
}

impl From<i32> for InputValue {
    fn from(value: i32) -> Self {
        InputValue::Number(value as f64)
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Flag(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

// ============================================================================
// INPUT RECORD
// ============================================================================

/// Flat key/value request; insertion order is irrelevant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    values: HashMap<String, InputValue>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<InputValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<InputValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Parse a JSON request body. Only a top-level object of scalars is valid;
    /// `null` fields count as absent.
    pub fn from_json_str(body: &str) -> RiskResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> RiskResult<Self> {
        let Value::Object(map) = value else {
            return Err(RiskError::InputParse(
                "request body must be a JSON object".to_string(),
            ));
        };

        let mut record = InputRecord::new();
        for (key, raw) in map {
            let value = match raw {
                Value::Null => continue,
                Value::Bool(b) => InputValue::Flag(b),
                Value::Number(n) => match n.as_f64() {
                    Some(f) => InputValue::Number(f),
                    None => {
                        return Err(RiskError::InputParse(format!(
                            "field '{}' holds an unrepresentable number",
                            key
                        )))
                    }
                },
                Value::String(s) => InputValue::Text(s),
                Value::Array(_) | Value::Object(_) => {
                    return Err(RiskError::InputParse(format!(
                        "field '{}' must be a scalar value",
                        key
                    )))
                }
            };
            record.values.insert(key, value);
        }

        Ok(record)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric value under `key`, if present. `feature` names the error.
    pub fn number(&self, key: &str, feature: &str) -> RiskResult<Option<f64>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_number()
                .map(Some)
                .map_err(|msg| RiskError::feature(feature, format!("{} (key '{}')", msg, key))),
        }
    }

    /// First present key wins, in the order given
    pub fn first_number(&self, keys: &[&str], feature: &str) -> RiskResult<Option<f64>> {
        for key in keys {
            if self.contains(key) {
                return self.number(key, feature);
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_of_scalars() {
        let record = InputRecord::from_json_str(
            r#"{"age": 28, "pimples": true, "bmi": "27.5", "note": null}"#,
        )
        .unwrap();

        assert_eq!(record.len(), 3);
        assert_eq!(record.number("age", "age").unwrap(), Some(28.0));
        assert_eq!(record.number("pimples", "pimples").unwrap(), Some(1.0));
        assert_eq!(record.number("bmi", "BMI").unwrap(), Some(27.5));
        assert!(!record.contains("note"));
    }

    #[test]
    fn test_non_object_body_is_parse_error() {
        let err = InputRecord::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, RiskError::InputParse(_)));

        let err = InputRecord::from_json_str("not json").unwrap_err();
        assert!(matches!(err, RiskError::InputParse(_)));
    }

    #[test]
    fn test_nested_value_is_parse_error() {
        let err = InputRecord::from_json_str(r#"{"age": {"value": 3}}"#).unwrap_err();
        assert!(matches!(err, RiskError::InputParse(_)));
    }

    #[test]
    fn test_non_numeric_text_fails_only_when_read() {
        let record = InputRecord::new().with("age", "twenty").with("weight", 60.0);

        assert_eq!(record.number("weight", "Weight (Kg)").unwrap(), Some(60.0));
        let err = record.number("age", "Age (yrs)").unwrap_err();
        assert!(matches!(err, RiskError::FeatureComputation { .. }));
    }

    #[test]
    fn test_first_number_respects_key_order() {
        let record = InputRecord::new().with("acne", 1).with("pimples", 0);
        let value = record.first_number(&["pimples", "acne"], "Pimples(Y/N)").unwrap();
        assert_eq!(value, Some(0.0));
        assert_eq!(record.first_number(&["missing"], "x").unwrap(), None);
    }
}
