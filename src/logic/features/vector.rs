//! Feature Vector - Core data structure for model input
//!
//! **Ordered feature vector carrying its own layout hash**
//!
//! Index `i` means `names[i]`. The order is copied from the artifact that
//! will consume the vector, so a mismatch can be detected by hash instead of
//! silently producing a meaningless prediction.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::layout::{layout_hash, validate_layout};
use crate::error::RiskResult;

// ============================================================================
// FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// CRC32 of `names` in order
    layout_hash: u32,
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Pair an order with its values. Extra values are dropped and missing
    /// ones padded with 0.0 so the vector always matches the order length.
    pub fn new<S: AsRef<str>>(order: &[S], mut values: Vec<f64>) -> Self {
        values.resize(order.len(), 0.0);
        Self {
            layout_hash: layout_hash(order),
            names: order.iter().map(|n| n.as_ref().to_string()).collect(),
            values,
        }
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        self.names.iter().position(|n| n == name).and_then(|i| self.get(i))
    }

    /// Check this vector was built for the expected layout
    pub fn validate(&self, expected_hash: u32) -> RiskResult<()> {
        validate_layout(&self.names, expected_hash)
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(self.values.clone())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": self.names.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pads_and_truncates() {
        let short = FeatureVector::new(&["a", "b", "c"], vec![1.0]);
        assert_eq!(short.as_slice(), &[1.0, 0.0, 0.0]);

        let long = FeatureVector::new(&["a"], vec![1.0, 2.0]);
        assert_eq!(long.as_slice(), &[1.0]);
    }

    #[test]
    fn test_get_by_name() {
        let vector = FeatureVector::new(&["BMI", "Age (yrs)"], vec![24.0, 31.0]);
        assert_eq!(vector.get_by_name("Age (yrs)"), Some(31.0));
        assert_eq!(vector.get_by_name("nonexistent"), None);
        assert_eq!(vector.get(5), None);
    }

    #[test]
    fn test_validate_against_hash() {
        let order = ["BMI", "Age (yrs)"];
        let vector = FeatureVector::new(&order, vec![24.0, 31.0]);
        assert!(vector.validate(layout_hash(&order)).is_ok());
        assert!(vector.validate(layout_hash(&["Age (yrs)", "BMI"])).is_err());
    }

    #[test]
    fn test_to_log_entry() {
        let vector = FeatureVector::new(&["BMI"], vec![24.0]);
        let log = vector.to_log_entry();
        assert!(log["layout_hash"].as_u64().is_some());
        assert_eq!(log["named_values"]["BMI"], 24.0);
    }
}
