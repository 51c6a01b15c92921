//! Feature Resolver
//!
//! Maps heterogeneous request keys onto canonical features.
//!
//! Resolution order for a raw feature:
//! 1. exact canonical key
//! 2. aliases, in declared order
//! 3. the feature default
//!
//! Derived features skip lookup and run their derivation.

use serde::{Deserialize, Serialize};

use super::layout::feature_spec;
use super::record::InputRecord;
use super::vector::FeatureVector;
use crate::error::RiskResult;

/// Where a resolved value came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSource {
    Canonical,
    Alias(String),
    Default,
    Derived,
    /// Name absent from the feature table and from the record
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved {
    pub value: f64,
    pub source: ValueSource,
}

/// Resolve one canonical feature to a number
pub fn resolve(name: &str, record: &InputRecord) -> RiskResult<f64> {
    resolve_traced(name, record).map(|resolved| resolved.value)
}

/// Resolve and report provenance
pub fn resolve_traced(name: &str, record: &InputRecord) -> RiskResult<Resolved> {
    let Some(spec) = feature_spec(name) else {
        // Not in the table: exact key only
        return Ok(match record.number(name, name)? {
            Some(value) => Resolved { value, source: ValueSource::Canonical },
            None => {
                log::debug!("Feature '{}' unknown and absent, using 0.0", name);
                Resolved { value: 0.0, source: ValueSource::Unknown }
            }
        });
    };

    if let Some(derive) = spec.derive {
        return Ok(Resolved { value: derive(record)?, source: ValueSource::Derived });
    }

    if let Some(value) = record.number(spec.name, spec.name)? {
        return Ok(Resolved { value, source: ValueSource::Canonical });
    }

    for alias in spec.aliases {
        if let Some(value) = record.number(alias, spec.name)? {
            return Ok(Resolved { value, source: ValueSource::Alias(alias.to_string()) });
        }
    }

    Ok(Resolved { value: spec.default, source: ValueSource::Default })
}

/// Build a vector in exactly the given order.
///
/// The order must be the one the consuming model was fit with.
pub fn resolve_vector<S: AsRef<str>>(order: &[S], record: &InputRecord) -> RiskResult<FeatureVector> {
    let mut values = Vec::with_capacity(order.len());
    let mut defaulted = 0usize;

    for name in order {
        let resolved = resolve_traced(name.as_ref(), record)?;
        if matches!(resolved.source, ValueSource::Default | ValueSource::Unknown) {
            defaulted += 1;
        }
        values.push(resolved.value);
    }

    log::debug!(
        "Resolved {} features ({} defaulted) from {} request keys",
        order.len(),
        defaulted,
        record.len()
    );

    Ok(FeatureVector::new(order, values))
}
