//! Features Module - Feature Resolution Engine
//!
//! Turns a sparse, heterogeneously named request into the ordered numeric
//! vector a model expects.

pub mod layout;
pub mod record;
pub mod resolver;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{feature_spec, layout_hash, FeatureSpec, LayoutInfo, FEATURE_TABLE};
pub use record::{InputRecord, InputValue};
pub use resolver::{resolve, resolve_traced, resolve_vector, Resolved, ValueSource};
pub use vector::FeatureVector;
