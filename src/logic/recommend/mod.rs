//! Recommend Module - Prioritized, bounded advice list

pub mod catalog;
pub mod engine;

pub use engine::{build, generate, generate_with_limit, Signals, MAX_RECOMMENDATIONS};
