//! Data-driven scoring: configuration document plus the calculator that turns
//! internal and external state into action probabilities.

pub mod config;
pub mod scoring;

pub use config::{ActionConfig, BehaviorConfig, NormalizationMethod, ProbabilityConfig, WeightedSum};
pub use scoring::{ActionProbabilities, ActionProbabilityCalculator, ActionScores, Emotions};
