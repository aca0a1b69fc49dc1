use thiserror::Error;

use crate::cat::state::StateAxis;

/// Raised when an internal state is built from values outside [-1, 1].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("internal state value out of range: {axis} = {value} (must be within -1..=1)")]
    OutOfRange { axis: StateAxis, value: f32 },
}

/// Problems found while loading or validating a behavior configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read behavior config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse behavior config: {0}")]
    Parse(#[from] serde_json::Error),

    /// An emotion references something other than an internal-state axis.
    #[error("emotion `{emotion}` uses unknown input `{input}`")]
    UnknownEmotionInput { emotion: String, input: String },

    /// An action references an emotion that is not configured.
    #[error("action `{action}` uses unknown emotion `{input}`")]
    UnknownActionInput { action: String, input: String },

    #[error("external influence on `{target}` uses unknown fact `{input}`")]
    UnknownInfluenceInput { target: String, input: String },

    #[error("external influence targets unknown internal state `{0}`")]
    UnknownInfluenceTarget(String),

    /// The action has no behavior implementation.
    #[error("action `{0}` has no behavior")]
    UnknownAction(String),

    #[error("softmax temperature must be positive, got {0}")]
    InvalidTemperature(f32),

    #[error("minimum probability must be within 0..1, got {0}")]
    InvalidMinimumProbability(f32),

    #[error("action `{action}` has negative duration {duration}")]
    NegativeDuration { action: String, duration: f64 },

    #[error("behavior config defines no actions")]
    NoActions,
}
