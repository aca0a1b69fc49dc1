//! Behavior configuration: three weighted-linear sections plus softmax settings.
//!
//! Each section maps a named output to `Σ(input_i * weight_i) + bias`, where the
//! bias is the one weight past the end of `inputs`. The document is plain JSON
//! so it can be tuned without recompiling:
//!
//! ```json
//! {
//!   "externalStateInfluence": { "fear": { "inputs": ["userPresence"], "weights": [-0.005, 0.0] } },
//!   "emotionCalculation": { "safety": { "inputs": ["bonding", "fear"], "weights": [0.4, -0.8, 0.1] } },
//!   "actions": { "runAway": { "name": "Run away", "inputs": ["safety"], "weights": [-1.2, -0.3], "duration": 2000 } },
//!   "probabilityCalculation": { "method": "softmax", "temperature": 0.5, "minimumProbability": 0.05 }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actions::CatAction;
use crate::cat::state::{ExternalFact, StateAxis};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Weighted sum
// ---------------------------------------------------------------------------

/// Ordered inputs with matching weights; one trailing weight is the bias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedSum {
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub weights: Vec<f32>,
}

impl WeightedSum {
    pub fn new(inputs: &[&str], weights: &[f32]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| (*s).to_owned()).collect(),
            weights: weights.to_vec(),
        }
    }

    /// The weight with no matching input, or 0.
    pub fn bias(&self) -> f32 {
        self.weights.get(self.inputs.len()).copied().unwrap_or(0.0)
    }

    /// Evaluate against `lookup`. Unknown inputs and missing weights count as 0.
    pub fn evaluate(&self, lookup: impl Fn(&str) -> Option<f32>) -> f32 {
        let weighted: f32 = self
            .inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let value = lookup(input).unwrap_or(0.0);
                let weight = self.weights.get(i).copied().unwrap_or(0.0);
                value * weight
            })
            .sum();
        weighted + self.bias()
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Scoring recipe and metadata for one action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Human-readable label.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub score: WeightedSum,
    /// Minimum run length in ms. Absent or 0 means "re-decide next frame".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl ActionConfig {
    pub fn duration_ms(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMethod {
    #[default]
    Softmax,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityConfig {
    #[serde(default)]
    pub method: NormalizationMethod,
    pub temperature: f32,
    pub minimum_probability: f32,
}

impl Default for ProbabilityConfig {
    fn default() -> Self {
        Self {
            method: NormalizationMethod::Softmax,
            temperature: 0.5,
            minimum_probability: 0.05,
        }
    }
}

/// The whole behavior document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorConfig {
    /// internal axis -> weighted external facts, as a per-second delta.
    #[serde(default)]
    pub external_state_influence: BTreeMap<String, WeightedSum>,
    /// emotion -> weighted internal axes.
    #[serde(default)]
    pub emotion_calculation: BTreeMap<String, WeightedSum>,
    /// action -> weighted emotions.
    #[serde(alias = "stepOneActions")]
    pub actions: BTreeMap<String, ActionConfig>,
    #[serde(default)]
    pub probability_calculation: ProbabilityConfig,
}

impl BehaviorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded behavior config from {} ({} emotions, {} actions)",
            path.display(),
            config.emotion_calculation.len(),
            config.actions.len()
        );
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject names that would silently evaluate to 0 at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (target, sum) in &self.external_state_influence {
            if StateAxis::from_name(target).is_none() {
                return Err(ConfigError::UnknownInfluenceTarget(target.clone()));
            }
            if let Some(input) = sum.inputs.iter().find(|i| ExternalFact::from_name(i).is_none()) {
                return Err(ConfigError::UnknownInfluenceInput {
                    target: target.clone(),
                    input: input.clone(),
                });
            }
        }

        for (emotion, sum) in &self.emotion_calculation {
            if let Some(input) = sum.inputs.iter().find(|i| StateAxis::from_name(i).is_none()) {
                return Err(ConfigError::UnknownEmotionInput {
                    emotion: emotion.clone(),
                    input: input.clone(),
                });
            }
        }

        if self.actions.is_empty() {
            return Err(ConfigError::NoActions);
        }
        for (action, config) in &self.actions {
            if CatAction::from_name(action).is_none() {
                return Err(ConfigError::UnknownAction(action.clone()));
            }
            if let Some(input) = config
                .score
                .inputs
                .iter()
                .find(|i| !self.emotion_calculation.contains_key(i.as_str()))
            {
                return Err(ConfigError::UnknownActionInput {
                    action: action.clone(),
                    input: input.clone(),
                });
            }
            if let Some(duration) = config.duration {
                if !(duration >= 0.0) {
                    return Err(ConfigError::NegativeDuration {
                        action: action.clone(),
                        duration,
                    });
                }
            }
        }

        let probability = &self.probability_calculation;
        if !(probability.temperature > 0.0) {
            return Err(ConfigError::InvalidTemperature(probability.temperature));
        }
        if !(0.0..1.0).contains(&probability.minimum_probability) {
            return Err(ConfigError::InvalidMinimumProbability(
                probability.minimum_probability,
            ));
        }

        Ok(())
    }
}

fn action(name: &str, description: &str, inputs: &[&str], weights: &[f32], duration: f64) -> ActionConfig {
    ActionConfig {
        name: name.to_owned(),
        description: description.to_owned(),
        score: WeightedSum::new(inputs, weights),
        duration: Some(duration),
    }
}

impl Default for BehaviorConfig {
    /// The shipped tuning. Mirrors `assets/behavior.json`.
    fn default() -> Self {
        let external_state_influence = BTreeMap::from([
            (
                "bonding".to_owned(),
                WeightedSum::new(&["userPresence", "toyNear"], &[0.002, 0.004, 0.0]),
            ),
            (
                "playfulness".to_owned(),
                WeightedSum::new(&["toyPresence", "isPlaying"], &[0.01, 0.02, 0.0]),
            ),
            (
                "fear".to_owned(),
                WeightedSum::new(&["userPresence", "toyPresence"], &[-0.005, -0.002, 0.0]),
            ),
        ]);

        let emotion_calculation = BTreeMap::from([
            (
                "valence".to_owned(),
                WeightedSum::new(&["bonding", "playfulness", "fear"], &[0.5, 0.3, -0.6, 0.0]),
            ),
            (
                "arousal".to_owned(),
                WeightedSum::new(&["playfulness", "fear"], &[0.6, 0.5, 0.0]),
            ),
            (
                "safety".to_owned(),
                WeightedSum::new(&["bonding", "fear"], &[0.4, -0.8, 0.1]),
            ),
            (
                "social".to_owned(),
                WeightedSum::new(&["bonding"], &[0.8, 0.0]),
            ),
        ]);

        let actions = BTreeMap::from([
            (
                "showBelly".to_owned(),
                action(
                    "Show belly",
                    "Rolls over and shows its belly to someone it trusts",
                    &["valence", "safety", "social"],
                    &[0.8, 0.6, 0.5, -0.5],
                    3000.0,
                ),
            ),
            (
                "sit".to_owned(),
                action(
                    "Sit",
                    "Sits still and watches",
                    &["safety", "arousal"],
                    &[0.3, -0.4, 0.45],
                    2000.0,
                ),
            ),
            (
                "playWithToy".to_owned(),
                action(
                    "Play with toy",
                    "Chases the toy and paws at it",
                    &["arousal", "valence"],
                    &[0.8, 0.5, 0.0],
                    3000.0,
                ),
            ),
            (
                "runAway".to_owned(),
                action(
                    "Run away",
                    "Flees to the farthest corner",
                    &["safety"],
                    &[-1.2, -0.3],
                    2000.0,
                ),
            ),
        ]);

        Self {
            external_state_influence,
            emotion_calculation,
            actions,
            probability_calculation: ProbabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED: &str = include_str!("../../assets/behavior.json");

    #[test]
    fn shipped_file_matches_default() {
        let parsed = BehaviorConfig::from_json_str(SHIPPED).unwrap();
        assert_eq!(parsed, BehaviorConfig::default());
    }

    #[test]
    fn default_validates() {
        BehaviorConfig::default().validate().unwrap();
    }

    #[test]
    fn bias_is_trailing_weight() {
        let sum = WeightedSum::new(&["a", "b"], &[2.0, 3.0, 0.5]);
        assert_eq!(sum.bias(), 0.5);
        let value = sum.evaluate(|name| match name {
            "a" => Some(1.0),
            "b" => Some(-1.0),
            _ => None,
        });
        assert!((value - (2.0 - 3.0 + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn missing_inputs_and_weights_count_as_zero() {
        let sum = WeightedSum::new(&["a", "ghost", "c"], &[1.0]);
        assert_eq!(sum.bias(), 0.0);
        assert_eq!(sum.evaluate(|_| Some(4.0)), 4.0);
        assert_eq!(sum.evaluate(|_| None), 0.0);
    }

    #[test]
    fn accepts_legacy_action_key_and_defaults() {
        let json = r#"{
            "emotionCalculation": { "valence": { "inputs": ["bonding"], "weights": [1.0] } },
            "stepOneActions": { "sit": { "inputs": ["valence"], "weights": [1.0, 0.0] } }
        }"#;
        let config = BehaviorConfig::from_json_str(json).unwrap();
        assert!(config.actions.contains_key("sit"));
        assert_eq!(config.actions["sit"].duration_ms(), 0.0);
        assert_eq!(config.probability_calculation, ProbabilityConfig::default());
    }

    #[test]
    fn rejects_unknown_emotion_input() {
        let mut config = BehaviorConfig::default();
        config
            .emotion_calculation
            .insert("hunger".into(), WeightedSum::new(&["stomach"], &[1.0]));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownEmotionInput { ref input, .. }) if input == "stomach"
        ));
    }

    #[test]
    fn rejects_action_without_behavior() {
        let mut config = BehaviorConfig::default();
        config.actions.insert("fly".into(), ActionConfig::default());
        assert!(matches!(config.validate(), Err(ConfigError::UnknownAction(ref a)) if a == "fly"));
    }

    #[test]
    fn rejects_unknown_action_input() {
        let mut config = BehaviorConfig::default();
        config.actions.get_mut("sit").unwrap().score.inputs.push("boredom".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownActionInput { ref input, .. }) if input == "boredom"
        ));
    }

    #[test]
    fn rejects_bad_influence_section() {
        let mut config = BehaviorConfig::default();
        config
            .external_state_influence
            .insert("hunger".into(), WeightedSum::default());
        assert!(matches!(config.validate(), Err(ConfigError::UnknownInfluenceTarget(_))));

        let mut config = BehaviorConfig::default();
        config
            .external_state_influence
            .insert("fear".into(), WeightedSum::new(&["thunder"], &[1.0]));
        assert!(matches!(config.validate(), Err(ConfigError::UnknownInfluenceInput { .. })));
    }

    #[test]
    fn rejects_bad_probability_settings() {
        let mut config = BehaviorConfig::default();
        config.probability_calculation.temperature = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTemperature(_))));

        let mut config = BehaviorConfig::default();
        config.probability_calculation.minimum_probability = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMinimumProbability(_))));
    }

    #[test]
    fn rejects_negative_duration_and_empty_actions() {
        let mut config = BehaviorConfig::default();
        config.actions.get_mut("sit").unwrap().duration = Some(-1.0);
        assert!(matches!(config.validate(), Err(ConfigError::NegativeDuration { .. })));

        let mut config = BehaviorConfig::default();
        config.actions.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoActions)));
    }

    #[test]
    fn parse_errors_surface() {
        assert!(matches!(
            BehaviorConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
