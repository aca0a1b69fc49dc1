use std::collections::BTreeMap;

use crate::actions::CatAction;
use crate::behavior::config::{ActionConfig, BehaviorConfig, ProbabilityConfig};
use crate::cat::state::{ExternalState, InternalState, InternalStateChange, StateAxis};
use crate::error::ConfigError;

/// Emotion name -> value. No range is enforced.
pub type Emotions = BTreeMap<String, f32>;
/// Action name -> raw pre-softmax score.
pub type ActionScores = BTreeMap<String, f32>;
/// Action name -> probability. Sums to 1.
pub type ActionProbabilities = BTreeMap<String, f32>;

/// Without a toy, `playWithToy` can score at most this much.
pub const NO_TOY_SCORE_CAP: f32 = 0.1;

/// Evaluates a [`BehaviorConfig`] against state snapshots.
///
/// Pure apart from the RNG passed to [`select_action`](Self::select_action).
#[derive(Debug, Clone, Default)]
pub struct ActionProbabilityCalculator {
    config: BehaviorConfig,
}

impl ActionProbabilityCalculator {
    /// Wrap `config` as-is. Unknown names evaluate to 0.
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    /// Wrap `config` after validating it.
    pub fn try_new(config: BehaviorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Swap in a new configuration (debug tuning). The old one stays on error.
    pub fn update_config(&mut self, config: BehaviorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        log::info!("Behavior config replaced ({} actions)", self.config.actions.len());
        Ok(())
    }

    pub fn get_action_config(&self, name: &str) -> Option<&ActionConfig> {
        self.config.actions.get(name)
    }

    /// Per-second internal-state delta caused by the situation.
    pub fn calculate_external_influence(&self, external: &ExternalState) -> InternalStateChange {
        let mut change = InternalStateChange::default();
        for (target, sum) in &self.config.external_state_influence {
            if let Some(axis) = StateAxis::from_name(target) {
                change.add(axis, sum.evaluate(|name| external.value_of(name)));
            }
        }
        change
    }

    pub fn calculate_emotions(&self, internal: &InternalState) -> Emotions {
        self.config
            .emotion_calculation
            .iter()
            .map(|(emotion, sum)| (emotion.clone(), sum.evaluate(|name| internal.value_of(name))))
            .collect()
    }

    /// Raw action scores, with the no-toy cap on `playWithToy` applied.
    pub fn calculate_action_scores(
        &self,
        internal: &InternalState,
        external: &ExternalState,
    ) -> ActionScores {
        let emotions = self.calculate_emotions(internal);
        let mut scores: ActionScores = self
            .config
            .actions
            .iter()
            .map(|(action, config)| {
                let score = config.score.evaluate(|name| emotions.get(name).copied());
                (action.clone(), score)
            })
            .collect();

        if !external.toy_presence() {
            if let Some(score) = scores.get_mut(CatAction::PlayWithToy.name()) {
                *score = score.min(NO_TOY_SCORE_CAP);
            }
        }
        scores
    }

    pub fn calculate_action_probabilities(
        &self,
        internal: &InternalState,
        external: &ExternalState,
    ) -> ActionProbabilities {
        let scores = self.calculate_action_scores(internal, external);
        softmax(&scores, &self.config.probability_calculation)
    }

    /// Sample one action name from `probabilities`.
    ///
    /// Returns `None` only for an empty distribution.
    pub fn select_action(
        &self,
        probabilities: &ActionProbabilities,
        rng: &mut fastrand::Rng,
    ) -> Option<String> {
        let draw = rng.f32();
        let mut cumulative = 0.0;
        for (action, probability) in probabilities {
            cumulative += probability;
            if draw < cumulative {
                return Some(action.clone());
            }
        }
        // Rounding left the draw unconsumed.
        probabilities.keys().next().cloned()
    }
}

/// Temperature-scaled softmax with a probability floor.
///
/// Entries that land below `minimum_probability` are raised to it and the rest
/// are rescaled so the total is 1 and no entry ends up under the floor.
/// This differs from raising low entries and dividing once by the new total,
/// which can push a raised entry back under the floor.
pub fn softmax(scores: &ActionScores, config: &ProbabilityConfig) -> ActionProbabilities {
    if scores.is_empty() {
        return ActionProbabilities::new();
    }
    let temperature = if config.temperature > 0.0 {
        config.temperature
    } else {
        1.0
    };

    let max = scores
        .values()
        .map(|s| s / temperature)
        .fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.values().map(|s| (s / temperature - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    let raw: Vec<f32> = exps.iter().map(|e| e / sum).collect();

    let probs = apply_floor(&raw, config.minimum_probability);
    scores.keys().cloned().zip(probs).collect()
}

/// Raise entries to `floor` and rescale the others to keep the total at 1.
fn apply_floor(raw: &[f32], floor: f32) -> Vec<f32> {
    let n = raw.len();
    if floor <= 0.0 {
        return raw.to_vec();
    }
    if floor * n as f32 >= 1.0 {
        return vec![1.0 / n as f32; n];
    }

    let mut floored: Vec<bool> = raw.iter().map(|&p| p < floor).collect();
    loop {
        let fixed_mass = floored.iter().filter(|&&f| f).count() as f32 * floor;
        let free_mass: f32 = raw
            .iter()
            .zip(&floored)
            .filter(|(_, &f)| !f)
            .map(|(p, _)| p)
            .sum();
        if free_mass <= 0.0 {
            return vec![1.0 / n as f32; n];
        }
        let scale = (1.0 - fixed_mass) / free_mass;

        let mut changed = false;
        for (p, f) in raw.iter().zip(floored.iter_mut()) {
            if !*f && p * scale < floor {
                *f = true;
                changed = true;
            }
        }
        if !changed {
            return raw
                .iter()
                .zip(&floored)
                .map(|(p, &f)| if f { floor } else { p * scale })
                .collect();
        }
    }
}
