use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::toy::ToyKind;

/// Lower bound for every internal-state axis.
pub const STATE_MIN: f32 = -1.0;
/// Upper bound for every internal-state axis.
pub const STATE_MAX: f32 = 1.0;

/// A toy closer than this (px) counts as "near" for external influence.
pub const TOY_NEAR_DISTANCE: f32 = 100.0;

/// Default per-second playfulness decay.
pub const PLAYFULNESS_DECAY_PER_SEC: f32 = 0.0001;

// ---------------------------------------------------------------------------
// Axes and facts
// ---------------------------------------------------------------------------

/// The three emotional/physiological axes of a cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateAxis {
    Bonding,
    Playfulness,
    Fear,
}

impl StateAxis {
    pub const ALL: [StateAxis; 3] = [Self::Bonding, Self::Playfulness, Self::Fear];

    pub fn name(self) -> &'static str {
        match self {
            Self::Bonding => "bonding",
            Self::Playfulness => "playfulness",
            Self::Fear => "fear",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|axis| axis.name() == name)
    }
}

impl fmt::Display for StateAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Situational facts, 0/1-encoded, that feed the external influence section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalFact {
    UserPresence,
    ToyPresence,
    IsPlaying,
    /// Toy present and closer than [`TOY_NEAR_DISTANCE`].
    ToyNear,
}

impl ExternalFact {
    pub const ALL: [ExternalFact; 4] = [
        Self::UserPresence,
        Self::ToyPresence,
        Self::IsPlaying,
        Self::ToyNear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::UserPresence => "userPresence",
            Self::ToyPresence => "toyPresence",
            Self::IsPlaying => "isPlaying",
            Self::ToyNear => "toyNear",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|fact| fact.name() == name)
    }
}

// ---------------------------------------------------------------------------
// InternalState
// ---------------------------------------------------------------------------

fn clamp_axis(value: f32) -> f32 {
    value.clamp(STATE_MIN, STATE_MAX)
}

/// Bounded emotional state. Every axis stays within [-1, 1].
///
/// Value object: all updates return a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InternalState {
    bonding: f32,
    playfulness: f32,
    fear: f32,
}

impl InternalState {
    /// Build a state, rejecting any value outside [-1, 1] (or NaN).
    pub fn new(bonding: f32, playfulness: f32, fear: f32) -> Result<Self, StateError> {
        for (axis, value) in [
            (StateAxis::Bonding, bonding),
            (StateAxis::Playfulness, playfulness),
            (StateAxis::Fear, fear),
        ] {
            if !(STATE_MIN..=STATE_MAX).contains(&value) {
                return Err(StateError::OutOfRange { axis, value });
            }
        }
        Ok(Self {
            bonding,
            playfulness,
            fear,
        })
    }

    /// Build a state, clamping each axis into range. NaN maps to 0.
    pub fn clamped(bonding: f32, playfulness: f32, fear: f32) -> Self {
        let fix = |v: f32| if v.is_nan() { 0.0 } else { clamp_axis(v) };
        Self {
            bonding: fix(bonding),
            playfulness: fix(playfulness),
            fear: fix(fear),
        }
    }

    pub fn bonding(&self) -> f32 {
        self.bonding
    }

    pub fn playfulness(&self) -> f32 {
        self.playfulness
    }

    pub fn fear(&self) -> f32 {
        self.fear
    }

    pub fn get(&self, axis: StateAxis) -> f32 {
        match axis {
            StateAxis::Bonding => self.bonding,
            StateAxis::Playfulness => self.playfulness,
            StateAxis::Fear => self.fear,
        }
    }

    /// Look up an axis by its config name.
    pub fn value_of(&self, name: &str) -> Option<f32> {
        StateAxis::from_name(name).map(|axis| self.get(axis))
    }

    pub fn update_bonding(&self, amount: f32) -> Self {
        Self::clamped(self.bonding + amount, self.playfulness, self.fear)
    }

    pub fn update_playfulness(&self, amount: f32) -> Self {
        Self::clamped(self.bonding, self.playfulness + amount, self.fear)
    }

    pub fn update_fear(&self, amount: f32) -> Self {
        Self::clamped(self.bonding, self.playfulness, self.fear + amount)
    }

    /// Natural decay of playfulness.
    pub fn decrease_playfulness(&self, amount: f32) -> Self {
        self.update_playfulness(-amount)
    }

    /// Apply `change * factor` to every axis, clamped.
    ///
    /// `change` is usually a per-second rate and `factor` the elapsed seconds.
    pub fn apply_change(&self, change: &InternalStateChange, factor: f32) -> Self {
        Self::clamped(
            self.bonding + change.bonding * factor,
            self.playfulness + change.playfulness * factor,
            self.fear + change.fear * factor,
        )
    }
}

impl Default for InternalState {
    /// The wary stranger: no bond, neutral mood, maximum fear.
    fn default() -> Self {
        Self {
            bonding: -1.0,
            playfulness: 0.0,
            fear: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Deltas
// ---------------------------------------------------------------------------

/// A delta over the internal-state axes (usually per second).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InternalStateChange {
    pub bonding: f32,
    pub playfulness: f32,
    pub fear: f32,
}

impl InternalStateChange {
    pub fn add(&mut self, axis: StateAxis, amount: f32) {
        match axis {
            StateAxis::Bonding => self.bonding += amount,
            StateAxis::Playfulness => self.playfulness += amount,
            StateAxis::Fear => self.fear += amount,
        }
    }
}

/// External facts an action declares about itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalStateChange {
    pub is_playing: Option<bool>,
}

// ---------------------------------------------------------------------------
// ExternalState
// ---------------------------------------------------------------------------

/// Situational snapshot rebuilt by the host every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalState {
    toy_presence: bool,
    /// Only meaningful while a toy is present.
    toy_distance: f32,
    toy_kind: Option<ToyKind>,
    user_presence: bool,
    is_playing: bool,
}

impl ExternalState {
    /// Negative distances are floored at 0.
    pub fn new(toy_presence: bool, toy_distance: f32, user_presence: bool, is_playing: bool) -> Self {
        Self {
            toy_presence,
            toy_distance: toy_distance.max(0.0),
            toy_kind: None,
            user_presence,
            is_playing,
        }
    }

    pub fn toy_presence(&self) -> bool {
        self.toy_presence
    }

    pub fn toy_distance(&self) -> f32 {
        self.toy_distance
    }

    pub fn toy_kind(&self) -> Option<ToyKind> {
        self.toy_kind
    }

    pub fn user_presence(&self) -> bool {
        self.user_presence
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn with_toy(&self, presence: bool, distance: f32, kind: Option<ToyKind>) -> Self {
        Self {
            toy_presence: presence,
            toy_distance: distance.max(0.0),
            toy_kind: kind,
            ..*self
        }
    }

    pub fn with_user(&self, presence: bool) -> Self {
        Self {
            user_presence: presence,
            ..*self
        }
    }

    pub fn with_playing(&self, is_playing: bool) -> Self {
        Self { is_playing, ..*self }
    }

    /// 0/1 encoding of a fact.
    pub fn fact(&self, fact: ExternalFact) -> f32 {
        let on = match fact {
            ExternalFact::UserPresence => self.user_presence,
            ExternalFact::ToyPresence => self.toy_presence,
            ExternalFact::IsPlaying => self.is_playing,
            ExternalFact::ToyNear => self.toy_presence && self.toy_distance < TOY_NEAR_DISTANCE,
        };
        if on {
            1.0
        } else {
            0.0
        }
    }

    /// Look up a fact by its config name.
    pub fn value_of(&self, name: &str) -> Option<f32> {
        ExternalFact::from_name(name).map(|fact| self.fact(fact))
    }
}

impl Default for ExternalState {
    /// No toy, user present, not playing.
    fn default() -> Self {
        Self::new(false, 0.0, true, false)
    }
}
