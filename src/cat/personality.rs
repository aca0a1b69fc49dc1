use serde::{Deserialize, Serialize};

use crate::toy::ToyKind;

/// Personality traits, each in [0.0, 1.0].
///
/// Persisted with the cat. Scoring does not read them yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub social: f32,
    pub active: f32,
    pub bold: f32,
    pub dependent: f32,
    pub friendly: f32,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            social: 0.7,
            active: 0.8,
            bold: 0.6,
            dependent: 0.5,
            friendly: 0.8,
        }
    }
}

/// Preferred movement axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    Horizontal,
    Vertical,
}

/// What the cat likes. Persisted with the cat, inert for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub toy_types: Vec<ToyKind>,
    /// Preferred movement speed in [0.0, 1.0].
    pub movement_speed: f32,
    pub movement_directions: Vec<MovementDirection>,
    /// Preference for erratic movement in [0.0, 1.0].
    pub randomness: f32,
}

impl Preferences {
    pub fn likes(&self, kind: ToyKind) -> bool {
        self.toy_types.contains(&kind)
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            toy_types: vec![ToyKind::Ball, ToyKind::Feather, ToyKind::Mouse],
            movement_speed: 0.7,
            movement_directions: vec![MovementDirection::Horizontal, MovementDirection::Vertical],
            randomness: 0.6,
        }
    }
}
