pub mod context;
mod play_with_toy;
mod run_away;
mod show_belly;
mod sit;

use glam::Vec2;
use serde::Serialize;

use crate::cat::animation::AnimationCommand;
use crate::cat::state::{ExternalStateChange, InternalStateChange};

pub use context::ActionContext;
pub use play_with_toy::{CATCH_DISTANCE, CHASE_SPEED};
pub use run_away::{
    corner_farthest_from, ARRIVAL_DISTANCE, AREA_HEIGHT, AREA_WIDTH, CORNERS, FLEE_SPEED,
};

/// Movement command for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMovement {
    /// Offset toward the target. Only the direction matters to the host.
    pub delta: Option<Vec2>,
    /// Pixels per second. `None` lets the host pick its default.
    pub speed: Option<f32>,
    /// Mirror the sprite (it is drawn facing left).
    pub flip_x: Option<bool>,
    pub animation_commands: Vec<AnimationCommand>,
}

impl ActionMovement {
    /// Stand still and play `animation`.
    pub fn stationary(animation: AnimationCommand) -> Self {
        Self {
            delta: Some(Vec2::ZERO),
            speed: None,
            flip_x: None,
            animation_commands: vec![animation],
        }
    }

    pub fn is_moving(&self) -> bool {
        self.delta.is_some_and(|d| d != Vec2::ZERO)
    }
}

/// Everything one frame of an action hands back to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub internal_state_change: Option<InternalStateChange>,
    pub external_state_change: Option<ExternalStateChange>,
    pub movement: Option<ActionMovement>,
}

/// Sprites face left, so moving right means flipping.
pub(crate) fn should_flip_x(delta_x: f32) -> bool {
    delta_x > 0.0
}

/// The closed set of things a cat can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatAction {
    ShowBelly,
    Sit,
    PlayWithToy,
    RunAway,
}

impl CatAction {
    pub const ALL: [CatAction; 4] = [
        Self::ShowBelly,
        Self::Sit,
        Self::PlayWithToy,
        Self::RunAway,
    ];

    /// Config key for this action.
    pub fn name(self) -> &'static str {
        match self {
            Self::ShowBelly => "showBelly",
            Self::Sit => "sit",
            Self::PlayWithToy => "playWithToy",
            Self::RunAway => "runAway",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    pub fn execute(self, ctx: &ActionContext) -> ActionMovement {
        match self {
            Self::ShowBelly => show_belly::execute(ctx),
            Self::Sit => sit::execute(ctx),
            Self::PlayWithToy => play_with_toy::execute(ctx),
            Self::RunAway => run_away::execute(ctx),
        }
    }

    /// Per-second internal-state deltas while the action runs.
    pub fn internal_state_change(self) -> Option<InternalStateChange> {
        match self {
            Self::ShowBelly => Some(show_belly::INTERNAL_CHANGE),
            Self::Sit => Some(sit::INTERNAL_CHANGE),
            Self::PlayWithToy => Some(play_with_toy::INTERNAL_CHANGE),
            Self::RunAway => None,
        }
    }

    /// External facts the action declares about itself.
    pub fn external_state_change(self) -> Option<ExternalStateChange> {
        match self {
            Self::PlayWithToy => Some(ExternalStateChange {
                is_playing: Some(true),
            }),
            Self::ShowBelly | Self::Sit | Self::RunAway => None,
        }
    }

    pub fn create_action_result(self, ctx: &ActionContext) -> ActionResult {
        ActionResult {
            internal_state_change: self.internal_state_change(),
            external_state_change: self.external_state_change(),
            movement: Some(self.execute(ctx)),
        }
    }
}
