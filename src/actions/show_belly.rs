use crate::cat::animation::AnimationCommand;
use crate::cat::state::InternalStateChange;

use super::{ActionContext, ActionMovement};

/// Roughly +0.2 bonding over a 3 s belly show.
pub(super) const INTERNAL_CHANGE: InternalStateChange = InternalStateChange {
    bonding: 0.067,
    playfulness: 0.033,
    fear: -0.067,
};

pub(super) fn execute(_ctx: &ActionContext) -> ActionMovement {
    ActionMovement::stationary(AnimationCommand::once("showBelly"))
}
