use crate::cat::animation::AnimationCommand;
use crate::cat::state::InternalStateChange;

use super::{ActionContext, ActionMovement};

pub(super) const INTERNAL_CHANGE: InternalStateChange = InternalStateChange {
    bonding: 0.0,
    playfulness: 0.033,
    fear: -0.033,
};

pub(super) fn execute(_ctx: &ActionContext) -> ActionMovement {
    ActionMovement::stationary(AnimationCommand::looping("sit"))
}
