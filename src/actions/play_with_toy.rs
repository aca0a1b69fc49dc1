use glam::Vec2;

use crate::cat::animation::AnimationCommand;
use crate::cat::state::InternalStateChange;

use super::{should_flip_x, ActionContext, ActionMovement};

/// Within this distance (px) the cat stops chasing and paws at the toy.
pub const CATCH_DISTANCE: f32 = 60.0;
/// Chase speed in pixels/second.
pub const CHASE_SPEED: f32 = 200.0;

/// Playing burns off playfulness but builds trust.
pub(super) const INTERNAL_CHANGE: InternalStateChange = InternalStateChange {
    bonding: 0.033,
    playfulness: -0.033,
    fear: -0.033,
};

pub(super) fn execute(ctx: &ActionContext) -> ActionMovement {
    let Some(to_toy) = ctx.toy_movement_delta() else {
        return ActionMovement::stationary(AnimationCommand::looping("idle"));
    };

    if ctx.toy_distance() <= CATCH_DISTANCE {
        // Close enough: stop and face the toy
        ActionMovement {
            delta: Some(Vec2::ZERO),
            speed: Some(0.0),
            flip_x: Some(should_flip_x(to_toy.x)),
            animation_commands: vec![AnimationCommand::looping("play")],
        }
    } else {
        ActionMovement {
            delta: Some(to_toy),
            speed: Some(CHASE_SPEED),
            flip_x: Some(should_flip_x(to_toy.x)),
            animation_commands: vec![AnimationCommand::looping("chase")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idles_without_toy() {
        let movement = execute(&ActionContext::without_toy(Vec2::new(5.0, 5.0)));
        assert!(!movement.is_moving());
        assert_eq!(movement.speed, None);
        assert_eq!(movement.animation_commands[0].animation_key, "idle");
    }

    #[test]
    fn chases_distant_toy() {
        let movement = execute(&ActionContext::with_toy(Vec2::ZERO, Vec2::new(-120.0, 160.0)));
        assert_eq!(movement.delta, Some(Vec2::new(-120.0, 160.0)));
        assert_eq!(movement.speed, Some(CHASE_SPEED));
        assert_eq!(movement.flip_x, Some(false));
        assert_eq!(movement.animation_commands[0].animation_key, "chase");
    }

    #[test]
    fn plays_when_caught() {
        let movement = execute(&ActionContext::with_toy(Vec2::ZERO, Vec2::new(60.0, 0.0)));
        assert!(!movement.is_moving());
        assert_eq!(movement.speed, Some(0.0));
        assert_eq!(movement.flip_x, Some(true));
        assert!(movement.animation_commands[0].is_looping());
        assert_eq!(movement.animation_commands[0].animation_key, "play");
    }
}
