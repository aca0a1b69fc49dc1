use glam::Vec2;

use crate::cat::animation::AnimationCommand;

use super::{should_flip_x, ActionContext, ActionMovement};

/// Play area the corners are computed for.
pub const AREA_WIDTH: f32 = 800.0;
pub const AREA_HEIGHT: f32 = 600.0;
/// Corner inset from the walls.
pub const CORNER_MARGIN: f32 = 50.0;
/// Closer than this to the corner counts as arrived.
pub const ARRIVAL_DISTANCE: f32 = 30.0;
/// Flee speed in pixels/second.
pub const FLEE_SPEED: f32 = 150.0;

/// Hiding spots in tie-break order: top-left, top-right, bottom-left, bottom-right.
pub const CORNERS: [Vec2; 4] = [
    Vec2::new(CORNER_MARGIN, CORNER_MARGIN),
    Vec2::new(AREA_WIDTH - CORNER_MARGIN, CORNER_MARGIN),
    Vec2::new(CORNER_MARGIN, AREA_HEIGHT - CORNER_MARGIN),
    Vec2::new(AREA_WIDTH - CORNER_MARGIN, AREA_HEIGHT - CORNER_MARGIN),
];

/// Corner farthest from `threat`. Earlier corners win ties.
pub fn corner_farthest_from(threat: Vec2) -> Vec2 {
    let mut best = CORNERS[0];
    let mut best_dist = -1.0;
    for corner in CORNERS {
        let dist = corner.distance(threat);
        if dist > best_dist {
            best_dist = dist;
            best = corner;
        }
    }
    best
}

pub(super) fn execute(ctx: &ActionContext) -> ActionMovement {
    // Flee from the toy if there is one, otherwise just get far away.
    let target = corner_farthest_from(ctx.toy.unwrap_or(ctx.current));

    if ctx.current.distance(target) <= ARRIVAL_DISTANCE {
        return ActionMovement {
            delta: Some(Vec2::ZERO),
            speed: Some(0.0),
            flip_x: Some(should_flip_x(0.0)),
            animation_commands: vec![AnimationCommand::looping("scared")],
        };
    }

    let delta = ctx.movement_delta_to(target);
    ActionMovement {
        delta: Some(delta),
        speed: Some(FLEE_SPEED),
        flip_x: Some(should_flip_x(delta.x)),
        animation_commands: vec![AnimationCommand::looping("escape")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_threat_picks_first_corner() {
        assert_eq!(corner_farthest_from(Vec2::new(400.0, 300.0)), CORNERS[0]);
    }

    #[test]
    fn picks_opposite_corner() {
        assert_eq!(corner_farthest_from(Vec2::new(100.0, 100.0)), Vec2::new(750.0, 550.0));
        assert_eq!(corner_farthest_from(Vec2::new(700.0, 120.0)), Vec2::new(50.0, 550.0));
        // Equal distance to both bottom corners: bottom-left comes first.
        assert_eq!(corner_farthest_from(Vec2::new(400.0, 50.0)), Vec2::new(50.0, 550.0));
    }

    #[test]
    fn flees_toward_corner_away_from_toy() {
        let ctx = ActionContext::with_toy(Vec2::new(300.0, 300.0), Vec2::new(600.0, 450.0));
        let movement = execute(&ctx);
        assert_eq!(movement.delta, Some(Vec2::new(-250.0, -250.0)));
        assert_eq!(movement.speed, Some(FLEE_SPEED));
        assert_eq!(movement.flip_x, Some(false));
        assert_eq!(movement.animation_commands[0].animation_key, "escape");
    }

    #[test]
    fn without_toy_flees_from_itself() {
        let ctx = ActionContext::without_toy(Vec2::new(200.0, 500.0));
        let movement = execute(&ctx);
        assert_eq!(movement.delta, Some(Vec2::new(550.0, -450.0)));
        assert_eq!(movement.flip_x, Some(true));
    }

    #[test]
    fn cowers_on_arrival() {
        let ctx = ActionContext::with_toy(Vec2::new(60.0, 70.0), Vec2::new(700.0, 500.0));
        let movement = execute(&ctx);
        assert!(!movement.is_moving());
        assert_eq!(movement.flip_x, Some(false));
        assert_eq!(movement.animation_commands[0].animation_key, "scared");
    }
}
