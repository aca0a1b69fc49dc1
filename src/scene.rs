use glam::Vec2;

use crate::actions::{ActionContext, ActionResult, AREA_HEIGHT, AREA_WIDTH};
use crate::cat::animation::AnimationCommand;
use crate::cat::state::ExternalState;
use crate::cat::Cat;
use crate::time::SharedTime;
use crate::toy::{Toy, ToyKind};

/// Host speed when a movement command leaves it unset (pixels/second).
pub const DEFAULT_MOVE_SPEED: f32 = 100.0;

/// Headless play area: one cat, an optional toy, and whether the user is around.
///
/// Each [`tick`](Self::tick) samples the world into an [`ExternalState`],
/// lets the cat decide, integrates the returned movement, then advances the
/// shared clock.
pub struct Scene {
    cat: Cat,
    time: SharedTime,
    cat_pos: Vec2,
    facing_right: bool,
    animation: Option<AnimationCommand>,
    toy: Option<Toy>,
    user_present: bool,
    is_playing: bool,
    frame_count: u64,
}

impl Scene {
    /// The cat starts in the middle of the area.
    pub fn new(cat: Cat, time: SharedTime) -> Self {
        Self {
            cat,
            time,
            cat_pos: Vec2::new(AREA_WIDTH * 0.5, AREA_HEIGHT * 0.5),
            facing_right: false,
            animation: None,
            toy: None,
            user_present: true,
            is_playing: false,
            frame_count: 0,
        }
    }

    /// Run one frame. Returns the cat's result for the frame, if any.
    pub fn tick(&mut self) -> Option<ActionResult> {
        let dt = (self.time.borrow().delta_time() / 1000.0) as f32;

        if let Some(toy) = &mut self.toy {
            toy.update(dt, AREA_WIDTH, AREA_HEIGHT);
        }

        let external = self.sample_external();
        let ctx = match &self.toy {
            Some(toy) => ActionContext::with_toy(self.cat_pos, toy.pos),
            None => ActionContext::without_toy(self.cat_pos),
        };
        let result = self.cat.update_with_context(external, &ctx);

        if let Some(result) = &result {
            if self.cat.selected_this_frame() {
                self.is_playing = result
                    .external_state_change
                    .and_then(|change| change.is_playing)
                    .unwrap_or(false);
            }
            self.apply_result(result, dt);
        }

        self.time.borrow_mut().update();
        self.frame_count += 1;
        result
    }

    /// Facts the cat perceives this frame.
    pub fn sample_external(&self) -> ExternalState {
        let base = ExternalState::default()
            .with_user(self.user_present)
            .with_playing(self.is_playing);
        match &self.toy {
            Some(toy) => base.with_toy(true, self.cat_pos.distance(toy.pos), Some(toy.kind)),
            None => base.with_toy(false, 0.0, None),
        }
    }

    fn apply_result(&mut self, result: &ActionResult, dt: f32) {
        let Some(movement) = &result.movement else {
            return;
        };

        if let Some(flip) = movement.flip_x {
            self.facing_right = flip;
        }
        if let Some(animation) = movement.animation_commands.last() {
            self.animation = Some(animation.clone());
        }

        if let Some(delta) = movement.delta {
            let speed = movement.speed.unwrap_or(DEFAULT_MOVE_SPEED);
            // Never overshoot the target.
            let step = (speed * dt).min(delta.length());
            self.cat_pos += delta.normalize_or_zero() * step;
            self.cat_pos = self
                .cat_pos
                .clamp(Vec2::ZERO, Vec2::new(AREA_WIDTH, AREA_HEIGHT));
        }
    }

    // -----------------------------------------------------------------------
    // User interaction
    // -----------------------------------------------------------------------

    pub fn pet_cat(&mut self, intensity: f32) {
        log::debug!("Petting {} (intensity {:.1})", self.cat.name(), intensity);
        self.cat.pet_by_user(intensity);
    }

    /// Put a toy down, replacing any existing one.
    pub fn place_toy(&mut self, kind: ToyKind, pos: Vec2) {
        let pos = pos.clamp(Vec2::ZERO, Vec2::new(AREA_WIDTH, AREA_HEIGHT));
        log::debug!(
            "Placing {} at ({:.0}, {:.0}){}",
            kind.label(),
            pos.x,
            pos.y,
            if self.cat.preferences().likes(kind) { ", a favourite" } else { "" }
        );
        self.toy = Some(Toy::new(kind, pos));
    }

    /// Drag the toy somewhere else. Dragging stops it.
    pub fn drag_toy(&mut self, pos: Vec2) {
        if let Some(toy) = &mut self.toy {
            toy.move_to(pos.clamp(Vec2::ZERO, Vec2::new(AREA_WIDTH, AREA_HEIGHT)));
        }
    }

    pub fn remove_toy(&mut self) {
        if self.toy.take().is_some() {
            log::debug!("Toy removed");
        }
        self.is_playing = false;
    }

    /// Push the toy if there is one.
    pub fn flick_toy(&mut self, direction: Vec2) {
        if let Some(toy) = &mut self.toy {
            toy.flick(direction);
        }
    }

    pub fn set_user_present(&mut self, present: bool) {
        self.user_present = present;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn cat(&self) -> &Cat {
        &self.cat
    }

    pub fn cat_mut(&mut self) -> &mut Cat {
        &mut self.cat
    }

    pub fn cat_position(&self) -> Vec2 {
        self.cat_pos
    }

    pub fn set_cat_position(&mut self, pos: Vec2) {
        self.cat_pos = pos.clamp(Vec2::ZERO, Vec2::new(AREA_WIDTH, AREA_HEIGHT));
    }

    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    pub fn animation(&self) -> Option<&AnimationCommand> {
        self.animation.as_ref()
    }

    pub fn toy(&self) -> Option<&Toy> {
        self.toy.as_ref()
    }

    pub fn user_present(&self) -> bool {
        self.user_present
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn time(&self) -> &SharedTime {
        &self.time
    }
}
