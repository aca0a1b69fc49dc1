use glam::Vec2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Toy kinds
// ---------------------------------------------------------------------------

/// Kinds of toy the user can dangle in front of the cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToyKind {
    Ball,
    Feather,
    Mouse,
    Laser,
}

/// How a toy moves when flicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementStyle {
    Bounce,
    Flutter,
    Scurry,
    Dart,
}

/// Static per-kind traits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToyCharacteristics {
    pub movement: MovementStyle,
    /// Relative speed in [0.0, 1.0].
    pub preferred_speed: f32,
    pub attractiveness: f32,
    /// RGB, packed.
    pub color: u32,
}

impl ToyKind {
    pub const ALL: [ToyKind; 4] = [Self::Ball, Self::Feather, Self::Mouse, Self::Laser];

    pub fn label(self) -> &'static str {
        match self {
            Self::Ball => "ball",
            Self::Feather => "feather",
            Self::Mouse => "mouse",
            Self::Laser => "laser",
        }
    }

    pub fn characteristics(self) -> ToyCharacteristics {
        match self {
            Self::Ball => ToyCharacteristics {
                movement: MovementStyle::Bounce,
                preferred_speed: 0.5,
                attractiveness: 0.7,
                color: 0xff6b6b,
            },
            Self::Feather => ToyCharacteristics {
                movement: MovementStyle::Flutter,
                preferred_speed: 0.3,
                attractiveness: 0.9,
                color: 0x4ecdc4,
            },
            Self::Mouse => ToyCharacteristics {
                movement: MovementStyle::Scurry,
                preferred_speed: 0.8,
                attractiveness: 1.0,
                color: 0x45b7d1,
            },
            Self::Laser => ToyCharacteristics {
                movement: MovementStyle::Dart,
                preferred_speed: 1.0,
                attractiveness: 1.2,
                color: 0xff4757,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Toy
// ---------------------------------------------------------------------------

/// Full-speed flick velocity for a kind with `preferred_speed == 1.0` (px/s).
const MAX_FLICK_SPEED: f32 = 400.0;
/// Friction applied each tick.
const TOY_FRICTION: f32 = 0.98;
/// Minimum speed before the toy stops.
const TOY_MIN_SPEED: f32 = 5.0;
/// Bounce elasticity.
const TOY_BOUNCE: f32 = 0.75;
/// Keep the toy this far inside the play area.
const TOY_MARGIN: f32 = 10.0;

/// A single toy in the play area, with simple physics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Toy {
    pub kind: ToyKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Toy {
    pub fn new(kind: ToyKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }

    /// Drag the toy to a new spot. Dragging stops any motion.
    pub fn move_to(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
    }

    /// Give the toy a push in `direction`, scaled by its kind's speed.
    pub fn flick(&mut self, direction: Vec2) {
        let speed = self.kind.characteristics().preferred_speed * MAX_FLICK_SPEED;
        self.vel = direction.normalize_or_zero() * speed;
    }

    /// Integrate motion, bounce off the walls, apply friction.
    pub fn update(&mut self, dt: f32, area_w: f32, area_h: f32) {
        self.pos += self.vel * dt;
        self.vel *= TOY_FRICTION;

        if self.pos.x < TOY_MARGIN {
            self.pos.x = TOY_MARGIN;
            self.vel.x = self.vel.x.abs() * TOY_BOUNCE;
        }
        if self.pos.x > area_w - TOY_MARGIN {
            self.pos.x = area_w - TOY_MARGIN;
            self.vel.x = -self.vel.x.abs() * TOY_BOUNCE;
        }
        if self.pos.y < TOY_MARGIN {
            self.pos.y = TOY_MARGIN;
            self.vel.y = self.vel.y.abs() * TOY_BOUNCE;
        }
        if self.pos.y > area_h - TOY_MARGIN {
            self.pos.y = area_h - TOY_MARGIN;
            self.vel.y = -self.vel.y.abs() * TOY_BOUNCE;
        }

        // Stop if very slow
        if self.vel.length_squared() < TOY_MIN_SPEED * TOY_MIN_SPEED {
            self.vel = Vec2::ZERO;
        }
    }
}
