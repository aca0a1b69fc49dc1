use glam::Vec2;

/// What an action gets to look at when computing its movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionContext {
    pub current: Vec2,
    pub toy: Option<Vec2>,
}

impl ActionContext {
    /// The toy counts as present only when both coordinates are given.
    pub fn new(current_x: f32, current_y: f32, toy_x: Option<f32>, toy_y: Option<f32>) -> Self {
        let toy = match (toy_x, toy_y) {
            (Some(x), Some(y)) => Some(Vec2::new(x, y)),
            _ => None,
        };
        Self {
            current: Vec2::new(current_x, current_y),
            toy,
        }
    }

    pub fn without_toy(current: Vec2) -> Self {
        Self { current, toy: None }
    }

    pub fn with_toy(current: Vec2, toy: Vec2) -> Self {
        Self {
            current,
            toy: Some(toy),
        }
    }

    pub fn has_toy(&self) -> bool {
        self.toy.is_some()
    }

    /// Euclidean distance to the toy, `f32::INFINITY` without one.
    pub fn toy_distance(&self) -> f32 {
        self.toy
            .map_or(f32::INFINITY, |toy| self.current.distance(toy))
    }

    /// Offset from the cat to the toy.
    pub fn toy_movement_delta(&self) -> Option<Vec2> {
        self.toy.map(|toy| toy - self.current)
    }

    pub fn movement_delta_to(&self, target: Vec2) -> Vec2 {
        target - self.current
    }
}
