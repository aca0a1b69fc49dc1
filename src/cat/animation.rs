use serde::{Deserialize, Serialize};

/// Loop the clip until told otherwise.
pub const REPEAT_FOREVER: i32 = -1;
/// Play the clip exactly once.
pub const PLAY_ONCE: i32 = 0;

/// One entry of the animation queue handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationCommand {
    pub animation_key: String,
    /// -1 = loop, 0 = once, n = n + 1 plays.
    pub repeat: i32,
}

impl AnimationCommand {
    pub fn looping(key: &str) -> Self {
        Self {
            animation_key: key.to_owned(),
            repeat: REPEAT_FOREVER,
        }
    }

    pub fn once(key: &str) -> Self {
        Self {
            animation_key: key.to_owned(),
            repeat: PLAY_ONCE,
        }
    }

    pub fn is_looping(&self) -> bool {
        self.repeat < 0
    }
}
