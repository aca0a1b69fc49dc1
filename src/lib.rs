//! Rule-based behavior simulation for a virtual pet cat.
//!
//! Per frame the host samples the world into an [`ExternalState`], calls
//! [`Cat::update`] and integrates the returned movement. [`Scene`] is a
//! ready-made headless host.

pub mod actions;
pub mod behavior;
pub mod cat;
pub mod error;
pub mod scene;
pub mod time;
pub mod toy;

pub use actions::{ActionContext, ActionMovement, ActionResult, CatAction};
pub use behavior::{ActionProbabilityCalculator, BehaviorConfig};
pub use cat::animation::AnimationCommand;
pub use cat::personality::{Personality, Preferences};
pub use cat::state::{ExternalState, InternalState, InternalStateChange};
pub use cat::{Cat, CatSnapshot, CurrentAction};
pub use error::{ConfigError, StateError};
pub use scene::Scene;
pub use time::{GameTimeManager, ManualClock, SharedTime};
pub use toy::{Toy, ToyKind};
