pub mod animation;
pub mod personality;
pub mod state;

use std::fmt::Write as _;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::actions::{ActionContext, ActionResult, CatAction};
use crate::behavior::scoring::{ActionProbabilityCalculator, Emotions};
use crate::error::StateError;
use crate::time::SharedTime;

use self::personality::{Personality, Preferences};
use self::state::{ExternalState, InternalState, PLAYFULNESS_DECAY_PER_SEC};

// ---------------------------------------------------------------------------
// Petting constants
// ---------------------------------------------------------------------------

/// Above this fear the cat dislikes being touched.
const PET_FEAR_THRESHOLD: f32 = 0.5;
/// Chance a frightened cat recoils from a pet.
const PET_RECOIL_CHANCE: f32 = 0.7;
const PET_RECOIL_BONDING: f32 = 0.02;
/// Valence at or above this makes a pet welcome.
const PET_VALENCE_THRESHOLD: f32 = -0.1;
const PET_WELCOME_BONDING: f32 = 0.08;
/// Cap on bonding gained from a single pet.
const PET_MAX_BONDING: f32 = 0.1;
/// Chance a grumpy (but unafraid) cat tolerates a pet.
const PET_TOLERATE_CHANCE: f32 = 0.5;
const PET_TOLERATE_BONDING: f32 = 0.01;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The action in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAction {
    pub name: String,
    /// Simulation ms at selection.
    pub start_time: f64,
    /// Minimum run length in ms; 0 re-decides next frame.
    pub duration: f64,
}

impl CurrentAction {
    pub fn elapsed(&self, now: f64) -> f64 {
        now - self.start_time
    }

    pub fn is_running(&self, now: f64) -> bool {
        self.duration > 0.0 && self.elapsed(now) < self.duration
    }

    pub fn remaining(&self, now: f64) -> f64 {
        (self.duration - self.elapsed(now)).max(0.0)
    }
}

/// Everything the host persists about a cat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatSnapshot {
    pub bonding: f32,
    pub playfulness: f32,
    pub fear: f32,
    pub personality: Personality,
    pub preferences: Preferences,
}

// ---------------------------------------------------------------------------
// Cat
// ---------------------------------------------------------------------------

/// A single simulated cat: state, action state machine and per-frame update.
pub struct Cat {
    id: String,
    name: String,
    internal: InternalState,
    external: ExternalState,
    personality: Personality,
    preferences: Preferences,
    calculator: Rc<ActionProbabilityCalculator>,
    time: SharedTime,
    current_action: Option<CurrentAction>,
    /// Set when the latest update picked a new action.
    selected_this_frame: bool,
    last_update_time: f64,
    rng: fastrand::Rng,
}

impl Cat {
    pub fn new(
        name: impl Into<String>,
        internal: InternalState,
        personality: Personality,
        preferences: Preferences,
        calculator: Rc<ActionProbabilityCalculator>,
        time: SharedTime,
    ) -> Self {
        let mut rng = fastrand::Rng::new();
        let id = format!("cat-{:08x}", rng.u32(..));
        let name = name.into();
        log::info!(
            "Cat {} ({}) created: bonding {:.2}, playfulness {:.2}, fear {:.2}",
            name,
            id,
            internal.bonding(),
            internal.playfulness(),
            internal.fear(),
        );
        Self {
            id,
            name,
            internal,
            external: ExternalState::default(),
            personality,
            preferences,
            calculator,
            time,
            current_action: None,
            selected_this_frame: false,
            last_update_time: 0.0,
            rng,
        }
    }

    /// A wary stranger with stock traits and the built-in behavior config.
    pub fn create_default(name: impl Into<String>, time: SharedTime) -> Self {
        Self::new(
            name,
            InternalState::default(),
            Personality::default(),
            Preferences::default(),
            Rc::new(ActionProbabilityCalculator::default()),
            time,
        )
    }

    /// Like [`create_default`](Self::create_default) with a procedural name.
    pub fn with_generated_name(time: SharedTime) -> Self {
        let name = generate_cat_name(&mut fastrand::Rng::new());
        Self::create_default(name, time)
    }

    /// Rehydrate from a persisted snapshot. Out-of-range values are rejected.
    pub fn from_snapshot(
        name: impl Into<String>,
        snapshot: &CatSnapshot,
        calculator: Rc<ActionProbabilityCalculator>,
        time: SharedTime,
    ) -> Result<Self, StateError> {
        let internal = InternalState::new(snapshot.bonding, snapshot.playfulness, snapshot.fear)
            .inspect_err(|e| log::warn!("Rejected cat snapshot: {e}"))?;
        Ok(Self::new(
            name,
            internal,
            snapshot.personality,
            snapshot.preferences.clone(),
            calculator,
            time,
        ))
    }

    /// Reseed the cat's RNG for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn snapshot(&self) -> CatSnapshot {
        CatSnapshot {
            bonding: self.internal.bonding(),
            playfulness: self.internal.playfulness(),
            fear: self.internal.fear(),
            personality: self.personality,
            preferences: self.preferences.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Per-frame update
    // -----------------------------------------------------------------------

    /// Advance one frame. See [`update_with_context`](Self::update_with_context).
    pub fn update(
        &mut self,
        external: ExternalState,
        current_x: f32,
        current_y: f32,
        toy_x: Option<f32>,
        toy_y: Option<f32>,
    ) -> Option<ActionResult> {
        let ctx = ActionContext::new(current_x, current_y, toy_x, toy_y);
        self.update_with_context(external, &ctx)
    }

    /// Advance one frame: integrate state over the elapsed time, keep or
    /// replace the current action, and return its movement.
    ///
    /// Returns `None` only when the chosen action has no behavior.
    pub fn update_with_context(
        &mut self,
        external: ExternalState,
        ctx: &ActionContext,
    ) -> Option<ActionResult> {
        let (delta_ms, now) = {
            let time = self.time.borrow();
            (time.delta_time(), time.total_time())
        };
        self.last_update_time = now;
        self.selected_this_frame = false;
        self.external = external;

        let seconds = (delta_ms / 1000.0) as f32;
        self.update_internal_state_by_time(seconds);

        if let Some(current) = &self.current_action {
            if current.is_running(now) {
                return self.continue_action(ctx, seconds);
            }
            log::debug!(
                "{}: {} finished after {:.0}ms",
                self.name,
                current.name,
                current.elapsed(now)
            );
            self.current_action = None;
        }

        self.start_new_action(ctx, now)
    }

    /// Natural decay plus the situation's per-second influence.
    fn update_internal_state_by_time(&mut self, seconds: f32) {
        let influence = self.calculator.calculate_external_influence(&self.external);
        self.internal = self
            .internal
            .decrease_playfulness(PLAYFULNESS_DECAY_PER_SEC * seconds)
            .apply_change(&influence, seconds);
    }

    /// Re-aim the running action and apply its per-second deltas.
    fn continue_action(&mut self, ctx: &ActionContext, seconds: f32) -> Option<ActionResult> {
        let current = self.current_action.as_ref()?;
        let action = CatAction::from_name(&current.name)?;

        if let Some(change) = action.internal_state_change() {
            self.internal = self.internal.apply_change(&change, seconds);
        }

        let movement = action.execute(ctx);
        log::trace!("{}: {} moving {:?}", self.name, current.name, movement.delta);
        Some(ActionResult {
            movement: Some(movement),
            ..ActionResult::default()
        })
    }

    fn start_new_action(&mut self, ctx: &ActionContext, now: f64) -> Option<ActionResult> {
        let probabilities = self
            .calculator
            .calculate_action_probabilities(&self.internal, &self.external);
        let name = self.calculator.select_action(&probabilities, &mut self.rng)?;

        let Some(action) = CatAction::from_name(&name) else {
            log::warn!("{}: action `{}` has no behavior, skipping", self.name, name);
            return None;
        };
        let duration = self
            .calculator
            .get_action_config(&name)
            .map_or(0.0, |config| config.duration_ms());

        log::debug!(
            "{}: starting {} for {:.0}ms (p = {:.2})",
            self.name,
            name,
            duration,
            probabilities.get(&name).copied().unwrap_or(0.0)
        );
        self.selected_this_frame = true;
        self.current_action = Some(CurrentAction {
            name,
            start_time: now,
            duration,
        });

        Some(action.create_action_result(ctx))
    }

    // -----------------------------------------------------------------------
    // Interaction
    // -----------------------------------------------------------------------

    /// React to being petted. Outcome depends on fear and valence.
    ///
    /// Non-finite intensities are ignored.
    pub fn pet_by_user(&mut self, intensity: f32) {
        if !intensity.is_finite() {
            log::warn!("{}: ignoring pet with intensity {}", self.name, intensity);
            return;
        }
        let valence = self
            .current_emotions()
            .get("valence")
            .copied()
            .unwrap_or(0.0);

        if self.internal.fear() > PET_FEAR_THRESHOLD {
            if self.rng.f32() < PET_RECOIL_CHANCE {
                self.internal = self.internal.update_bonding(-PET_RECOIL_BONDING * intensity);
            }
        } else if valence >= PET_VALENCE_THRESHOLD {
            let gain = (PET_WELCOME_BONDING * intensity).min(PET_MAX_BONDING);
            self.internal = self.internal.update_bonding(gain);
        } else if self.rng.f32() < PET_TOLERATE_CHANCE {
            self.internal = self.internal.update_bonding(PET_TOLERATE_BONDING * intensity);
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Bonding on a 0..=10 scale for UI.
    pub fn bonding_level(&self) -> u8 {
        ((self.internal.bonding() + 1.0) * 5.0).clamp(0.0, 10.0).floor() as u8
    }

    pub fn current_emotions(&self) -> Emotions {
        self.calculator.calculate_emotions(&self.internal)
    }

    pub fn internal_state(&self) -> InternalState {
        self.internal
    }

    pub fn external_state(&self) -> ExternalState {
        self.external
    }

    pub fn current_action(&self) -> Option<&CurrentAction> {
        self.current_action.as_ref()
    }

    /// Whether the latest update started a new action (possibly the same name).
    pub fn selected_this_frame(&self) -> bool {
        self.selected_this_frame
    }

    /// Ms left on the current action, as of the last update.
    pub fn remaining_action_time(&self) -> Option<f64> {
        self.current_action
            .as_ref()
            .map(|a| a.remaining(self.last_update_time))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn calculator(&self) -> &ActionProbabilityCalculator {
        &self.calculator
    }

    /// Multi-line summary for a debug overlay.
    pub fn debug_report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== {} ({}) ===", self.name, self.id);
        let _ = writeln!(out, "Bonding level: {}/10", self.bonding_level());

        match &self.current_action {
            Some(action) => {
                let _ = writeln!(
                    out,
                    "Action: {} ({:.1}s left)",
                    action.name,
                    action.remaining(self.last_update_time) / 1000.0
                );
            }
            None => {
                let _ = writeln!(out, "Action: none");
            }
        }

        out.push_str("-- Emotions --\n");
        for (emotion, value) in self.current_emotions() {
            let _ = writeln!(out, "{emotion}: {value:.3}");
        }

        out.push_str("-- Internal --\n");
        let _ = writeln!(
            out,
            "bonding: {:.3}\nplayfulness: {:.3}\nfear: {:.3}",
            self.internal.bonding(),
            self.internal.playfulness(),
            self.internal.fear()
        );

        out.push_str("-- External --\n");
        let _ = writeln!(
            out,
            "toyPresence: {}\ntoyDistance: {:.1}\nuserPresence: {}\nisPlaying: {}",
            self.external.toy_presence(),
            self.external.toy_distance(),
            self.external.user_presence(),
            self.external.is_playing()
        );
        out
    }
}

/// Generate a cat name from name parts.
pub fn generate_cat_name(rng: &mut fastrand::Rng) -> String {
    const PREFIXES: &[&str] = &["", "", "", "", "Little ", "Old ", "Sir ", "Miss "];
    const NAMES: &[&str] = &[
        "Tanuki", "Mochi", "Kinako", "Sesame", "Yuzu", "Daifuku", "Hachi", "Sora",
        "Kuro", "Shiro", "Momo", "Azuki", "Ponzu", "Nori", "Udon", "Miso",
    ];
    const SUFFIXES: &[&str] = &["", "", "", "", "-chan", " the Brave", " Paws"];
    format!(
        "{}{}{}",
        PREFIXES[rng.usize(..PREFIXES.len())],
        NAMES[rng.usize(..NAMES.len())],
        SUFFIXES[rng.usize(..SUFFIXES.len())],
    )
}
