use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use glam::Vec2;
use instant::Instant;

use petcat::cat::generate_cat_name;
use petcat::{
    ActionProbabilityCalculator, BehaviorConfig, Cat, GameTimeManager, InternalState,
    ManualClock, Personality, Preferences, Scene, ToyKind,
};

/// Simulation step (ms).
const TICK_MS: f64 = 1000.0 / 60.0;
/// How often to log a status line (simulated seconds).
const STATUS_LOG_INTERVAL: f64 = 5.0;
const DEFAULT_SECONDS: f64 = 30.0;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Settings {
    config_path: Option<PathBuf>,
    seconds: f64,
    seed: Option<u64>,
    cat_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: None,
            seconds: DEFAULT_SECONDS,
            seed: None,
            cat_name: None,
        }
    }
}

impl Settings {
    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(path) = lookup("PETCAT_CONFIG").filter(|p| !p.is_empty()) {
            settings.config_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup("PETCAT_SECONDS") {
            match raw.parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => settings.seconds = secs,
                _ => log::warn!(
                    "PETCAT_SECONDS={raw:?} is not a positive number, using {DEFAULT_SECONDS}"
                ),
            }
        }
        if let Some(raw) = lookup("PETCAT_SEED") {
            match raw.parse::<u64>() {
                Ok(seed) => settings.seed = Some(seed),
                Err(_) => log::warn!("PETCAT_SEED={raw:?} is not an integer, ignoring"),
            }
        }
        settings.cat_name = lookup("PETCAT_CAT_NAME").filter(|n| !n.trim().is_empty());
        settings
    }
}

// ---------------------------------------------------------------------------
// Run statistics
// ---------------------------------------------------------------------------

struct RunStats {
    frames: u64,
    selections: BTreeMap<String, u32>,
    last_status: f64,
    started: Instant,
}

impl RunStats {
    fn new() -> Self {
        Self {
            frames: 0,
            selections: BTreeMap::new(),
            last_status: 0.0,
            started: Instant::now(),
        }
    }

    fn record_frame(&mut self, scene: &Scene, started_action: Option<&str>) {
        self.frames += 1;
        if let Some(name) = started_action {
            *self.selections.entry(name.to_owned()).or_default() += 1;
        }

        let now_secs = scene.time().borrow().total_time() / 1000.0;
        if now_secs - self.last_status >= STATUS_LOG_INTERVAL {
            self.last_status = now_secs;
            let cat = scene.cat();
            let state = cat.internal_state();
            let pos = scene.cat_position();
            log::info!(
                "t={:.0}s | {} | pos ({:.0}, {:.0}) | bonding {:.2} play {:.2} fear {:.2} | level {}/10",
                now_secs,
                cat.current_action().map_or("-", |a| a.name.as_str()),
                pos.x,
                pos.y,
                state.bonding(),
                state.playfulness(),
                state.fear(),
                cat.bonding_level(),
            );
        }
    }

    fn log_summary(&self) {
        let wall_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        log::info!(
            "{} frames in {:.1}ms wall ({:.3}ms/frame)",
            self.frames,
            wall_ms,
            wall_ms / self.frames.max(1) as f64
        );
        for (name, count) in &self.selections {
            log::info!("  {name}: selected {count}x");
        }
    }
}

// ---------------------------------------------------------------------------
// Demo
// ---------------------------------------------------------------------------

/// Scripted visitor: brings a toy, plays, pets, leaves.
fn script(scene: &mut Scene, t_secs: f64, prev_secs: f64) {
    let crossed = |mark: f64| prev_secs < mark && t_secs >= mark;

    if crossed(3.0) {
        scene.place_toy(ToyKind::Ball, Vec2::new(650.0, 150.0));
    }
    if crossed(6.0) {
        scene.flick_toy(Vec2::new(-1.0, 0.6));
    }
    if crossed(10.0) {
        let near_cat = scene.cat_position() + Vec2::new(40.0, 0.0);
        scene.drag_toy(near_cat);
    }
    if scene.user_present() && (t_secs / 2.0).floor() > (prev_secs / 2.0).floor() {
        scene.pet_cat(1.0);
    }
    if crossed(15.0) {
        scene.place_toy(ToyKind::Feather, Vec2::new(120.0, 480.0));
        scene.flick_toy(Vec2::new(1.0, -0.3));
    }
    if crossed(22.0) {
        scene.remove_toy();
        scene.set_user_present(false);
    }
}

fn run(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &settings.config_path {
        Some(path) => BehaviorConfig::from_path(path)?,
        None => BehaviorConfig::default(),
    };
    let calculator = Rc::new(ActionProbabilityCalculator::try_new(config)?);

    let clock = ManualClock::new();
    let time = GameTimeManager::new(clock.clone()).into_shared();

    let mut name_rng = settings
        .seed
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let name = settings
        .cat_name
        .clone()
        .unwrap_or_else(|| generate_cat_name(&mut name_rng));

    let mut cat = Cat::new(
        name,
        InternalState::default(),
        Personality::default(),
        Preferences::default(),
        calculator,
        time.clone(),
    );
    if let Some(seed) = settings.seed {
        cat = cat.with_seed(seed);
    }

    let mut scene = Scene::new(cat, time);
    let mut stats = RunStats::new();
    let end_ms = settings.seconds * 1000.0;
    log::info!("Simulating {:.0}s of {}", settings.seconds, scene.cat().name());

    while scene.time().borrow().total_time() < end_ms {
        let prev_secs = scene.time().borrow().total_time() / 1000.0;
        clock.advance(TICK_MS);
        script(&mut scene, prev_secs + TICK_MS / 1000.0, prev_secs);

        scene.tick();
        let started = scene
            .cat()
            .current_action()
            .filter(|_| scene.cat().selected_this_frame())
            .map(|a| a.name.clone());
        stats.record_frame(&scene, started.as_deref());
    }

    stats.log_summary();
    for line in scene.cat().debug_report().lines() {
        log::info!("{line}");
    }
    log::info!("Snapshot: {}", serde_json::to_string(&scene.cat().snapshot())?);
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("PetCat starting up");

    let settings = Settings::from_env();
    if let Err(e) = run(&settings) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
