use std::cell::{Cell, RefCell};
use std::rc::Rc;

use instant::Instant;

/// Wall-clock source in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real time, measured from construction.
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for headless runs and tests. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// One time manager per scene, shared by everything that ticks in it.
pub type SharedTime = Rc<RefCell<GameTimeManager>>;

/// Pausable, scalable simulation clock.
///
/// `total_time` only moves on [`update`](Self::update); `delta_time` is the
/// scaled time since the last update. Call `update` once per frame after the
/// simulation has consumed the frame.
pub struct GameTimeManager {
    clock: Box<dyn Clock>,
    accumulated: f64,
    last_update: f64,
    paused: bool,
    time_scale: f64,
}

impl GameTimeManager {
    pub fn new(clock: impl Clock + 'static) -> Self {
        let now = clock.now_ms();
        Self {
            clock: Box::new(clock),
            accumulated: 0.0,
            last_update: now,
            paused: false,
            time_scale: 1.0,
        }
    }

    /// Backed by real time.
    pub fn real_time() -> Self {
        Self::new(InstantClock::new())
    }

    pub fn into_shared(self) -> SharedTime {
        Rc::new(RefCell::new(self))
    }

    /// Zero the accumulated time and restart from now.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.last_update = self.clock.now_ms();
        self.paused = false;
    }

    pub fn update(&mut self) {
        if self.paused {
            return;
        }
        let now = self.clock.now_ms();
        self.accumulated += (now - self.last_update) * self.time_scale;
        self.last_update = now;
    }

    /// Scaled ms since the last update. 0 while paused.
    pub fn delta_time(&self) -> f64 {
        if self.paused {
            return 0.0;
        }
        (self.clock.now_ms() - self.last_update) * self.time_scale
    }

    /// Accumulated simulation ms since the last reset.
    pub fn total_time(&self) -> f64 {
        self.accumulated
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume without charging the paused interval.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_update = self.clock.now_ms();
            self.paused = false;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Negative scales are clamped to 0.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
}

impl Default for GameTimeManager {
    fn default() -> Self {
        Self::real_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual() -> (ManualClock, GameTimeManager) {
        let clock = ManualClock::new();
        let time = GameTimeManager::new(clock.clone());
        (clock, time)
    }

    #[test]
    fn accumulates_on_update() {
        let (clock, mut time) = manual();
        clock.advance(16.0);
        assert_eq!(time.delta_time(), 16.0);
        assert_eq!(time.total_time(), 0.0);

        time.update();
        assert_eq!(time.total_time(), 16.0);
        assert_eq!(time.delta_time(), 0.0);
    }

    #[test]
    fn pause_freezes_and_resume_forgives() {
        let (clock, mut time) = manual();
        clock.advance(100.0);
        time.update();

        time.pause();
        clock.advance(5_000.0);
        assert_eq!(time.delta_time(), 0.0);
        time.update();
        assert_eq!(time.total_time(), 100.0);

        time.resume();
        assert!(!time.is_paused());
        clock.advance(10.0);
        time.update();
        assert_eq!(time.total_time(), 110.0);
    }

    #[test]
    fn time_scale_applies_and_clamps() {
        let (clock, mut time) = manual();
        time.set_time_scale(2.0);
        clock.advance(50.0);
        assert_eq!(time.delta_time(), 100.0);
        time.update();
        assert_eq!(time.total_time(), 100.0);

        time.set_time_scale(-3.0);
        assert_eq!(time.time_scale(), 0.0);
        clock.advance(50.0);
        time.update();
        assert_eq!(time.total_time(), 100.0);
    }

    #[test]
    fn reset_zeroes() {
        let (clock, mut time) = manual();
        clock.advance(500.0);
        time.update();
        time.pause();
        time.reset();
        assert_eq!(time.total_time(), 0.0);
        assert!(!time.is_paused());
        clock.advance(20.0);
        assert_eq!(time.delta_time(), 20.0);
    }
}
