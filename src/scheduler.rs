//! Fixed-interval task scheduler
//!
//! A `Simulation` owns the game state together with the four periodic
//! tasks that drive it (sensor sampling, projectile advance, obstacle
//! advance + collisions, obstacle spawn).  The caller decides how time
//! passes: a frame loop hands in wall-clock elapsed time, a test hands in
//! exact durations.  Tasks fire in timestamp order; tasks due at the same
//! instant run in declaration order of `Task`.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compute::{advance_projectiles, apply_tilt, fire, init_state, obstacle_tick, spawn_obstacle};
use crate::entities::{GameState, SessionState};
use crate::input::TiltSource;
use crate::settings::{ConfigError, Settings};

/// Longest span a single `advance` call will simulate.  Anything beyond is
/// dropped so a stalled frame can't trigger a burst of catch-up ticks.
pub const MAX_CATCH_UP: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    Sensor,
    Projectiles,
    Obstacles,
    Spawn,
}

const TASKS: [Task; 4] = [Task::Sensor, Task::Projectiles, Task::Obstacles, Task::Spawn];

/// A repeating timer.  Fires every `period` until cancelled.
#[derive(Clone, Debug, PartialEq)]
pub struct Timer {
    period: Duration,
    until_next: Duration,
    active: bool,
}

impl Timer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            until_next: period,
            active: true,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn until_next(&self) -> Duration {
        self.until_next
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Let `dt` pass.  Returns true when the timer fired (and re-armed).
    /// `dt` must not exceed `until_next`.
    fn elapse(&mut self, dt: Duration) -> bool {
        if !self.active {
            return false;
        }
        self.until_next = self.until_next.saturating_sub(dt);
        if self.until_next.is_zero() {
            self.until_next = self.period;
            true
        } else {
            false
        }
    }
}

/// Per-task fire counts, mostly for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickCounts {
    pub sensor: u64,
    pub projectiles: u64,
    pub obstacles: u64,
    pub spawn: u64,
}

/// Simulation context: game state, tuning, RNG and timers.
pub struct Simulation<R: Rng = StdRng> {
    state: GameState,
    settings: Settings,
    rng: R,
    timers: [Timer; 4],
    counts: TickCounts,
    clock: Duration,
}

impl Simulation<StdRng> {
    /// Seeded from `settings.seed` when set, otherwise from entropy.
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(settings, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Fails when `settings` don't validate; a zero interval would never
    /// let `advance` make progress.
    pub fn with_rng(settings: Settings, rng: R) -> Result<Self, ConfigError> {
        settings.validate()?;
        let timers = [
            Timer::new(settings.sensor_interval()),
            Timer::new(settings.bullet_interval()),
            Timer::new(settings.block_interval()),
            Timer::new(settings.spawn_interval()),
        ];
        log::info!(
            "session start: screen {}x{}, seed {:?}",
            settings.screen_width,
            settings.screen_height,
            settings.seed
        );
        Ok(Self {
            state: init_state(&settings),
            settings,
            rng,
            timers,
            counts: TickCounts::default(),
            clock: Duration::ZERO,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn counts(&self) -> TickCounts {
        self.counts
    }

    /// Simulated time since the session started.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn timer(&self, task: Task) -> &Timer {
        &self.timers[task as usize]
    }

    /// True once every timer has been torn down.
    pub fn timers_cancelled(&self) -> bool {
        self.timers.iter().all(|t| !t.is_active())
    }

    /// Fire action.  Ignored after game over.
    pub fn fire(&mut self) {
        self.state = fire(&self.state, &self.settings);
    }

    /// Run a single task immediately, outside the timer schedule.
    pub fn run_task(&mut self, task: Task, tilt: &mut impl TiltSource) {
        if self.is_over() {
            return;
        }
        match task {
            Task::Sensor => {
                self.counts.sensor += 1;
                if let Some(sample) = tilt.poll() {
                    self.state = apply_tilt(&self.state, sample, &self.settings);
                }
            }
            Task::Projectiles => {
                self.counts.projectiles += 1;
                self.state = advance_projectiles(&self.state, &self.settings);
            }
            Task::Obstacles => {
                self.counts.obstacles += 1;
                self.state = obstacle_tick(&self.state, &self.settings);
            }
            Task::Spawn => {
                self.counts.spawn += 1;
                self.state = spawn_obstacle(&self.state, &self.settings, &mut self.rng);
            }
        }
        if self.is_over() {
            self.shutdown();
        }
    }

    /// Let `elapsed` of simulated time pass, running every task that comes
    /// due, in time order.  Returns the session state afterwards.
    pub fn advance(&mut self, elapsed: Duration, tilt: &mut impl TiltSource) -> SessionState {
        let mut remaining = elapsed.min(MAX_CATCH_UP);

        while !self.is_over() {
            let next = self
                .timers
                .iter()
                .filter(|t| t.is_active())
                .map(|t| t.until_next())
                .min();
            let step = match next {
                Some(step) if step <= remaining => step,
                _ => {
                    for timer in self.timers.iter_mut() {
                        timer.elapse(remaining);
                    }
                    self.clock += remaining;
                    break;
                }
            };

            remaining -= step;
            self.clock += step;
            let mut due = [false; 4];
            for (slot, timer) in due.iter_mut().zip(self.timers.iter_mut()) {
                *slot = timer.elapse(step);
            }
            for (task, fired) in TASKS.into_iter().zip(due) {
                if fired {
                    self.run_task(task, tilt);
                }
            }
        }

        log::trace!(
            "t={:?} projectiles={} obstacles={}",
            self.clock,
            self.state.projectiles.len(),
            self.state.obstacles.len()
        );
        self.state.status
    }

    /// Cancel every timer.  Called automatically on game over; idempotent.
    pub fn shutdown(&mut self) {
        if self.timers_cancelled() {
            return;
        }
        for timer in self.timers.iter_mut() {
            timer.cancel();
        }
        log::info!(
            "session stopped after {:?} ({} obstacle ticks, {} spawns)",
            self.clock,
            self.counts.obstacles,
            self.counts.spawn
        );
    }
}

impl<R: Rng> Drop for Simulation<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{NoSensor, ScriptedTilt};

    fn seeded(settings: Settings) -> Simulation<StdRng> {
        Simulation::with_rng(settings, StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn zero_interval_is_rejected() {
        let settings = Settings {
            sensor_interval_ms: 0,
            ..Settings::default()
        };
        match Simulation::with_rng(settings, StdRng::seed_from_u64(1)) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "sensor_interval_ms"),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("zero interval accepted"),
        }
    }

    #[test]
    fn timers_follow_settings() {
        let settings = Settings {
            spawn_interval_ms: 900,
            ..Settings::default()
        };
        let sim = seeded(settings);
        assert_eq!(sim.timer(Task::Sensor).period(), Duration::from_millis(10));
        assert_eq!(sim.timer(Task::Projectiles).period(), Duration::from_millis(100));
        assert_eq!(sim.timer(Task::Obstacles).period(), Duration::from_millis(50));
        assert_eq!(sim.timer(Task::Spawn).period(), Duration::from_millis(900));
        assert!(sim.timer(Task::Spawn).is_active());
    }

    #[test]
    fn timer_fires_on_period() {
        let mut t = Timer::new(Duration::from_millis(50));
        assert!(!t.elapse(Duration::from_millis(30)));
        assert!(t.elapse(Duration::from_millis(20)));
        assert_eq!(t.until_next(), Duration::from_millis(50));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut t = Timer::new(Duration::from_millis(10));
        t.cancel();
        assert!(!t.elapse(Duration::from_millis(10)));
        assert!(!t.is_active());
    }

    #[test]
    fn tasks_fire_at_their_intervals() {
        let mut sim = seeded(Settings::default());
        sim.advance(Duration::from_millis(200), &mut NoSensor);
        let c = sim.counts();
        assert_eq!(c.sensor, 20);
        assert_eq!(c.projectiles, 2);
        assert_eq!(c.obstacles, 4);
        assert_eq!(c.spawn, 0);
        assert_eq!(sim.clock(), Duration::from_millis(200));
    }

    #[test]
    fn split_advances_match_one_advance() {
        let mut a = seeded(Settings::default());
        let mut b = seeded(Settings::default());
        a.advance(Duration::from_millis(240), &mut NoSensor);
        for _ in 0..24 {
            b.advance(Duration::from_millis(10), &mut NoSensor);
        }
        assert_eq!(a.counts(), b.counts());
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn first_spawn_after_one_interval() {
        let mut sim = seeded(Settings::default());
        for _ in 0..5 {
            sim.advance(Duration::from_millis(250), &mut NoSensor);
        }
        assert!(sim.state().obstacles.is_empty());
        sim.advance(Duration::from_millis(250), &mut NoSensor);
        assert_eq!(sim.state().obstacles.len(), 1);
    }

    #[test]
    fn advance_is_capped() {
        let mut sim = seeded(Settings::default());
        sim.advance(Duration::from_secs(10), &mut NoSensor);
        assert_eq!(sim.clock(), MAX_CATCH_UP);
    }

    #[test]
    fn sensor_samples_are_consumed_per_tick() {
        let mut sim = seeded(Settings::default());
        let mut tilt = ScriptedTilt::new([1.0, 1.0, 1.0]);
        let start = sim.state().player.x;
        sim.advance(Duration::from_millis(20), &mut tilt);
        assert_eq!(tilt.remaining(), 1);
        assert_eq!(sim.state().player.x, start + 60.0);
    }

    #[test]
    fn game_over_cancels_timers() {
        let mut sim = seeded(Settings::default());
        sim.state.obstacles.push(crate::entities::Obstacle {
            id: 99,
            x: sim.state.player.x,
            y: 40.0,
        });
        let status = sim.advance(Duration::from_millis(50), &mut NoSensor);
        assert_eq!(status, SessionState::GameOver);
        assert!(sim.timers_cancelled());

        let counts = sim.counts();
        sim.advance(Duration::from_millis(200), &mut NoSensor);
        assert_eq!(sim.counts(), counts);
    }
}
