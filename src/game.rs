//! Game controller
//!
//! Owns the level pack, timer and key table, and sequences levels:
//! `Idle -> Running -> (LevelComplete -> Running | GameComplete -> Idle)`.
//! The host calls `frame` once per displayed frame with a timestamp in
//! milliseconds, then draws with the renderer.

use crate::error::LevelError;
use crate::level::{Level, LevelPack};
use crate::settings::Settings;
use crate::sim::{Key, KeyState, Simulation, TickOutcome};
use crate::theme::Theme;
use crate::timer::Timer;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No level loaded, or the last level start failed
    Idle,
    /// Level being played
    Running,
    /// Exit reached, next level being loaded. Transient: held only inside
    /// `next_level`, hosts see `GameEvent::LevelComplete` instead.
    LevelComplete,
    /// Last exit reached. Transient like `LevelComplete`; the game resets to
    /// level 0 in the same call and reports `GameEvent::GameComplete`.
    GameComplete,
}

/// Notifications for the host, drained after each frame or key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LevelStarted { index: usize, name: String },
    LevelComplete { index: usize },
    /// All levels finished; the host should tell the player
    GameComplete { elapsed_secs: u64 },
}

pub struct Game {
    levels: LevelPack,
    current_level: usize,
    phase: GamePhase,
    timer: Timer,
    keys: KeyState,
    sim: Simulation,
    settings: Settings,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create an idle game; call `start` to enter the first level
    pub fn new(levels: LevelPack, theme: Theme, settings: Settings) -> Self {
        Self {
            levels,
            current_level: 0,
            phase: GamePhase::Idle,
            timer: Timer::new(),
            keys: KeyState::new(),
            sim: Simulation::new(theme, crate::field_bounds()),
            settings,
            events: Vec::new(),
        }
    }

    /// Game over a single level (editor preview)
    pub fn single_level(level: Level, theme: Theme, settings: Settings) -> Self {
        Self::new(LevelPack::new(vec![level]), theme, settings)
    }

    /// Start the sequence at level 0
    pub fn start(&mut self, now: f64) -> Result<(), LevelError> {
        self.start_level(0, now)
    }

    /// Load level `index` and enter `Running`.
    ///
    /// The timer keeps running if it already was. On failure the game is
    /// left `Idle` and the frame loop does nothing.
    pub fn start_level(&mut self, index: usize, now: f64) -> Result<(), LevelError> {
        let result = self.levels.get(index).and_then(|level| {
            level.validate(index)?;
            self.sim.init_level(index, level)?;
            Ok(level.name.clone())
        });

        match result {
            Ok(name) => {
                log::info!("Starting level {}: {}", index + 1, name);
                self.current_level = index;
                self.phase = GamePhase::Running;
                if !self.timer.running {
                    self.timer.start(now);
                }
                self.events.push(GameEvent::LevelStarted { index, name });
                Ok(())
            }
            Err(e) => {
                log::error!("Cannot start level {}: {}", index, e);
                self.current_level = index;
                self.phase = GamePhase::Idle;
                self.timer.stop();
                Err(e)
            }
        }
    }

    /// Run one frame: timer, then simulation. Does nothing unless `Running`.
    pub fn frame(&mut self, now: f64) -> Option<TickOutcome> {
        if self.phase != GamePhase::Running {
            return None;
        }
        self.timer.update(now);
        let outcome = self.sim.update(&self.keys);
        if outcome.reached_exit {
            self.next_level(now);
        }
        Some(outcome)
    }

    /// Advance to the following level, or finish the game after the last one.
    /// Ignored unless a level is running.
    pub fn next_level(&mut self, now: f64) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.phase = GamePhase::LevelComplete;
        self.events.push(GameEvent::LevelComplete {
            index: self.current_level,
        });
        self.current_level += 1;

        if self.current_level >= self.levels.len() {
            self.timer.update(now);
            let elapsed_secs = self.timer.elapsed_secs();
            log::info!("All levels complete in {}s", elapsed_secs);
            self.phase = GamePhase::GameComplete;
            self.events.push(GameEvent::GameComplete { elapsed_secs });
            self.phase = GamePhase::Idle;
            self.reset_game(now);
            return;
        }

        // Failure is logged and leaves the game idle
        let _ = self.start_level(self.current_level, now);
    }

    /// Back to level 0 with the timer at zero and all keys released
    pub fn reset_game(&mut self, now: f64) {
        self.keys.clear();
        self.timer.reset(now);
        let _ = self.start_level(0, now);
    }

    /// Key pressed (`KeyboardEvent.code`); unbound codes are ignored
    pub fn key_down(&mut self, code: &str, now: f64) {
        let Some(key) = self.settings.keys.resolve(code) else {
            return;
        };
        self.keys.press(key);
        match key {
            Key::Reset => self.reset_game(now),
            Key::Skip if self.settings.skip_enabled => self.next_level(now),
            _ => {}
        }
    }

    /// Key released
    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = self.settings.keys.resolve(code) {
            self.keys.release(key);
        }
    }

    /// Take pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level_name(&self) -> &str {
        self.levels
            .levels
            .get(self.current_level)
            .map(|l| l.name.as_str())
            .unwrap_or("")
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
