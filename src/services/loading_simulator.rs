//! Fake page-load progress.
//!
//! A navigation walks `Start -> Ramping -> Stalling -> Complete -> Finished`:
//! progress starts low, climbs by a random step every tick until it would
//! reach the stall threshold, holds there for a while, snaps to 100, and after
//! one more delay the navigation commits. The simulator only computes the
//! next state and the delay before the following step; scheduling and
//! cancellation belong to the caller.

use std::time::Duration;

use ring::rand::{SecureRandom, SystemRandom};

use crate::types::settings::LoadingSettings;

/// Source of per-tick randomness, as a value in `[0, 1)`.
pub trait ProgressSource: Send {
    fn next_unit(&mut self) -> f64;
}

/// Randomness from the system CSPRNG.
pub struct SystemRandomSource {
    rng: SystemRandom,
}

impl SystemRandomSource {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSource for SystemRandomSource {
    fn next_unit(&mut self) -> f64 {
        let mut buf = [0u8; 4];
        match self.rng.fill(&mut buf) {
            Ok(()) => u32::from_le_bytes(buf) as f64 / (u32::MAX as f64 + 1.0),
            Err(_) => 0.5,
        }
    }
}

/// Replays a fixed list of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl ProgressSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Start,
    Ramping,
    Stalling,
    Complete,
    Finished,
}

/// Outcome of one simulator step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadStep {
    pub phase: LoadPhase,
    pub progress: f64,
    /// Delay before the next step; `None` once the load is finished.
    pub next_delay: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct LoadingSimulator {
    settings: LoadingSettings,
    phase: LoadPhase,
    progress: f64,
}

impl LoadingSimulator {
    /// Starts a load. Returns the simulator and the delay until its first tick.
    pub fn start(settings: LoadingSettings) -> (Self, Duration) {
        let sim = Self {
            settings,
            phase: LoadPhase::Start,
            progress: settings.start_progress,
        };
        (sim, settings.tick_interval())
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.phase == LoadPhase::Finished
    }

    /// Advances by one timer firing.
    pub fn advance(&mut self, source: &mut dyn ProgressSource) -> LoadStep {
        let next_delay = match self.phase {
            LoadPhase::Start | LoadPhase::Ramping => {
                let span = self.settings.max_increment - self.settings.min_increment;
                let step = self.settings.min_increment + source.next_unit() * span;
                let next = self.progress + step;
                if next >= self.settings.stall_threshold {
                    self.progress = self.settings.stall_threshold;
                    self.phase = LoadPhase::Stalling;
                    Some(self.settings.stall_delay())
                } else {
                    self.progress = next;
                    self.phase = LoadPhase::Ramping;
                    Some(self.settings.tick_interval())
                }
            }
            LoadPhase::Stalling => {
                self.progress = 100.0;
                self.phase = LoadPhase::Complete;
                Some(self.settings.complete_delay())
            }
            LoadPhase::Complete | LoadPhase::Finished => {
                self.phase = LoadPhase::Finished;
                None
            }
        };

        LoadStep {
            phase: self.phase,
            progress: self.progress,
            next_delay,
        }
    }
}
