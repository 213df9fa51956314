//! Fixed-interval tick driver
//!
//! Converts real elapsed time into whole simulation ticks. The arena never
//! sees wall-clock time; pausing simply stops ticks from being issued.

use crate::config::SimConfig;
use crate::sim::{Arena, TickReport};

/// Longest real-time gap accepted per update (seconds)
const MAX_FRAME_TIME: f32 = 0.25;

/// Accumulator-based fixed timestep scheduler
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: f32,
    accumulator: f32,
    running: bool,
    max_ticks_per_update: u32,
    ticks_run: u64,
}

impl Scheduler {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            interval: config.tick_interval(),
            accumulator: 0.0,
            running: true,
            max_ticks_per_update: config.max_ticks_per_update,
            ticks_run: 0,
        }
    }

    /// Seconds per tick
    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            self.accumulator = 0.0;
            log::info!("Simulation paused after {} ticks", self.ticks_run);
        }
    }

    pub fn resume(&mut self) {
        if !self.running {
            self.running = true;
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Total ticks issued since creation
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    /// Feed elapsed real time and run the ticks it pays for
    ///
    /// Returns the report of every tick run, oldest first.
    pub fn update(&mut self, elapsed: f32, arena: &mut Arena) -> Vec<TickReport> {
        if !self.running {
            return Vec::new();
        }
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);

        let mut reports = Vec::new();
        while self.accumulator >= self.interval && reports.len() < self.max_ticks_per_update as usize
        {
            reports.push(arena.advance());
            self.accumulator -= self.interval;
            self.ticks_run += 1;
        }

        // Drop backlog we refused to catch up on
        if reports.len() == self.max_ticks_per_update as usize && self.accumulator >= self.interval {
            log::debug!("Scheduler dropping {:.3}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        reports
    }
}
