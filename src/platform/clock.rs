//! Time sources for the race loop

use std::time::Instant;

/// Monotonic seconds since some fixed origin
pub trait Clock {
    fn now(&mut self) -> f64;
}

/// Wall clock for interactive play
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Simulated clock that moves forward by `step` on every reading
#[derive(Debug, Clone, Copy)]
pub struct FixedStepClock {
    time: f64,
    step: f64,
}

impl FixedStepClock {
    pub fn new(step: f64) -> Self {
        Self { time: 0.0, step }
    }

    /// Time of the latest reading, without advancing
    pub fn current(&self) -> f64 {
        self.time
    }

    /// Jump forward, e.g. to simulate a long pause
    pub fn skip(&mut self, seconds: f64) {
        self.time += seconds;
    }
}

impl Clock for FixedStepClock {
    fn now(&mut self) -> f64 {
        self.time += self.step;
        self.time
    }
}
