use std::time::Instant;

/// Source of monotonically non-decreasing frame timestamps, in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock measuring seconds since it was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock driven by the caller, e.g. from recorded frame timestamps.
///
/// It never moves backwards: earlier times and negative steps are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new(start: f64) -> ManualClock {
        ManualClock { now: start }
    }

    /// Move the clock to `time`. Returns false if `time` is in the past.
    pub fn set(&mut self, time: f64) -> bool {
        if time >= self.now {
            self.now = time;
            true
        } else {
            false
        }
    }

    /// Move the clock forward by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.now += dt;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }
}
