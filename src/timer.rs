//! Wall-clock elapsed time for the level sequence
//!
//! Elapsed time is the difference between host timestamps (milliseconds),
//! never a frame count, so it stays correct at any frame rate.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timer {
    pub start_time: f64,
    pub current_time: f64,
    pub running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `now`
    pub fn start(&mut self, now: f64) {
        self.start_time = now;
        self.current_time = 0.0;
        self.running = true;
    }

    /// Restart from zero at `now`
    pub fn reset(&mut self, now: f64) {
        self.start(now);
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Refresh elapsed time; no-op while stopped
    pub fn update(&mut self, now: f64) {
        if self.running {
            self.current_time = (now - self.start_time).max(0.0);
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.current_time
    }

    /// Whole seconds elapsed
    pub fn elapsed_secs(&self) -> u64 {
        (self.current_time / 1000.0).floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_from_timestamps() {
        let mut timer = Timer::new();
        timer.update(5000.0);
        assert_eq!(timer.elapsed_ms(), 0.0);

        timer.start(1000.0);
        timer.update(1016.0);
        timer.update(3999.0);
        assert_eq!(timer.elapsed_ms(), 2999.0);
        assert_eq!(timer.elapsed_secs(), 2);
    }

    #[test]
    fn test_reset_and_stop() {
        let mut timer = Timer::new();
        timer.start(0.0);
        timer.update(7500.0);
        timer.reset(8000.0);
        assert_eq!(timer.elapsed_secs(), 0);

        timer.update(9000.0);
        timer.stop();
        timer.update(20000.0);
        assert_eq!(timer.elapsed_ms(), 1000.0);
    }
}
