//! Submission loader animation state

use std::time::{Duration, Instant};

/// Progress overlay shown while an application is being submitted
#[derive(Debug, Clone, Copy)]
pub struct LoaderState {
    /// When the submission started
    pub start_time: Instant,
}

impl LoaderState {
    /// The loader stays up at least this long, even for instant answers
    pub const MIN_DURATION: Duration = Duration::from_millis(1500);

    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(start_time: Instant) -> Self {
        Self { start_time }
    }

    /// Eased progress in `0.0..=1.0`
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.start_time);
        let linear = (elapsed.as_secs_f32() / Self::MIN_DURATION.as_secs_f32()).min(1.0);
        // Cubic ease-out: quick start, slow finish
        simple_easing::cubic_out(linear)
    }

    /// Whether the minimum display time has passed
    pub fn min_elapsed(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start_time) >= Self::MIN_DURATION
    }
}

impl Default for LoaderState {
    fn default() -> Self {
        Self::new()
    }
}
