//! Converts variable frame times into whole fixed simulation ticks.

use std::time::Duration;

/// Most ticks simulated for a single frame; the rest of a long stall is dropped.
pub(crate) const MAX_CATCH_UP_TICKS: u32 = 5;

/// Frame-time accumulator that releases fixed-length ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FixedStep {
    step: Duration,
    accumulator: Duration,
}

impl FixedStep {
    /// Creates an accumulator running at the provided tick rate.
    #[must_use]
    pub(crate) fn new(ticks_per_second: u32) -> Self {
        let step = Duration::from_secs(1) / ticks_per_second.max(1);
        Self {
            step,
            accumulator: Duration::ZERO,
        }
    }

    /// Adds the frame time and returns how many ticks are now due.
    pub(crate) fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulator += frame_time;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < MAX_CATCH_UP_TICKS {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    /// Discards any partially accumulated tick.
    pub(crate) fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
