//! Tick Timers
//!
//! Synchronous tick counters. The board uses one for the pre-round
//! countdown and one for the round length.

use serde::{Serialize, Deserialize};

/// Countdown timer measured in ticks.
///
/// A limit of 0 makes the timer unlimited: it is always `done()` and never
/// `just_finished()`. Whether a timer is unlimited is fixed while it counts
/// down.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    limit: u32,
    unlimited: bool,
    countdown: u32,
    time: u32,
    running: bool,
    just_finished: bool,
}

impl Timer {
    /// Create a stopped timer.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            unlimited: limit == 0,
            ..Self::default()
        }
    }

    /// Restart the countdown from the limit.
    pub fn start(&mut self) -> &mut Self {
        self.countdown = self.limit;
        self.unlimited = self.limit == 0;
        self.time = 0;
        self.running = !self.unlimited;
        self.just_finished = false;
        self
    }

    /// Stop the countdown.
    pub fn stop(&mut self) -> &mut Self {
        self.countdown = 0;
        self.running = false;
        self.just_finished = false;
        self
    }

    /// Change the limit. A running countdown keeps its length and the new
    /// limit applies from the next `start()`; an idle timer switches between
    /// limited and unlimited at once.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
        if !self.running {
            self.unlimited = limit == 0;
        }
    }

    /// Advance one tick, calling `on_tick` with the remaining countdown
    /// while the timer is running.
    pub fn tick<F: FnMut(u32)>(&mut self, mut on_tick: F) {
        self.just_finished = false;

        if self.unlimited() {
            self.time = self.time.saturating_add(1);
            return;
        }
        if !self.running {
            return;
        }

        self.time = self.time.saturating_add(1);
        self.countdown = self.countdown.saturating_sub(1);
        on_tick(self.countdown);

        if self.countdown == 0 {
            self.running = false;
            self.just_finished = true;
        }
    }

    /// True only on the tick the countdown reached zero.
    #[inline]
    pub fn just_finished(&self) -> bool {
        self.just_finished
    }

    /// True once the countdown is over.
    #[inline]
    pub fn done(&self) -> bool {
        self.unlimited() || self.countdown == 0
    }

    /// True when the timer never finishes.
    #[inline]
    pub fn unlimited(&self) -> bool {
        self.unlimited
    }

    /// Ticks elapsed since the last `start()`.
    #[inline]
    pub fn time(&self) -> u32 {
        self.time
    }

    /// Remaining ticks.
    #[inline]
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Configured limit.
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// True while counting down.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }
}
