//! Timed auto-advance.
//!
//! [`Autoplay`] decides *when* a gallery's repeating timer exists; the timer
//! itself comes from a [`TimerFactory`], so the browser binding can hand out
//! real `setInterval` timers while tests use a fake clock.
//!
//! A timer handle cancels itself when dropped. Every restart drops the old
//! handle before asking the factory for a new one, so a gallery never has two
//! live timers. Restarts begin a fresh interval; nothing resumes a partial
//! countdown.

/// Source of repeating timers.
pub trait TimerFactory {
    /// Live timer. Dropping it must cancel it.
    type Timer;

    /// Start a timer that fires every `interval_ms` until dropped.
    fn every(&mut self, interval_ms: u32) -> Self::Timer;
}

/// Factory for galleries that never auto-advance.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTimers;

impl TimerFactory for NoTimers {
    type Timer = ();

    fn every(&mut self, _interval_ms: u32) {}
}

/// Auto-advance state for one gallery.
pub struct Autoplay<T: TimerFactory> {
    timers: T,
    interval_ms: u32,
    live: Option<T::Timer>,
    paused: bool,
}

impl<T: TimerFactory> Autoplay<T> {
    /// Create a stopped auto-advance. Call [`Autoplay::start`] to run it.
    pub fn new(timers: T, interval_ms: u32) -> Self {
        Self {
            timers,
            interval_ms,
            live: None,
            paused: false,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn start(&mut self) {
        self.paused = false;
        self.restart();
    }

    /// Stop the timer because the user is interacting (hover, touch).
    pub fn pause(&mut self) {
        self.paused = true;
        self.live = None;
    }

    /// Interaction ended: run again with a full interval.
    pub fn resume(&mut self) {
        self.start();
    }

    /// Manual navigation: push the next automatic advance a full interval out.
    /// Does nothing while paused or stopped.
    pub fn reset(&mut self) {
        if self.live.is_some() {
            self.restart();
        }
    }

    pub fn stop(&mut self) {
        self.live = None;
    }

    fn restart(&mut self) {
        // Drop first: the old timer is gone before the new one exists.
        self.live = None;
        self.live = Some(self.timers.every(self.interval_ms));
    }
}
