//! Scoped timers that end on every exit path.

use std::ops::Deref;

use crate::handle::TimerHandle;

/// Ends its timer when dropped.
///
/// Opt-in alternative to calling `end` by hand: the session is closed even
/// when the enclosing code returns early or unwinds.
///
/// ```rust
/// use perf_timer::{PerfConfig, PerformanceTimers, Parameters};
///
/// let timers = PerformanceTimers::new(PerfConfig::default());
/// {
///     let scope = timers.scoped("Render Table", Parameters::new()).unwrap();
///     scope.set_marker("Rows Built").unwrap();
/// }
/// assert!(timers.get("Render Table").is_null());
/// ```
#[derive(Debug)]
pub struct TimerScope {
    timer: TimerHandle,
    log_total: bool,
    ended: bool,
}

impl TimerScope {
    /// Start `timer` and take charge of ending it.
    pub fn new(timer: TimerHandle) -> Self {
        timer.start();
        Self {
            timer,
            log_total: false,
            ended: false,
        }
    }

    /// Whether the final `Start` to `End` measure goes into the report.
    pub fn with_log_total(mut self, log_total: bool) -> Self {
        self.log_total = log_total;
        self
    }

    pub fn timer(&self) -> &TimerHandle {
        &self.timer
    }

    /// End the timer now.
    pub fn finish(mut self) {
        self.end_once();
    }

    fn end_once(&mut self) {
        if !self.ended {
            self.ended = true;
            self.timer.clone().end(self.log_total);
        }
    }
}

impl Deref for TimerScope {
    type Target = TimerHandle;

    fn deref(&self) -> &TimerHandle {
        &self.timer
    }
}

impl Drop for TimerScope {
    fn drop(&mut self) {
        self.end_once();
    }
}
