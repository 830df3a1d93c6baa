//! Lightweight one-shot timing.

use std::time::{Duration, Instant};

/// A timer that measures from creation to [`end`](Self::end) and logs the result.
///
/// Unlike [`PerformanceTimer`](crate::PerformanceTimer) it has no name rules,
/// no markers and no registry entry.
///
/// # Example
///
/// ```rust
/// use perf_timer::QuickTimer;
///
/// let timer = QuickTimer::start("adding jobs data to page");
/// // ... render rows ...
/// let elapsed_ms = timer.end();
/// assert!(elapsed_ms >= 0.0);
/// ```
#[derive(Debug)]
pub struct QuickTimer {
    metric: String,
    start: Instant,
}

impl QuickTimer {
    /// Start timing `metric`.
    #[inline]
    pub fn start(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Get the elapsed duration.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get the elapsed time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Log the elapsed time and return it in milliseconds.
    pub fn end(self) -> f64 {
        let elapsed_ms = self.elapsed_ms();
        tracing::info!(
            target: "perf",
            metric = %self.metric,
            elapsed_ms = elapsed_ms,
            "Time for {} was {}ms",
            self.metric,
            elapsed_ms
        );
        elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_quick_timer_elapsed() {
        let timer = QuickTimer::start("test");
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0, "expected at least 9ms, got {elapsed}");
    }

    #[test]
    fn test_quick_timer_end() {
        let timer = QuickTimer::start("rendering");
        assert_eq!(timer.metric(), "rendering");
        sleep(Duration::from_millis(5));
        let elapsed = timer.end();
        assert!(elapsed >= 4.0, "expected at least 4ms, got {elapsed}");
    }
}
