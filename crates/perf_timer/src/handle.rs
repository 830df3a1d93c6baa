//! One capability surface over active and null timers.

use crate::error::PerfResult;
use crate::marker::Marker;
use crate::null_timer::NullTimer;
use crate::timer::PerformanceTimer;

/// A timer as seen by callers: either recording or a no-op.
///
/// Which variant a caller gets is decided once, when the timer is created or
/// looked up; every operation is available on both.
#[derive(Debug, Clone)]
pub enum TimerHandle {
    Active(PerformanceTimer),
    Null(NullTimer),
}

impl TimerHandle {
    pub fn name(&self) -> Option<&str> {
        match self {
            TimerHandle::Active(timer) => Some(timer.name()),
            TimerHandle::Null(timer) => timer.name(),
        }
    }

    /// See [`PerformanceTimer::start`].
    pub fn start(&self) -> &Self {
        match self {
            TimerHandle::Active(timer) => {
                timer.start();
            }
            TimerHandle::Null(timer) => {
                timer.start();
            }
        }
        self
    }

    /// See [`PerformanceTimer::set_marker`].
    pub fn set_marker(&self, marker: impl Into<Marker>) -> PerfResult<()> {
        match self {
            TimerHandle::Active(timer) => timer.set_marker(marker),
            TimerHandle::Null(timer) => timer.set_marker(marker),
        }
    }

    /// See [`PerformanceTimer::end`].
    pub fn end(self, log_total: bool) {
        match self {
            TimerHandle::Active(timer) => timer.end(log_total),
            TimerHandle::Null(timer) => timer.end(log_total),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TimerHandle::Active(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TimerHandle::Null(_))
    }

    /// The recording timer, if this handle has one.
    pub fn as_active(&self) -> Option<&PerformanceTimer> {
        match self {
            TimerHandle::Active(timer) => Some(timer),
            TimerHandle::Null(_) => None,
        }
    }
}

impl From<PerformanceTimer> for TimerHandle {
    fn from(timer: PerformanceTimer) -> Self {
        TimerHandle::Active(timer)
    }
}

impl From<NullTimer> for TimerHandle {
    fn from(timer: NullTimer) -> Self {
        TimerHandle::Null(timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MonotonicBackend;
    use crate::registry::TimerRegistry;
    use perf_telemetry::{Parameters, Reporter};
    use std::sync::Arc;

    #[test]
    fn test_null_handle() {
        let handle = TimerHandle::from(NullTimer::named("Missing"));

        assert!(handle.is_null());
        assert!(handle.as_active().is_none());
        assert_eq!(handle.name(), Some("Missing"));
        assert!(handle.start().set_marker("Anything").is_ok());
        handle.end(false);
    }

    #[test]
    fn test_active_handle_delegates() {
        let registry = TimerRegistry::new();
        let timer = PerformanceTimer::create(
            "Load",
            Parameters::new(),
            Arc::new(MonotonicBackend::new()),
            Reporter::default().with_enabled(false),
            &registry,
        )
        .unwrap();
        let handle = TimerHandle::from(timer.clone());

        assert!(handle.is_active());
        assert_eq!(handle.name(), Some("Load"));
        handle.start().set_marker("Fetched").unwrap();
        assert_eq!(timer.last_marker(), "Fetched");

        handle.end(false);
        assert!(timer.is_ended());
        assert!(registry.is_empty());
    }
}
