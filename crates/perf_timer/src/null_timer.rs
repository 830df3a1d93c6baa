//! No-op stand-in for [`PerformanceTimer`](crate::PerformanceTimer).

use crate::error::PerfResult;
use crate::marker::Marker;

/// A timer that records nothing.
///
/// Handed out when monitoring is switched off, and by lookups for names with
/// no live timer, so callers can keep chaining without checking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullTimer {
    name: Option<String>,
}

impl NullTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A null timer standing in for the timer called `name`.
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn start(&self) -> &Self {
        self
    }

    pub fn set_marker(&self, _marker: impl Into<Marker>) -> PerfResult<()> {
        Ok(())
    }

    pub fn end(self, _log_total: bool) {}
}
