//! Timing primitives behind the timers.
//!
//! A backend records named marks and computes named measures between them.
//! Several entries may share one name: a measure resolves each mark to its
//! most recent entry, and a measure's duration is read from its first entry.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::error::{PerfError, PerfResult};

/// Mark name that always resolves to the backend's time origin.
pub const NAVIGATION_START: &str = "navigationStart";

/// Mark/measure primitives used by [`PerformanceTimer`](crate::PerformanceTimer).
pub trait PerformanceBackend: Send + Sync + Debug {
    /// Record a mark at the current time.
    fn mark(&self, name: &str) -> PerfResult<()>;

    /// Record a measure named `measure` spanning `start_mark` to `end_mark`.
    fn measure(&self, measure: &str, start_mark: &str, end_mark: &str) -> PerfResult<()>;

    /// Remove every mark entry named `name`.
    fn clear_marks(&self, name: &str);

    /// Remove every measure entry named `name`.
    fn clear_measures(&self, name: &str);

    /// Duration of the first measure entry named `measure`.
    fn measure_duration(&self, measure: &str) -> PerfResult<Duration>;
}

#[derive(Debug, Default)]
struct Entries {
    marks: HashMap<String, Vec<Instant>>,
    measures: HashMap<String, Vec<Duration>>,
}

/// In-process backend over the monotonic clock.
#[derive(Debug)]
pub struct MonotonicBackend {
    origin: Instant,
    entries: Mutex<Entries>,
}

impl Default for MonotonicBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicBackend {
    /// Create a backend whose time origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            entries: Mutex::new(Entries::default()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The instant [`NAVIGATION_START`] resolves to.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Record a mark at an explicit instant.
    pub fn mark_at(&self, name: &str, at: Instant) {
        self.entries()
            .marks
            .entry(name.to_string())
            .or_default()
            .push(at);
    }

    /// Whether any entry for the mark exists.
    pub fn has_mark(&self, name: &str) -> bool {
        self.entries().marks.contains_key(name)
    }

    /// Whether any entry for the measure exists.
    pub fn has_measure(&self, name: &str) -> bool {
        self.entries().measures.contains_key(name)
    }

    /// Total number of mark entries.
    pub fn mark_count(&self) -> usize {
        self.entries().marks.values().map(Vec::len).sum()
    }

    /// Total number of measure entries.
    pub fn measure_count(&self) -> usize {
        self.entries().measures.values().map(Vec::len).sum()
    }

    fn resolve(&self, entries: &Entries, name: &str) -> PerfResult<Instant> {
        match entries.marks.get(name).and_then(|m| m.last()) {
            Some(at) => Ok(*at),
            None if name == NAVIGATION_START => Ok(self.origin),
            None => Err(PerfError::UnknownMark(name.to_string())),
        }
    }
}

impl PerformanceBackend for MonotonicBackend {
    fn mark(&self, name: &str) -> PerfResult<()> {
        self.mark_at(name, Instant::now());
        Ok(())
    }

    fn measure(&self, measure: &str, start_mark: &str, end_mark: &str) -> PerfResult<()> {
        let mut entries = self.entries();
        let start = self.resolve(&entries, start_mark)?;
        let end = self.resolve(&entries, end_mark)?;

        entries
            .measures
            .entry(measure.to_string())
            .or_default()
            .push(end.saturating_duration_since(start));
        Ok(())
    }

    fn clear_marks(&self, name: &str) {
        self.entries().marks.remove(name);
    }

    fn clear_measures(&self, name: &str) {
        self.entries().measures.remove(name);
    }

    fn measure_duration(&self, measure: &str) -> PerfResult<Duration> {
        self.entries()
            .measures
            .get(measure)
            .and_then(|m| m.first())
            .copied()
            .ok_or_else(|| PerfError::UnknownMeasure(measure.to_string()))
    }
}
