//! The active performance timer.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use perf_telemetry::{MeasuredDuration, Parameters, ReportOutcome, Reporter};

use crate::backend::PerformanceBackend;
use crate::error::PerfResult;
use crate::marker::Marker;
use crate::naming::{measure_id, qualify, validate_marker_name, validate_timer_name};
use crate::registry::{TimerRegistry, WeakRegistry};

/// Name of the marker every session starts from.
pub const START_MARKER: &str = "Start";

/// Name of the marker set by [`PerformanceTimer::end`].
pub const END_MARKER: &str = "End";

#[derive(Debug)]
struct TimerState {
    last_marker: String,
    markers: HashSet<String>,
    measures: HashSet<String>,
    measures_to_log: Vec<String>,
    ended: bool,
}

#[derive(Debug)]
struct TimerInner {
    name: String,
    parameters: Parameters,
    backend: Arc<dyn PerformanceBackend>,
    reporter: Reporter,
    registry: WeakRegistry,
    state: Mutex<TimerState>,
}

/// One measurement session.
///
/// A timer owns a set of markers scoped by its name (`"<name> <marker>"`) and
/// the measures computed between them. Setting a marker measures from the
/// previous marker by default; measures flagged for logging are reported once
/// when the timer ends. Ending also clears every mark and measure the timer
/// created from the backend and removes it from the registry.
///
/// Handles are cheap to clone and all refer to the same session.
#[derive(Debug, Clone)]
pub struct PerformanceTimer {
    inner: Arc<TimerInner>,
}

impl PerformanceTimer {
    /// Validate `name`, build a timer and register it, replacing any timer
    /// already registered under that name.
    pub fn create(
        name: &str,
        parameters: Parameters,
        backend: Arc<dyn PerformanceBackend>,
        reporter: Reporter,
        registry: &TimerRegistry,
    ) -> PerfResult<Self> {
        validate_timer_name(name)?;

        let state = TimerState {
            last_marker: START_MARKER.to_string(),
            markers: HashSet::from([qualify(name, START_MARKER)]),
            measures: HashSet::new(),
            measures_to_log: Vec::new(),
            ended: false,
        };

        let timer = Self {
            inner: Arc::new(TimerInner {
                name: name.to_string(),
                parameters,
                backend,
                reporter,
                registry: registry.downgrade(),
                state: Mutex::new(state),
            }),
        };
        registry.register(timer.clone());

        Ok(timer)
    }

    fn state(&self) -> MutexGuard<'_, TimerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Metadata attached to this timer's report.
    pub fn parameters(&self) -> &Parameters {
        &self.inner.parameters
    }

    /// Whether two handles refer to the same session.
    pub fn same_instance(&self, other: &PerformanceTimer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Mark the start of the session.
    ///
    /// Calling this again moves the start point.
    pub fn start(&self) -> &Self {
        if self.state().ended {
            tracing::warn!(target: "perf", "{} Performance timer has already ended", self.name());
            return self;
        }
        self.mark(&qualify(self.name(), START_MARKER));
        self
    }

    /// Set a marker and measure to it.
    ///
    /// The marker is measured from its primary reference (the previous marker
    /// unless [`Marker::from_marker`] says otherwise) and from every extra
    /// reference. A reference naming a marker of this timer resolves to that
    /// marker; any other reference is used as a raw backend mark name.
    ///
    /// An invalid marker name is an error. Reusing a marker name is not: the
    /// call is ignored with a warning. Measures whose reference cannot be
    /// resolved are skipped with a warning.
    pub fn set_marker(&self, marker: impl Into<Marker>) -> PerfResult<()> {
        let marker = marker.into();
        validate_marker_name(marker.name())?;

        let mut state = self.state();
        if state.ended {
            tracing::warn!(target: "perf", "{} Performance timer has already ended", self.name());
            return Ok(());
        }

        let qualified = qualify(self.name(), marker.name());
        if state.markers.contains(&qualified) {
            tracing::warn!(
                target: "perf",
                "Marker name {} already exists on {} PerformanceTimer. Cannot set this marker.",
                marker.name(),
                self.name()
            );
            return Ok(());
        }

        state.markers.insert(qualified.clone());
        let previous = std::mem::replace(&mut state.last_marker, marker.name().to_string());
        self.mark(&qualified);

        let primary = marker.measure_from().unwrap_or(previous.as_str());
        let references = marker.references().iter().map(String::as_str);
        for reference in std::iter::once(primary).chain(references) {
            let scoped = qualify(self.name(), reference);
            let start_mark = if state.markers.contains(&scoped) {
                scoped.as_str()
            } else {
                reference
            };
            self.measure(&mut state, start_mark, &qualified, marker.is_logged());
        }

        Ok(())
    }

    /// End the session.
    ///
    /// Sets the `End` marker measured from `Start` (logged when `log_total`
    /// is set), reports every logged measure, then removes the timer from the
    /// registry and clears its marks and measures from the backend.
    pub fn end(self, log_total: bool) {
        if self.is_ended() {
            tracing::warn!(target: "perf", "{} Performance timer has already ended", self.name());
            return;
        }

        let end_marker = Marker::new(END_MARKER)
            .with_log(log_total)
            .from_marker(START_MARKER);
        if let Err(e) = self.set_marker(end_marker) {
            tracing::warn!(target: "perf", "Failed to set end marker on {}: {}", self.name(), e);
        }

        let (markers, measures, logged) = {
            let mut state = self.state();
            if state.ended {
                return;
            }
            state.ended = true;
            (
                std::mem::take(&mut state.markers),
                std::mem::take(&mut state.measures),
                std::mem::take(&mut state.measures_to_log),
            )
        };

        let durations: Vec<MeasuredDuration> = logged
            .iter()
            .filter_map(|measure| match self.inner.backend.measure_duration(measure) {
                Ok(duration) => Some(MeasuredDuration::new(measure.as_str(), duration)),
                Err(e) => {
                    tracing::warn!(target: "perf", "{}", e);
                    None
                }
            })
            .collect();

        let outcome = self
            .inner
            .reporter
            .report(self.name(), &durations, &self.inner.parameters);
        if outcome == ReportOutcome::Sent {
            tracing::trace!(target: "perf", timer = self.name(), "performance timer reported");
        }

        if let Some(registry) = self.inner.registry.upgrade() {
            registry.remove_instance(&self);
        }
        for marker in &markers {
            self.inner.backend.clear_marks(marker);
        }
        for measure in &measures {
            self.inner.backend.clear_measures(measure);
        }
    }

    fn mark(&self, mark: &str) {
        tracing::trace!(target: "perf", mark = mark, "mark");
        if let Err(e) = self.inner.backend.mark(mark) {
            tracing::warn!(target: "perf", "{}", e);
        }
    }

    fn measure(&self, state: &mut TimerState, start_mark: &str, end_mark: &str, log: bool) {
        let measure = measure_id(start_mark, end_mark);
        match self.inner.backend.measure(&measure, start_mark, end_mark) {
            Ok(()) => {
                if log && !state.measures_to_log.contains(&measure) {
                    state.measures_to_log.push(measure.clone());
                }
                state.measures.insert(measure);
            }
            Err(e) => tracing::warn!(target: "perf", "{}", e),
        }
    }

    /// Name of the most recently set marker.
    pub fn last_marker(&self) -> String {
        self.state().last_marker.clone()
    }

    /// Qualified markers set so far, sorted.
    pub fn markers(&self) -> Vec<String> {
        let mut markers: Vec<String> = self.state().markers.iter().cloned().collect();
        markers.sort();
        markers
    }

    /// Measures computed so far, sorted.
    pub fn measures(&self) -> Vec<String> {
        let mut measures: Vec<String> = self.state().measures.iter().cloned().collect();
        measures.sort();
        measures
    }

    /// Measures flagged for the report, in the order they were computed.
    pub fn measures_to_log(&self) -> Vec<String> {
        self.state().measures_to_log.clone()
    }

    pub fn is_ended(&self) -> bool {
        self.state().ended
    }
}
