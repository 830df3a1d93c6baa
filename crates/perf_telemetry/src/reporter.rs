//! Formats logged measures and ships them to a sink.

use std::sync::Arc;

use crate::params::Parameters;
use crate::report::{MeasuredDuration, PerformanceReport, ReportRecord};
use crate::sink::{ReportSink, TracingSink};

/// What happened to a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Logging is switched off
    Disabled,
    /// No measures were flagged for logging
    Empty,
    /// The record was accepted by the sink
    Sent,
    /// The sink or serializer failed; the failure was logged
    Failed,
}

/// Ships one report per ended timer to a [`ReportSink`].
#[derive(Debug, Clone)]
pub struct Reporter {
    enabled: bool,
    sink: Arc<dyn ReportSink>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink))
    }
}

impl Reporter {
    /// Create an enabled reporter writing to the given sink.
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self { enabled: true, sink }
    }

    /// Switch reporting on or off.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Build a report for `timer` and hand it to the sink.
    ///
    /// Never fails: sink errors are logged and reported as [`ReportOutcome::Failed`].
    pub fn report(
        &self,
        timer: &str,
        measures: &[MeasuredDuration],
        params: &Parameters,
    ) -> ReportOutcome {
        if !self.enabled {
            return ReportOutcome::Disabled;
        }

        let Some(payload) = PerformanceReport::from_measures(measures, params) else {
            return ReportOutcome::Empty;
        };

        let record = ReportRecord::new(timer, payload);
        tracing::debug!(
            target: "perf",
            timer = timer,
            measures = record.payload.durations.len(),
            "sending performance report"
        );

        match self.sink.send(&record) {
            Ok(()) => ReportOutcome::Sent,
            Err(e) => {
                tracing::warn!(
                    target: "perf",
                    "Failed to report {} performance timer: {}",
                    timer,
                    e
                );
                ReportOutcome::Failed
            }
        }
    }
}
