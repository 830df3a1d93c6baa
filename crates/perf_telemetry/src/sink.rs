//! Logging sinks that accept finished performance reports.

use std::fmt::Debug;
use std::sync::{Mutex, PoisonError};

use crate::error::TelemetryResult;
use crate::report::ReportRecord;

/// Destination for performance reports.
///
/// Sinks are fire-and-forget from the timer's point of view: an error
/// returned here is logged by the reporter and goes no further.
pub trait ReportSink: Send + Sync + Debug {
    /// Accept one report record.
    fn send(&self, record: &ReportRecord) -> TelemetryResult<()>;
}

/// Emits each report as a structured `tracing` event on the `perf.report` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn send(&self, record: &ReportRecord) -> TelemetryResult<()> {
        let payload = serde_json::to_string(&record.payload)?;
        tracing::info!(
            target: "perf.report",
            report_id = %record.report_id,
            timer = %record.timer,
            recorded_at = %record.recorded_at,
            payload = %payload,
            "performance report"
        );
        Ok(())
    }
}

/// Keeps reports in memory, for tests and in-process consumers.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<ReportRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of every record received so far.
    pub fn records(&self) -> Vec<ReportRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of records received.
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return every record received so far.
    pub fn take(&self) -> Vec<ReportRecord> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *records)
    }
}

impl ReportSink for MemorySink {
    fn send(&self, record: &ReportRecord) -> TelemetryResult<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

/// Discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn send(&self, _record: &ReportRecord) -> TelemetryResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;
    use crate::report::{MeasuredDuration, PerformanceReport};
    use std::time::Duration;

    fn make_record(timer: &str) -> ReportRecord {
        let report = PerformanceReport::from_measures(
            &[MeasuredDuration::new(
                format!("{timer} Start to {timer} End"),
                Duration::from_millis(2),
            )],
            &Parameters::new(),
        )
        .unwrap();
        ReportRecord::new(timer, report)
    }

    #[test]
    fn test_memory_sink_collects() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.send(&make_record("A")).unwrap();
        sink.send(&make_record("B")).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timer, "A");
        assert_eq!(records[1].timer, "B");
    }

    #[test]
    fn test_memory_sink_take() {
        let sink = MemorySink::new();
        sink.send(&make_record("A")).unwrap();

        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_tracing_sink_accepts_record() {
        assert!(TracingSink.send(&make_record("A")).is_ok());
    }

    #[test]
    fn test_null_sink_discards() {
        assert!(NullSink.send(&make_record("A")).is_ok());
    }
}
