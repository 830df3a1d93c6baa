//! Performance Reporting
//!
//! This crate turns the measures a performance timer flagged for logging into
//! a single structured record and hands it to a logging sink:
//!
//! - Payload formatting with camel-cased measure keys and millisecond durations
//! - Caller metadata carried verbatim under `moreInfo.Params`
//! - Pluggable sinks: `tracing` output, in-memory capture, queued HTTP transport
//!
//! Reporting is best-effort. Nothing in this crate surfaces an error to the
//! code that ended the timer.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use perf_telemetry::{MeasuredDuration, MemorySink, Parameters, Reporter, ReportOutcome};
//!
//! let sink = Arc::new(MemorySink::new());
//! let reporter = Reporter::new(sink.clone());
//!
//! let measures = [MeasuredDuration::new("Load Start to Load End", Duration::from_millis(12))];
//! let outcome = reporter.report("Load", &measures, &Parameters::new().with("page", "home"));
//!
//! assert_eq!(outcome, ReportOutcome::Sent);
//! assert_eq!(sink.records()[0].payload.duration("loadStartToLoadEnd"), Some(12.0));
//! ```

mod error;
mod params;
mod report;
mod reporter;
mod sink;
mod transport;

pub use error::{TelemetryError, TelemetryResult};
pub use params::Parameters;
pub use report::{
    camel_case, round_millis, MeasuredDuration, MoreInfo, PerformanceReport, ReportRecord,
};
pub use reporter::{ReportOutcome, Reporter};
pub use sink::{MemorySink, NullSink, ReportSink, TracingSink};
pub use transport::{TransportConfig, TransportSink};
