//! Performance Timers
//!
//! This crate provides named measurement sessions for instrumenting code:
//! - Timers that record markers and measure the time between them
//! - Naming rules enforced on timers and markers
//! - A registry for finding a timer from anywhere it was shared
//! - Null timers that keep call sites unchanged when monitoring is off
//! - Reporting of flagged measures when a timer ends
//!
//! # Feature Switches
//!
//! [`PerfConfig`] carries two switches, read once when [`PerformanceTimers`]
//! is built:
//!
//! - `monitoring_enabled`: hand out recording timers (otherwise null timers)
//! - `logging_enabled`: send logged measures to the report sink on `end`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use perf_timer::{Marker, MemorySink, Parameters, PerfConfig, PerformanceTimers};
//!
//! let sink = Arc::new(MemorySink::new());
//! let timers = PerformanceTimers::builder()
//!     .config(PerfConfig::default())
//!     .sink(sink.clone())
//!     .build();
//!
//! let timer = timers.create("Load", Parameters::new().with("page", "home")).unwrap();
//! timer.start();
//! timer.set_marker(Marker::new("Fetched").logged()).unwrap();
//!
//! // Elsewhere, by name
//! timers.get("Load").end(false);
//!
//! assert_eq!(sink.len(), 1);
//! assert!(timers.get("Load").is_null());
//! ```

mod backend;
mod config;
mod error;
mod handle;
mod marker;
mod naming;
mod null_timer;
mod quick;
mod registry;
mod scope;
mod timer;
mod timers;

pub use backend::{MonotonicBackend, PerformanceBackend, NAVIGATION_START};
pub use config::{PerfConfig, LOGGING_ENV, MONITORING_ENV};
pub use error::{PerfError, PerfResult};
pub use handle::TimerHandle;
pub use marker::Marker;
pub use naming::{is_valid_name, validate_marker_name, validate_timer_name};
pub use null_timer::NullTimer;
pub use quick::QuickTimer;
pub use registry::TimerRegistry;
pub use scope::TimerScope;
pub use timer::{PerformanceTimer, END_MARKER, START_MARKER};
pub use timers::{PerformanceTimers, PerformanceTimersBuilder};

/// Re-export for convenience
pub use perf_telemetry::{
    MemorySink, NullSink, Parameters, ReportOutcome, ReportRecord, ReportSink, Reporter,
    TracingSink, TransportConfig, TransportSink,
};
