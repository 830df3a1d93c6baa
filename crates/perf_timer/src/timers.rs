//! Composition root: picks active or null timers once and owns the shared parts.

use std::collections::HashMap;
use std::sync::Arc;

use perf_telemetry::{Parameters, ReportSink, Reporter, TracingSink};

use crate::backend::{MonotonicBackend, PerformanceBackend};
use crate::config::PerfConfig;
use crate::error::PerfResult;
use crate::handle::TimerHandle;
use crate::null_timer::NullTimer;
use crate::registry::TimerRegistry;
use crate::scope::TimerScope;
use crate::timer::PerformanceTimer;

/// Entry point for creating and finding timers.
///
/// Holds the registry, the timing backend and the reporter, and decides from
/// [`PerfConfig`] whether callers get recording timers or null ones. Clones
/// share all of that state.
#[derive(Debug, Clone)]
pub struct PerformanceTimers {
    config: PerfConfig,
    backend: Arc<dyn PerformanceBackend>,
    registry: TimerRegistry,
    reporter: Reporter,
}

impl Default for PerformanceTimers {
    fn default() -> Self {
        Self::new(PerfConfig::default())
    }
}

impl PerformanceTimers {
    /// Timers over the monotonic clock, reporting through `tracing`.
    pub fn new(config: PerfConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> PerformanceTimersBuilder {
        PerformanceTimersBuilder::default()
    }

    /// Create a timer and register it under `name`.
    ///
    /// With monitoring off this returns a [`NullTimer`] and checks nothing.
    pub fn create(&self, name: &str, parameters: impl Into<Parameters>) -> PerfResult<TimerHandle> {
        if !self.config.monitoring_enabled {
            return Ok(NullTimer::new().into());
        }

        let timer = PerformanceTimer::create(
            name,
            parameters.into(),
            self.backend.clone(),
            self.reporter.clone(),
            &self.registry,
        )?;
        Ok(timer.into())
    }

    /// Find the live timer called `name`.
    ///
    /// Unknown names log a warning and yield a [`NullTimer`] carrying the name.
    pub fn get(&self, name: &str) -> TimerHandle {
        if !self.config.monitoring_enabled {
            return NullTimer::named(name).into();
        }

        match self.registry.get(name) {
            Some(timer) => timer.into(),
            None => {
                tracing::warn!(target: "perf", "{} Performance timer does not exist", name);
                NullTimer::named(name).into()
            }
        }
    }

    /// Snapshot of every live timer by name.
    pub fn all(&self) -> HashMap<String, TimerHandle> {
        self.registry
            .snapshot()
            .into_iter()
            .map(|(name, timer)| (name, timer.into()))
            .collect()
    }

    /// Create and start a timer that ends when the returned scope is dropped.
    pub fn scoped(&self, name: &str, parameters: impl Into<Parameters>) -> PerfResult<TimerScope> {
        Ok(TimerScope::new(self.create(name, parameters)?))
    }

    pub fn config(&self) -> &PerfConfig {
        &self.config
    }

    pub fn is_monitoring(&self) -> bool {
        self.config.monitoring_enabled
    }

    pub fn registry(&self) -> &TimerRegistry {
        &self.registry
    }

    /// The backend timers mark on, for recording external reference marks.
    pub fn backend(&self) -> &Arc<dyn PerformanceBackend> {
        &self.backend
    }
}

/// Builder for [`PerformanceTimers`].
#[derive(Debug, Default)]
pub struct PerformanceTimersBuilder {
    config: Option<PerfConfig>,
    backend: Option<Arc<dyn PerformanceBackend>>,
    registry: Option<TimerRegistry>,
    sink: Option<Arc<dyn ReportSink>>,
}

impl PerformanceTimersBuilder {
    pub fn config(mut self, config: PerfConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn backend(mut self, backend: Arc<dyn PerformanceBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn registry(mut self, registry: TimerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> PerformanceTimers {
        let config = self.config.unwrap_or_default();
        let sink: Arc<dyn ReportSink> = match self.sink {
            Some(sink) => sink,
            None => Arc::new(TracingSink),
        };
        let backend: Arc<dyn PerformanceBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(MonotonicBackend::new()),
        };

        PerformanceTimers {
            config,
            backend,
            registry: self.registry.unwrap_or_default(),
            reporter: Reporter::new(sink).with_enabled(config.logging_enabled),
        }
    }
}
