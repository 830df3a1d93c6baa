//! Feature switches for performance monitoring.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PerfResult;

/// Environment variable holding the monitoring switch.
pub const MONITORING_ENV: &str = "PERF_MONITORING_ENABLED";

/// Environment variable holding the logging switch.
pub const LOGGING_ENV: &str = "PERF_LOGGING_ENABLED";

/// Switches read once, when the timers are composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerfConfig {
    /// Record timers at all; when off every timer is a no-op
    pub monitoring_enabled: bool,
    /// Ship logged measures to the report sink when a timer ends
    pub logging_enabled: bool,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            monitoring_enabled: true,
            logging_enabled: true,
        }
    }
}

impl PerfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both switches off.
    pub fn disabled() -> Self {
        Self {
            monitoring_enabled: false,
            logging_enabled: false,
        }
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitoring_enabled = enabled;
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Read the switches from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the switches through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            monitoring_enabled: read_switch(&lookup, MONITORING_ENV, defaults.monitoring_enabled),
            logging_enabled: read_switch(&lookup, LOGGING_ENV, defaults.logging_enabled),
        }
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> PerfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    ///
    /// A missing file yields the defaults, and so does a file that cannot be
    /// parsed (with a warning). Other I/O failures are errors.
    pub fn load(path: &Path) -> PerfResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match Self::from_json(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse performance config {}, using defaults: {}",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }
}

fn read_switch(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match parse_switch(&raw) {
        Some(value) => value,
        None => {
            tracing::warn!("Ignoring {}={:?}, expected a boolean", key, raw);
            default
        }
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
