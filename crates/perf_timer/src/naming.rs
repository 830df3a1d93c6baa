//! Naming rules for timers and markers.

use regex_lite::Regex;
use std::sync::OnceLock;

use crate::error::{PerfError, PerfResult};

static NAME_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn name_pattern() -> Option<&'static Regex> {
    NAME_PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9 ]*$").ok())
        .as_ref()
}

/// Whether `name` is non-empty and made only of ASCII letters, digits and spaces.
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    match name_pattern() {
        Some(re) => re.is_match(name),
        None => name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '),
    }
}

/// Check a timer name.
pub fn validate_timer_name(name: &str) -> PerfResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(PerfError::InvalidTimerName(name.to_string()))
    }
}

/// Check a marker name.
pub fn validate_marker_name(name: &str) -> PerfResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(PerfError::InvalidMarkerName(name.to_string()))
    }
}

/// Scope a marker name to its timer: `"<timer> <marker>"`.
pub(crate) fn qualify(timer: &str, marker: &str) -> String {
    format!("{timer} {marker}")
}

/// Measure identifier for the span between two marks.
pub(crate) fn measure_id(start_mark: &str, end_mark: &str) -> String {
    format!("{start_mark} to {end_mark}")
}
