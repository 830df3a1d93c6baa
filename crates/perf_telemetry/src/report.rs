//! Report payloads built from a timer's logged measures.
//!
//! A payload has the flat shape consumed by log processors:
//!
//! ```json
//! {
//!   "moreInfo": { "Params": { "page": "home" } },
//!   "loadStartToLoadFetched": 12.34
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

use crate::params::Parameters;

/// A measure identifier paired with its elapsed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredDuration {
    /// Measure identifier, e.g. `"Load Start to Load End"`
    pub measure: String,
    /// Elapsed time between the two marks
    pub duration: Duration,
}

impl MeasuredDuration {
    pub fn new(measure: impl Into<String>, duration: Duration) -> Self {
        Self {
            measure: measure.into(),
            duration,
        }
    }
}

/// Metadata section of a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoreInfo {
    /// Caller-supplied parameters, copied verbatim
    #[serde(rename = "Params")]
    pub params: Parameters,
}

/// The payload handed to a sink for one ended timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Caller metadata
    #[serde(rename = "moreInfo")]
    pub more_info: MoreInfo,
    /// Camel-cased measure id to duration in milliseconds
    #[serde(flatten)]
    pub durations: BTreeMap<String, f64>,
}

impl PerformanceReport {
    /// Build a payload from measured durations.
    ///
    /// Returns `None` when there is nothing to report.
    pub fn from_measures(measures: &[MeasuredDuration], params: &Parameters) -> Option<Self> {
        if measures.is_empty() {
            return None;
        }

        let durations = measures
            .iter()
            .map(|m| (camel_case(&m.measure), round_millis(m.duration)))
            .collect();

        Some(Self {
            more_info: MoreInfo {
                params: params.clone(),
            },
            durations,
        })
    }

    /// Duration for a camel-cased measure key.
    pub fn duration(&self, key: &str) -> Option<f64> {
        self.durations.get(key).copied()
    }
}

/// Envelope around a payload as it travels to a sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Unique identifier for this record
    pub report_id: String,
    /// Name of the timer that produced the report
    pub timer: String,
    /// When the report was produced
    pub recorded_at: DateTime<Utc>,
    /// The report itself
    pub payload: PerformanceReport,
}

impl ReportRecord {
    pub fn new(timer: &str, payload: PerformanceReport) -> Self {
        Self {
            report_id: Uuid::new_v4().to_string(),
            timer: timer.to_string(),
            recorded_at: Utc::now(),
            payload,
        }
    }
}

/// Milliseconds rounded to two decimal places.
pub fn round_millis(duration: Duration) -> f64 {
    let ms = duration.as_secs_f64() * 1000.0;
    (ms * 100.0).round() / 100.0
}

/// Convert a measure identifier to a camelCase key.
///
/// Words are split on any non-alphanumeric character, on lower-to-upper case
/// changes, on letter/digit changes, and before the last capital of an
/// acronym that runs into a capitalized word (`XMLHttp` is `XML` + `Http`).
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (index, word) in split_words(input).iter().enumerate() {
        let lower = word.to_lowercase();
        if index == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let boundary = prev.is_alphanumeric()
                && ((prev.is_lowercase() && c.is_uppercase())
                    || (prev.is_numeric() != c.is_numeric())
                    || (prev.is_uppercase()
                        && c.is_uppercase()
                        && next.is_some_and(char::is_lowercase)));
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
