//! Marker requests passed to [`PerformanceTimer::set_marker`](crate::PerformanceTimer::set_marker).

/// A marker to set, with the references to measure from.
///
/// By default the new marker is measured from the timer's previous marker and
/// is not logged.
///
/// ```rust
/// use perf_timer::Marker;
///
/// let marker = Marker::new("Rendered").logged().from_marker("Start").and_from("navigationStart");
/// assert_eq!(marker.references(), ["navigationStart"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    name: String,
    log: bool,
    measure_from: Option<String>,
    other_markers: Vec<String>,
}

impl Marker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: false,
            measure_from: None,
            other_markers: Vec::new(),
        }
    }

    /// Include this marker's measures in the timer's report.
    pub fn logged(self) -> Self {
        self.with_log(true)
    }

    /// Set whether this marker's measures go into the report.
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Measure from `reference` instead of the previous marker.
    ///
    /// `reference` is either a marker name on the same timer or the name of
    /// a mark recorded directly on the backend.
    pub fn from_marker(mut self, reference: impl Into<String>) -> Self {
        self.measure_from = Some(reference.into());
        self
    }

    /// Also measure from `reference`.
    pub fn and_from(mut self, reference: impl Into<String>) -> Self {
        self.other_markers.push(reference.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_logged(&self) -> bool {
        self.log
    }

    /// The explicit primary reference, if any.
    pub fn measure_from(&self) -> Option<&str> {
        self.measure_from.as_deref()
    }

    /// Additional references, in the order they were added.
    pub fn references(&self) -> &[String] {
        &self.other_markers
    }
}

impl From<&str> for Marker {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Marker {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_defaults() {
        let marker = Marker::from("Fetched");
        assert_eq!(marker.name(), "Fetched");
        assert!(!marker.is_logged());
        assert_eq!(marker.measure_from(), None);
        assert!(marker.references().is_empty());
    }

    #[test]
    fn test_marker_builder() {
        let marker = Marker::new("Done")
            .logged()
            .from_marker("Start")
            .and_from("Fetched")
            .and_from("domInteractive");

        assert!(marker.is_logged());
        assert_eq!(marker.measure_from(), Some("Start"));
        assert_eq!(marker.references(), ["Fetched", "domInteractive"]);
    }
}
