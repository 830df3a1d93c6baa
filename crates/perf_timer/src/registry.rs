//! Name-to-timer registry shared by everything that creates or looks up timers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::timer::PerformanceTimer;

type TimerMap = HashMap<String, PerformanceTimer>;

/// Live timers by name.
///
/// Cloning yields another handle to the same registry. Registering a name
/// that is already present replaces the entry; the replaced timer keeps
/// working through any handle its creator still holds.
#[derive(Debug, Clone, Default)]
pub struct TimerRegistry {
    timers: Arc<Mutex<TimerMap>>,
}

/// Non-owning handle held by timers, so a registry and its timers never keep
/// each other alive.
#[derive(Debug, Clone, Default)]
pub(crate) struct WeakRegistry(Weak<Mutex<TimerMap>>);

impl WeakRegistry {
    pub(crate) fn upgrade(&self) -> Option<TimerRegistry> {
        self.0.upgrade().map(|timers| TimerRegistry { timers })
    }
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn timers(&self) -> MutexGuard<'_, TimerMap> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn downgrade(&self) -> WeakRegistry {
        WeakRegistry(Arc::downgrade(&self.timers))
    }

    /// Register a timer under its name, returning the timer it replaced.
    pub(crate) fn register(&self, timer: PerformanceTimer) -> Option<PerformanceTimer> {
        let name = timer.name().to_string();
        let replaced = self.timers().insert(name, timer);
        if let Some(previous) = &replaced {
            tracing::debug!(
                target: "perf",
                timer = previous.name(),
                "replacing registered performance timer"
            );
        }
        replaced
    }

    /// Look up a live timer.
    pub fn get(&self, name: &str) -> Option<PerformanceTimer> {
        self.timers().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.timers().contains_key(name)
    }

    /// Copy of the full name-to-timer mapping.
    pub fn snapshot(&self) -> HashMap<String, PerformanceTimer> {
        self.timers().clone()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.timers().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.timers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers().is_empty()
    }

    /// Drop the entry for `name` without ending the timer.
    pub fn remove(&self, name: &str) -> Option<PerformanceTimer> {
        self.timers().remove(name)
    }

    /// Drop the entry for `timer`'s name only if it still points at `timer`.
    pub(crate) fn remove_instance(&self, timer: &PerformanceTimer) -> bool {
        let mut timers = self.timers();
        match timers.get(timer.name()) {
            Some(current) if current.same_instance(timer) => {
                timers.remove(timer.name());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MonotonicBackend;
    use perf_telemetry::{Parameters, Reporter};
    use std::sync::Arc;

    fn make_timer(registry: &TimerRegistry, name: &str) -> PerformanceTimer {
        PerformanceTimer::create(
            name,
            Parameters::new(),
            Arc::new(MonotonicBackend::new()),
            Reporter::default().with_enabled(false),
            registry,
        )
        .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let registry = TimerRegistry::new();
        assert!(registry.is_empty());

        let timer = make_timer(&registry, "Load");

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("Load"));
        assert!(registry.get("Load").unwrap().same_instance(&timer));
        assert!(registry.get("Other").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let registry = TimerRegistry::new();
        let first = make_timer(&registry, "Load");
        let second = make_timer(&registry, "Load");

        assert_eq!(registry.len(), 1);
        let current = registry.get("Load").unwrap();
        assert!(current.same_instance(&second));
        assert!(!current.same_instance(&first));
    }

    #[test]
    fn test_remove_instance_ignores_replaced_timer() {
        let registry = TimerRegistry::new();
        let first = make_timer(&registry, "Load");
        let second = make_timer(&registry, "Load");

        assert!(!registry.remove_instance(&first));
        assert!(registry.contains("Load"));

        assert!(registry.remove_instance(&second));
        assert!(!registry.contains("Load"));
    }

    #[test]
    fn test_snapshot_and_names() {
        let registry = TimerRegistry::new();
        make_timer(&registry, "B");
        make_timer(&registry, "A");

        assert_eq!(registry.names(), vec!["A".to_string(), "B".to_string()]);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);

        registry.remove("A");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_weak_registry_does_not_keep_alive() {
        let registry = TimerRegistry::new();
        let weak = registry.downgrade();
        assert!(weak.upgrade().is_some());

        drop(registry);
        assert!(weak.upgrade().is_none());
    }
}
