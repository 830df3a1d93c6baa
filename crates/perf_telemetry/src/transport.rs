//! Queued transport for shipping reports to a remote log collector.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::{TelemetryError, TelemetryResult};
use crate::report::ReportRecord;
use crate::sink::ReportSink;

/// Configuration for the report transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Endpoint URL for sending reports
    pub endpoint: String,
    /// Number of queued reports that makes a flush worthwhile
    pub batch_size: usize,
    /// Maximum queue size before rejecting reports
    pub max_queue_size: usize,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            batch_size: 50,
            max_queue_size: 1000,
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Create a new transport config with the specified endpoint.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Set the maximum queue size.
    pub fn with_max_queue_size(mut self, size: usize) -> Self {
        self.max_queue_size = size;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A sink that queues reports and ships them in batches on [`flush`](Self::flush).
///
/// Sending to the sink never touches the network; only `flush` does.
#[derive(Debug)]
pub struct TransportSink {
    config: TransportConfig,
    client: reqwest::Client,
    queue: Mutex<Vec<ReportRecord>>,
    offline: AtomicBool,
    failed_send_count: AtomicU32,
}

impl TransportSink {
    /// Create a new transport with the given endpoint.
    pub fn new(endpoint: &str) -> Self {
        Self::with_config(TransportConfig::new(endpoint))
    }

    /// Create a new transport with full configuration.
    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            queue: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
            failed_send_count: AtomicU32::new(0),
        }
    }

    fn queue(&self) -> MutexGuard<'_, Vec<ReportRecord>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check if the queue is ready to be flushed.
    pub fn should_flush(&self) -> bool {
        self.queue().len() >= self.config.batch_size
    }

    /// Get the number of queued reports.
    pub fn queued_count(&self) -> usize {
        self.queue().len()
    }

    /// Check if there are any queued reports.
    pub fn has_queued(&self) -> bool {
        !self.queue().is_empty()
    }

    /// Ship all queued reports.
    ///
    /// On failure the batch is put back at the front of the queue, ahead of
    /// reports queued while it was in flight. The oldest reports are dropped
    /// if that takes the queue past `max_queue_size`.
    pub async fn flush(&self) -> TelemetryResult<()> {
        if self.is_offline() {
            return Err(TelemetryError::Offline);
        }

        let batch = std::mem::take(&mut *self.queue());
        if batch.is_empty() {
            return Ok(());
        }

        match self.send_batch(&batch).await {
            Ok(()) => {
                self.failed_send_count.store(0, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => {
                self.failed_send_count.fetch_add(1, Ordering::Relaxed);
                self.requeue(batch);
                Err(e)
            }
        }
    }

    fn requeue(&self, batch: Vec<ReportRecord>) {
        let mut queue = self.queue();
        let newer = std::mem::replace(&mut *queue, batch);
        queue.extend(newer);

        let overflow = queue.len().saturating_sub(self.config.max_queue_size);
        if overflow > 0 {
            queue.drain(..overflow);
            tracing::warn!(
                target: "perf",
                dropped = overflow,
                "Report queue full after failed flush, dropping oldest reports"
            );
        }
    }

    async fn send_batch(&self, batch: &[ReportRecord]) -> TelemetryResult<()> {
        if self.config.endpoint.is_empty() {
            // No endpoint configured; nothing leaves the process
            tracing::debug!(
                target: "perf",
                count = batch.len(),
                "dropping reports, no endpoint configured"
            );
            return Ok(());
        }

        let body = serde_json::to_vec(batch)?;
        self.client
            .post(&self.config.endpoint)
            .timeout(self.config.timeout)
            .header(CONTENT_TYPE, "application/json; charset=UTF-8")
            .body(body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| TelemetryError::Network(e.to_string()))?;

        tracing::debug!(
            target: "perf",
            count = batch.len(),
            endpoint = %self.config.endpoint,
            "reports shipped"
        );
        Ok(())
    }

    /// Set offline mode.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Check if transport is in offline mode.
    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Relaxed)
    }

    /// Get the number of consecutive failed sends.
    pub fn failed_send_count(&self) -> u32 {
        self.failed_send_count.load(Ordering::Relaxed)
    }

    /// Get a copy of the currently queued reports.
    pub fn queued_reports(&self) -> Vec<ReportRecord> {
        self.queue().clone()
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Take ownership of queued reports (for persistence/retry).
    pub fn take_queued(&self) -> Vec<ReportRecord> {
        std::mem::take(&mut *self.queue())
    }
}

impl ReportSink for TransportSink {
    fn send(&self, record: &ReportRecord) -> TelemetryResult<()> {
        let mut queue = self.queue();
        if queue.len() >= self.config.max_queue_size {
            return Err(TelemetryError::QueueFull);
        }
        queue.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;
    use crate::report::{MeasuredDuration, PerformanceReport};

    fn make_record(timer: &str) -> ReportRecord {
        let report = PerformanceReport::from_measures(
            &[MeasuredDuration::new(
                format!("{timer} Start to {timer} End"),
                Duration::from_millis(1),
            )],
            &Parameters::new(),
        )
        .unwrap();
        ReportRecord::new(timer, report)
    }

    #[test]
    fn test_transport_config_default() {
        let config = TransportConfig::default();
        assert!(config.endpoint.is_empty());
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.max_queue_size, 1000);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_transport_config_builder() {
        let config = TransportConfig::new("https://logs.example.com")
            .with_batch_size(5)
            .with_max_queue_size(20)
            .with_timeout(Duration::from_secs(2));

        assert_eq!(config.endpoint, "https://logs.example.com");
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.max_queue_size, 20);
        assert_eq!(config.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_transport_queue_full() {
        let config = TransportConfig::new("").with_max_queue_size(2);
        let transport = TransportSink::with_config(config);

        transport.send(&make_record("A")).unwrap();
        transport.send(&make_record("B")).unwrap();

        let result = transport.send(&make_record("C"));
        assert!(matches!(result, Err(TelemetryError::QueueFull)));
        assert_eq!(transport.queued_count(), 2);
    }

    #[test]
    fn test_transport_should_flush() {
        let config = TransportConfig::new("").with_batch_size(2);
        let transport = TransportSink::with_config(config);
        assert!(!transport.should_flush());

        transport.send(&make_record("A")).unwrap();
        assert!(!transport.should_flush());

        transport.send(&make_record("B")).unwrap();
        assert!(transport.should_flush());
    }

    #[tokio::test]
    async fn test_transport_flush_without_endpoint() {
        let transport = TransportSink::new("");
        transport.send(&make_record("A")).unwrap();

        transport.flush().await.unwrap();
        assert_eq!(transport.queued_count(), 0);
        assert_eq!(transport.failed_send_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_flush_empty() {
        let transport = TransportSink::new("http://127.0.0.1:9");
        assert!(transport.flush().await.is_ok());
    }

    #[tokio::test]
    async fn test_transport_flush_offline_keeps_queue() {
        let transport = TransportSink::new("");
        transport.send(&make_record("A")).unwrap();
        transport.set_offline(true);

        let result = transport.flush().await;
        assert!(matches!(result, Err(TelemetryError::Offline)));
        assert_eq!(transport.queued_count(), 1);

        transport.set_offline(false);
        assert!(!transport.is_offline());
    }

    #[tokio::test]
    async fn test_failed_flush_requeues_within_limit() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let config = TransportConfig::new(&endpoint)
            .with_max_queue_size(2)
            .with_timeout(Duration::from_millis(300));
        let transport = TransportSink::with_config(config);
        transport.send(&make_record("A")).unwrap();
        transport.send(&make_record("B")).unwrap();

        let sent_during_flush = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            transport.send(&make_record("C")).unwrap();
            transport.send(&make_record("D")).unwrap();
        };
        let (result, ()) = tokio::join!(transport.flush(), sent_during_flush);

        assert!(matches!(result, Err(TelemetryError::Network(_))));
        assert_eq!(transport.failed_send_count(), 1);
        assert_eq!(transport.queued_count(), 2);
        let queued: Vec<String> = transport
            .queued_reports()
            .into_iter()
            .map(|record| record.timer)
            .collect();
        assert_eq!(queued, vec!["C", "D"]);
    }

    #[tokio::test]
    async fn test_failed_flush_keeps_batch_in_order() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let config = TransportConfig::new(&endpoint).with_timeout(Duration::from_millis(200));
        let transport = TransportSink::with_config(config);
        transport.send(&make_record("A")).unwrap();
        transport.send(&make_record("B")).unwrap();

        assert!(transport.flush().await.is_err());
        assert!(transport.flush().await.is_err());

        assert_eq!(transport.failed_send_count(), 2);
        let queued = transport.take_queued();
        assert_eq!(queued.len(), 2);
        assert_eq!(queued[0].timer, "A");
        assert_eq!(queued[1].timer, "B");
    }

    #[test]
    fn test_transport_take_queued() {
        let transport = TransportSink::new("");
        transport.send(&make_record("A")).unwrap();
        transport.send(&make_record("B")).unwrap();

        let taken = transport.take_queued();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].timer, "A");
        assert!(!transport.has_queued());
    }
}
