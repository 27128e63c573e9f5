//! Fire-and-forget diagnostic records for translated errors
//!
//! The translator hands each record to a [`DiagnosticSink`] and moves on. The
//! channel sink never waits: when the queue is full or the drain has stopped the
//! record is dropped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::StatusCategory;

/// What the operators see for each translated error
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRecord {
    pub incident_id: Uuid,
    pub original_error_summary: String,
    pub classification: StatusCategory,
    pub code: String,
    pub classifier: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Destination for diagnostic records. `emit` must return promptly.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, record: DiagnosticRecord);
}

/// Queues records for a background [`DiagnosticDrain`]
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<DiagnosticRecord>,
}

impl DiagnosticSink for ChannelSink {
    fn emit(&self, record: DiagnosticRecord) {
        if let Err(err) = self.tx.try_send(record) {
            let dropped = match err {
                mpsc::error::TrySendError::Full(record) => record,
                mpsc::error::TrySendError::Closed(record) => record,
            };
            debug!(incident_id = %dropped.incident_id, "Diagnostic record dropped");
        }
    }
}

/// Receiving half of the diagnostic channel
pub struct DiagnosticDrain {
    rx: mpsc::Receiver<DiagnosticRecord>,
}

impl DiagnosticDrain {
    /// Log records until every sender is gone
    pub async fn run(mut self) {
        info!("Diagnostic drain started");
        while let Some(record) = self.rx.recv().await {
            log_record(&record);
        }
        info!("Diagnostic drain stopped");
    }
}

/// Bounded sink/drain pair. `capacity` must be non-zero.
pub fn channel(capacity: usize) -> (ChannelSink, DiagnosticDrain) {
    let (tx, rx) = mpsc::channel(capacity);
    (ChannelSink { tx }, DiagnosticDrain { rx })
}

fn log_record(record: &DiagnosticRecord) {
    match record.classification {
        StatusCategory::ServerFault => error!(
            incident_id = %record.incident_id,
            code = %record.code,
            classifier = record.classifier,
            timestamp = %record.timestamp,
            error = %record.original_error_summary,
            "Request failed with server fault"
        ),
        StatusCategory::ClientFault => warn!(
            incident_id = %record.incident_id,
            code = %record.code,
            classifier = record.classifier,
            timestamp = %record.timestamp,
            error = %record.original_error_summary,
            "Request failed with client fault"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str) -> DiagnosticRecord {
        DiagnosticRecord {
            incident_id: Uuid::new_v4(),
            original_error_summary: "boom".to_string(),
            classification: StatusCategory::ServerFault,
            code: code.to_string(),
            classifier: "generic",
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_channel_delivers_records() {
        let (sink, mut drain) = channel(4);
        sink.emit(record("A"));
        sink.emit(record("B"));

        assert_eq!(drain.rx.recv().await.unwrap().code, "A");
        assert_eq!(drain.rx.recv().await.unwrap().code, "B");
    }

    #[test]
    fn test_full_channel_drops_without_blocking() {
        let (sink, mut drain) = channel(1);
        sink.emit(record("kept"));
        sink.emit(record("dropped"));

        assert_eq!(drain.rx.try_recv().unwrap().code, "kept");
        assert!(drain.rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (sink, drain) = channel(1);
        drop(drain);
        sink.emit(record("nobody listening"));
    }

    #[tokio::test]
    async fn test_drain_stops_when_senders_drop() {
        let (sink, drain) = channel(8);
        sink.emit(record("A"));
        drop(sink);

        tokio::time::timeout(std::time::Duration::from_secs(1), drain.run())
            .await
            .expect("drain should finish once the sink is gone");
    }

    #[test]
    fn test_record_serializes() {
        let json = serde_json::to_value(record("INTERNAL_ERROR")).unwrap();
        assert_eq!(json["classification"], "SERVER_FAULT");
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert!(json["timestamp"].is_string());
    }
}
