//! Fire-and-forget telemetry.
//!
//! The wizard emits events into an injected sink and never depends on the
//! sink's behavior; sinks must not fail or block meaningfully. The tracing
//! sink is the production default, the recording sink exists for tests.

use std::sync::Mutex;

use tracing::{info, warn};

/// Events emitted by the onboarding workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryEvent {
    /// A step submission passed validation and was stored.
    StepCompleted { step: u32 },
    /// A step submission failed validation.
    StepValidationFailed { step: u32, error_count: usize },
    /// A completed wizard materialized a listing.
    ListingSubmitted { slug: String },
    /// Final submission failed at the persistence layer. This is the one
    /// event operators rely on; the user only sees a retryable error.
    PersistenceFailed { detail: String },
    /// An admin changed a listing's lifecycle status.
    StatusChanged { slug: String, status: String },
}

pub trait TelemetrySink: Send + Sync {
    fn emit(&self, event: TelemetryEvent);
}

/// Production sink: forwards events to the tracing subscriber.
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn emit(&self, event: TelemetryEvent) {
        match event {
            TelemetryEvent::StepCompleted { step } => {
                info!(step, "onboarding step completed");
            }
            TelemetryEvent::StepValidationFailed { step, error_count } => {
                info!(step, error_count, "onboarding step rejected");
            }
            TelemetryEvent::ListingSubmitted { slug } => {
                info!(%slug, "onboarding completed, listing created");
            }
            TelemetryEvent::PersistenceFailed { detail } => {
                warn!(%detail, "listing creation failed at persistence");
            }
            TelemetryEvent::StatusChanged { slug, status } => {
                info!(%slug, %status, "listing status changed");
            }
        }
    }
}

/// Sink that swallows events.
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn emit(&self, _event: TelemetryEvent) {}
}

/// Sink that records events for assertions.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().expect("telemetry mutex").clone()
    }
}

impl TelemetrySink for RecordingSink {
    fn emit(&self, event: TelemetryEvent) {
        self.events.lock().expect("telemetry mutex").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_captures_in_order() {
        let sink = RecordingSink::new();
        sink.emit(TelemetryEvent::StepCompleted { step: 1 });
        sink.emit(TelemetryEvent::StepValidationFailed {
            step: 2,
            error_count: 3,
        });
        assert_eq!(
            sink.events(),
            vec![
                TelemetryEvent::StepCompleted { step: 1 },
                TelemetryEvent::StepValidationFailed {
                    step: 2,
                    error_count: 3
                },
            ]
        );
    }

    #[test]
    fn test_noop_sink_accepts_events() {
        NoopSink.emit(TelemetryEvent::ListingSubmitted {
            slug: "acme".to_string(),
        });
    }
}
