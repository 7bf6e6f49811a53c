//! Observer interface the engines call unconditionally.

use arc_core::entities::{LaneOutcomeRecord, TelemetryRecord};

/// Receives every task execution and every lane outcome.
///
/// Recording is infallible from the caller's point of view; implementations
/// log their own failures.
pub trait TelemetrySink: Send + Sync {
    fn record_task(&self, record: TelemetryRecord);

    fn record_outcome(&self, record: LaneOutcomeRecord);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn record_task(&self, _record: TelemetryRecord) {}

    fn record_outcome(&self, _record: LaneOutcomeRecord) {}
}
