//! # arc-telemetry
//!
//! Execution log for ARC. The engines report every task execution and every
//! lane outcome through [`TelemetrySink`]; [`TelemetryStore`] keeps them in
//! memory, mirrors them to a JSONL trail, and computes [`QualityMetrics`].

mod error;
mod quality;
mod sink;
mod store;

pub use error::TelemetryError;
pub use quality::{QualityMetrics, TaskStats};
pub use sink::{NoopTelemetry, TelemetrySink};
pub use store::TelemetryStore;
