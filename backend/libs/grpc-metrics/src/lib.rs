//! gRPC Metrics - Shared Prometheus Instrumentation for gRPC Services
//!
//! This library owns the metrics side of a gRPC service:
//! - A process-owned registry that rejects duplicate series at startup
//! - Per-label call counters that are safe to bump from any number of tasks
//! - Per-method handled counters keyed by gRPC status code
//! - An HTTP exporter that serves the registry in Prometheus text format
//!
//! Usage:
//! ```ignore
//! use grpc_metrics::{MetricsExporter, MetricsRegistry};
//!
//! let registry = MetricsRegistry::new();
//! let counter = registry.register_counter("demo_calls_total", "Calls by caller", "name")?;
//! let exporter = MetricsExporter::bind(registry.clone(), "0.0.0.0:50052", 1)?;
//!
//! counter.increment("Ann");
//! exporter.run().await?;
//! ```

mod counter;
mod error;
pub mod exporter;
mod registry;
mod server;

pub use counter::{CounterSnapshot, CounterStore};
pub use error::{MetricsError, Result};
pub use exporter::MetricsExporter;
pub use registry::MetricsRegistry;
pub use server::{code_label, ServerMetrics, HANDLED_METRIC_NAME};
