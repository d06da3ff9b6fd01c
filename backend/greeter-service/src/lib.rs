//! Greeter Service
//!
//! A gRPC greeting service whose calls pass through an interceptor chain
//! (structured logging, per-caller metrics) before reaching the handler.
//! Metrics are served to Prometheus from a separate HTTP listener.
//!
//! ```text
//!  gRPC call ──▶ LoggingInterceptor ──▶ MetricsInterceptor ──▶ GreetingHandler
//!                                            │
//!                                            ▼
//!                                      CounterStore ◀── scrape ── MetricsExporter
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod greeter;
pub mod grpc;
pub mod interceptors;
pub mod observability;

pub use app::{BoundGreeter, GreeterApp};
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
