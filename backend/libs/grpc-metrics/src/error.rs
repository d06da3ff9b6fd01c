/// Error types for grpc-metrics
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    /// A series with this name is already registered. Treated as a
    /// configuration error: callers abort startup instead of recovering.
    #[error("Duplicate metrics series registered: {0}")]
    Duplicate(String),

    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Failed to encode metrics: {0}")]
    Encode(String),

    #[error("Failed to bind metrics listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Metrics server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Result type alias for metrics operations
pub type Result<T> = std::result::Result<T, MetricsError>;
