/// Error types for greeter-service
use grpc_metrics::MetricsError;
use thiserror::Error;

/// Startup and serving errors. All of them are fatal to the process;
/// per-call failures travel as `tonic::Status` instead.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] envy::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Failed to bind gRPC listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
