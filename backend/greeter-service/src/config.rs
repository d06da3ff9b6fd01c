/// Configuration management for Greeter Service
///
/// Loads configuration from `GREETER_`-prefixed environment variables.
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// gRPC listen address
    #[serde(default = "default_grpc_addr")]
    pub grpc_addr: String,
    /// Prometheus exporter listen address
    #[serde(default = "default_metrics_addr")]
    pub metrics_addr: String,
    /// Default log filter, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
    /// Series name of the per-caller SayHello counter
    #[serde(default = "default_counter_name")]
    pub counter_name: String,
    /// actix worker threads for the exporter
    #[serde(default = "default_metrics_workers")]
    pub metrics_workers: usize,
}

// Default values
fn default_grpc_addr() -> String {
    "localhost:50051".to_string()
}

fn default_metrics_addr() -> String {
    "0.0.0.0:50052".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_counter_name() -> String {
    "greeter_server_say_hello_handle_count".to_string()
}

fn default_metrics_workers() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grpc_addr: default_grpc_addr(),
            metrics_addr: default_metrics_addr(),
            log_level: default_log_level(),
            log_json: false,
            counter_name: default_counter_name(),
            metrics_workers: default_metrics_workers(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed("GREETER_").from_iter(vars)
    }

    /// Config bound to loopback ephemeral ports
    pub fn ephemeral() -> Self {
        Self {
            grpc_addr: "127.0.0.1:0".to_string(),
            metrics_addr: "127.0.0.1:0".to_string(),
            ..Self::default()
        }
    }
}
