//! Per-method handled counters for gRPC servers
//!
//! Tracks how many calls each method completed and with which status code,
//! independently of any business-level counters.

use prometheus::{opts, IntCounterVec};
use tonic::Code;

use crate::error::Result;
use crate::registry::MetricsRegistry;

pub const HANDLED_METRIC_NAME: &str = "grpc_server_handled_total";

const ALL_CODES: [Code; 17] = [
    Code::Ok,
    Code::Cancelled,
    Code::Unknown,
    Code::InvalidArgument,
    Code::DeadlineExceeded,
    Code::NotFound,
    Code::AlreadyExists,
    Code::PermissionDenied,
    Code::ResourceExhausted,
    Code::FailedPrecondition,
    Code::Aborted,
    Code::OutOfRange,
    Code::Unimplemented,
    Code::Internal,
    Code::Unavailable,
    Code::DataLoss,
    Code::Unauthenticated,
];

/// gRPC server metrics
#[derive(Clone)]
pub struct ServerMetrics {
    /// Total completed calls
    /// Labels: grpc_service, grpc_method, grpc_code
    handled_total: IntCounterVec,
}

impl ServerMetrics {
    /// Create the server metrics and register them with `registry`
    pub fn register(registry: &MetricsRegistry) -> Result<Self> {
        let handled_total = IntCounterVec::new(
            opts!(
                HANDLED_METRIC_NAME,
                "Total number of RPCs completed on the server, regardless of success or failure."
            ),
            &["grpc_service", "grpc_method", "grpc_code"],
        )?;
        registry.register(Box::new(handled_total.clone()))?;

        Ok(Self { handled_total })
    }

    /// Pre-create one series per status code for a method so every outcome
    /// is scraped as 0 before the first call arrives
    pub fn initialize(&self, service: &str, method: &str) {
        for code in ALL_CODES {
            self.handled_total
                .with_label_values(&[service, method, code_label(code)]);
        }
    }

    /// Record a completed call
    pub fn record(&self, service: &str, method: &str, code: Code) {
        self.handled_total
            .with_label_values(&[service, method, code_label(code)])
            .inc();
    }
}

/// Canonical gRPC name for a status code, as used in metric labels
pub fn code_label(code: Code) -> &'static str {
    match code {
        Code::Ok => "OK",
        Code::Cancelled => "Canceled",
        Code::Unknown => "Unknown",
        Code::InvalidArgument => "InvalidArgument",
        Code::DeadlineExceeded => "DeadlineExceeded",
        Code::NotFound => "NotFound",
        Code::AlreadyExists => "AlreadyExists",
        Code::PermissionDenied => "PermissionDenied",
        Code::ResourceExhausted => "ResourceExhausted",
        Code::FailedPrecondition => "FailedPrecondition",
        Code::Aborted => "Aborted",
        Code::OutOfRange => "OutOfRange",
        Code::Unimplemented => "Unimplemented",
        Code::Internal => "Internal",
        Code::Unavailable => "Unavailable",
        Code::DataLoss => "DataLoss",
        Code::Unauthenticated => "Unauthenticated",
    }
}
