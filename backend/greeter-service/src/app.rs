//! Service assembly and startup
//!
//! Startup happens in three steps, each fatal on failure:
//! 1. [`GreeterApp::build`] registers metrics and composes the chain
//! 2. [`GreeterApp::bind`] binds the gRPC and metrics listeners
//! 3. [`BoundGreeter::serve`] runs both accept loops until one of them stops

use std::net::SocketAddr;
use std::sync::Arc;

use grpc_metrics::{CounterStore, MetricsExporter, MetricsRegistry, ServerMetrics};
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::info;

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::greeter::GreetingHandler;
use crate::grpc::helloworld::{HelloReply, HelloRequest};
use crate::grpc::{GreeterServer, GreeterServiceImpl, SayHelloChain, METHODS};
use crate::interceptors::{Interceptor, InterceptorChain, LoggingInterceptor, MetricsInterceptor};

const COUNTER_HELP: &str = "Total number of SayHello calls handled, by caller name.";
const COUNTER_LABEL: &str = "name";

/// Fully wired service, not yet listening
pub struct GreeterApp {
    config: Config,
    registry: MetricsRegistry,
    calls: CounterStore,
    chain: Arc<SayHelloChain>,
}

impl GreeterApp {
    /// Register metrics and compose the interceptor chain
    ///
    /// Fails if any metrics series is registered twice.
    pub fn build(config: Config) -> ServiceResult<Self> {
        let registry = MetricsRegistry::new();

        let server_metrics = ServerMetrics::register(&registry)?;
        let calls = registry.register_counter(&config.counter_name, COUNTER_HELP, COUNTER_LABEL)?;
        for method in METHODS {
            server_metrics.initialize(method.service, method.method);
        }

        let interceptors: Vec<Arc<dyn Interceptor<HelloRequest, HelloReply>>> = vec![
            Arc::new(LoggingInterceptor::new()),
            Arc::new(MetricsInterceptor::new(calls.clone()).with_server_metrics(server_metrics)),
        ];
        let chain = InterceptorChain::compose(interceptors, GreetingHandler);

        info!(
            interceptors = ?chain.order(),
            series = ?registry.series_names(),
            "Interceptor chain composed"
        );

        Ok(Self {
            config,
            registry,
            calls,
            chain: Arc::new(chain),
        })
    }

    pub fn calls(&self) -> &CounterStore {
        &self.calls
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.registry
    }

    pub fn chain(&self) -> &Arc<SayHelloChain> {
        &self.chain
    }

    /// Bind the gRPC listener, then the metrics listener
    pub async fn bind(self) -> ServiceResult<BoundGreeter> {
        let grpc_listener = TcpListener::bind(&self.config.grpc_addr)
            .await
            .map_err(|source| ServiceError::Bind {
                addr: self.config.grpc_addr.clone(),
                source,
            })?;
        let grpc_addr = grpc_listener.local_addr().map_err(|source| ServiceError::Bind {
            addr: self.config.grpc_addr.clone(),
            source,
        })?;

        let exporter = MetricsExporter::bind(
            self.registry.clone(),
            self.config.metrics_addr.as_str(),
            self.config.metrics_workers,
        )?;

        info!(
            grpc_addr = %grpc_addr,
            metrics_addr = ?exporter.local_addr(),
            "Listeners bound"
        );

        Ok(BoundGreeter {
            grpc_listener,
            grpc_addr,
            exporter,
            calls: self.calls,
            service: GreeterServiceImpl::new(self.chain),
        })
    }
}

/// Service with both listeners bound
pub struct BoundGreeter {
    grpc_listener: TcpListener,
    grpc_addr: SocketAddr,
    exporter: MetricsExporter,
    calls: CounterStore,
    service: GreeterServiceImpl,
}

impl BoundGreeter {
    pub fn grpc_addr(&self) -> SocketAddr {
        self.grpc_addr
    }

    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.exporter.local_addr()
    }

    pub fn calls(&self) -> &CounterStore {
        &self.calls
    }

    /// Run the gRPC and metrics accept loops until either one stops
    pub async fn serve(self) -> ServiceResult<()> {
        let mut join_set = JoinSet::new();

        let exporter = self.exporter;
        join_set.spawn(async move { exporter.run().await.map_err(ServiceError::from) });

        let incoming = TcpListenerStream::new(self.grpc_listener);
        let service = self.service;
        let grpc_addr = self.grpc_addr;
        join_set.spawn(async move {
            info!(addr = %grpc_addr, "gRPC server serving");
            Server::builder()
                .add_service(GreeterServer::new(service))
                .serve_with_incoming(incoming)
                .await
                .map_err(ServiceError::from)
        });

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(Ok(())) => {
                    info!("Server task completed");
                }
                Ok(Err(e)) => {
                    tracing::error!("Server task failed: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!("Server task panicked: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }
}
