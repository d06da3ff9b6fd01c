use anyhow::{Context, Result};
use tracing::{error, info};

use greeter_service::observability::init_tracing;
use greeter_service::{Config, GreeterApp};

async fn run(config: Config) -> Result<()> {
    let app = GreeterApp::build(config).context("Failed to initialize service")?;
    let bound = app.bind().await.context("Failed to bind listeners")?;

    info!("🚀 Starting servers:");
    info!("  - gRPC service: grpc://{}", bound.grpc_addr());
    if let Some(metrics_addr) = bound.metrics_addr() {
        info!("  - Prometheus metrics: http://{}/metrics", metrics_addr);
    }

    bound.serve().await.context("Server stopped with an error")?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level, config.log_json);

    info!("🔧 Starting greeter-service");
    info!(
        grpc_addr = %config.grpc_addr,
        metrics_addr = %config.metrics_addr,
        "✅ Configuration loaded"
    );

    if let Err(e) = run(config).await {
        error!("greeter-service failed: {:#}", e);
        std::process::exit(1);
    }

    info!("🛑 greeter-service shutting down");
}
