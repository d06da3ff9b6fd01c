//! HTTP exporter for Prometheus scrapes
//!
//! Runs its own actix-web server on a listener separate from the gRPC
//! service. Each scrape encodes the registry from scratch; a failed encode is
//! reported to that scrape only.

use std::fmt::Display;
use std::net::{SocketAddr, ToSocketAddrs};

use actix_web::{dev::Server, web, App, HttpResponse, HttpServer};
use tracing::{info, warn};

use crate::error::{MetricsError, Result};
use crate::registry::MetricsRegistry;

pub async fn serve_metrics(registry: web::Data<MetricsRegistry>) -> HttpResponse {
    match registry.encode_text() {
        Ok(buffer) => HttpResponse::Ok()
            .content_type(prometheus::TEXT_FORMAT)
            .body(buffer),
        Err(err) => {
            warn!(error = %err, "Failed to encode metrics scrape");
            HttpResponse::InternalServerError().body(err.to_string())
        }
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// Exporter routes; expects a `web::Data<MetricsRegistry>` in app data
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(serve_metrics))
        .route("/health", web::get().to(health));
}

/// A bound, not yet running, metrics HTTP server
pub struct MetricsExporter {
    server: Server,
    addrs: Vec<SocketAddr>,
}

impl MetricsExporter {
    /// Bind the exporter listener
    ///
    /// Binding happens eagerly so that an unavailable address fails startup
    /// before any traffic is served.
    pub fn bind<A>(registry: MetricsRegistry, addr: A, workers: usize) -> Result<Self>
    where
        A: ToSocketAddrs + Display,
    {
        let display_addr = addr.to_string();
        let registry = web::Data::new(registry);

        let http_server = HttpServer::new(move || {
            App::new()
                .app_data(registry.clone())
                .configure(routes)
        })
        .workers(workers.max(1))
        .disable_signals()
        .bind(addr)
        .map_err(|source| MetricsError::Bind {
            addr: display_addr,
            source,
        })?;

        let addrs = http_server.addrs();
        let server = http_server.run();

        Ok(Self { server, addrs })
    }

    /// First bound address
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.addrs.first().copied()
    }

    /// Serve scrapes until the process exits
    pub async fn run(self) -> Result<()> {
        info!(addrs = ?self.addrs, "Metrics exporter serving");
        self.server.await.map_err(MetricsError::Serve)
    }
}
