//! Reference client for helloworld.Greeter
//!
//! Usage: `greeter-client [name]`
//!
//! Connects to `GREETER_SERVER_ADDR` (default `http://localhost:50051`) and
//! sends one SayHello with a one second deadline.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use tonic::Request;
use tracing::{error, info};

use greeter_service::grpc::helloworld::HelloRequest;
use greeter_service::grpc::GreeterClient;
use greeter_service::observability::init_tracing;

const DEFAULT_ADDR: &str = "http://localhost:50051";
const DEFAULT_NAME: &str = "world";
const CALL_DEADLINE: Duration = Duration::from_secs(1);

async fn greet(addr: String, name: String) -> Result<String> {
    let mut client = GreeterClient::connect(addr.clone())
        .await
        .with_context(|| format!("did not connect to {addr}"))?;

    let mut request = Request::new(HelloRequest { name });
    request.set_timeout(CALL_DEADLINE);

    let reply = client
        .say_hello(request)
        .await
        .context("could not greet")?
        .into_inner();

    Ok(reply.message)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let level = env::var("GREETER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    init_tracing(&level, false);

    let addr = env::var("GREETER_SERVER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let name = env::args().nth(1).unwrap_or_else(|| DEFAULT_NAME.to_string());

    match greet(addr, name).await {
        Ok(message) => info!("Greeting: {}", message),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}
