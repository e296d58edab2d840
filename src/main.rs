//! Path router demo server.
//!
//! Registers every route from the config file with an echo handler that
//! reports the matched pattern and bindings as JSON.
//!
//! ```text
//! Client Request
//!     → http server (request ID, trace, timeout)
//!     → routing dispatcher (exact match, then segment-wise scan)
//!     → echo handler | 404 | 405 | 500
//!     → Client Response
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use path_router::config::{load_config, ServiceConfig};
use path_router::http::{response, HttpDispatcher, HttpServer};
use path_router::observability::logging;
use path_router::routing::{Dispatcher, RouteError};

#[derive(Parser)]
#[command(name = "path-router")]
#[command(about = "Echo server for a path router configuration", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Err(err) = logging::init(&config.observability) {
        eprintln!("Logging already initialised: {err}");
    }

    tracing::info!("path-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let dispatcher = Arc::new(echo_dispatcher(&config)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, dispatcher);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn echo_dispatcher(config: &ServiceConfig) -> Result<HttpDispatcher, RouteError> {
    let dispatcher = Dispatcher::builder().with_config(&config.routing).build();
    for route in &config.routes {
        let pattern = route.pattern.clone();
        dispatcher.add_with_ref(&route.method, &route.pattern, &route.reference, move |ctx, params| {
            Ok(response::echo(&pattern, &ctx, &params))
        })?;
    }
    Ok(dispatcher)
}
