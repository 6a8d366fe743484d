//! Booking Service Binary
//!
//! Runs the booking catalog as a REST API service:
//! - Structured JSON logging
//! - Request correlation ids
//! - Graceful shutdown handling
//! - Health check endpoints
//! - Optional static documentation under `/doc`
//!
//! ## Configuration
//!
//! Environment variables:
//! - `BOOKING_CATALOG`: JSON catalog file (default: built-in showings)
//! - `PORT`: Service port (default: 8080)
//! - `HOST`: Service host (default: 0.0.0.0)
//! - `DOC_DIR`: Directory served under `/doc` (the first CLI argument also works)
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! BOOKING_CATALOG=catalog.json cargo run --bin booking_service --features service
//! ```

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use boring_booking::service::{create_router, ServiceState};

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "booking_service=info,boring_booking=info,tower_http=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    info!(version = version, "Starting Booking Service");

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

    let doc_dir = std::env::var("DOC_DIR")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::args().nth(1));

    let state = ServiceState::from_env().map_err(|e| {
        tracing::error!(error = %e, "Failed to load catalog");
        e
    })?;

    let stats = state.catalog.stats();
    info!(
        movies = stats.movies,
        theaters = stats.theaters,
        showings = stats.showings,
        seats_available = stats.seats_available,
        catalog_fingerprint = %state.catalog.fingerprint(),
        "Catalog initialized"
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = create_router(state);
    if let Some(dir) = doc_dir {
        info!(dir = %dir, "Serving documentation under /doc");
        app = app.nest_service("/doc", ServeDir::new(dir));
    }
    let app = app.layer(TraceLayer::new_for_http()).layer(cors);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(address = %addr, version = version, "Booking Service listening");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
            _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Booking Service shutdown complete");

    Ok(())
}
