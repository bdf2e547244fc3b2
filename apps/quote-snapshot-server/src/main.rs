//! Quote Snapshot Server Binary
//!
//! Fetches the quote snapshot once, then serves it over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin quote-snapshot-server
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_KEY`: Twelve Data API key
//!
//! ## Optional
//! - `QUOTE_SYMBOLS`: comma-separated symbols (default: AAPL,MSFT,GOOGL,AMZN,NVDA)
//! - `QUOTE_INTERVAL`: bar interval (default: 1min)
//! - `QUOTE_OUTPUTSIZE`: bars per symbol, 1-5000 (default: 10)
//! - `QUOTE_TIMEZONE`: timestamp timezone (default: America/New_York)
//! - `QUOTE_ORDER`: asc | desc (default: provider order)
//! - `QUOTE_MATCH_POLICY`: first-record | full-scan (default: first-record)
//! - `QUOTE_MISS_STATUS`: ok | not-found, status sent with "No data found" (default: ok)
//! - `TWELVEDATA_BASE_URL`: provider base URL (default: <https://api.twelvedata.com>)
//! - `TWELVEDATA_TIMEOUT_SECS`: provider timeout (default: 30)
//! - `HTTP_PORT`: listen port (default: 8080)
//! - `CORS_ORIGINS`: comma-separated origins, `*` for any (default: *)
//! - `OTEL_ENABLED`: Enable OpenTelemetry export (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4318>)
//! - `OTEL_SERVICE_NAME`: Service name (default: quote-snapshot-server)
//! - `RUST_LOG`: Log filter (default: `LOG_LEVEL`, else info)

use std::net::SocketAddr;
use std::sync::Arc;

use quote_snapshot_server::infrastructure::metrics::{record_provider_fetch, set_snapshot_records};
use quote_snapshot_server::infrastructure::telemetry;
use quote_snapshot_server::{
    AppState, ServerConfig, SnapshotLoader, StartupError, TwelveDataAdapter, TwelveDataConfig,
    cors_layer, create_router, init_metrics,
};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();

    let telemetry_guard = telemetry::init().map_err(StartupError::from)?;

    tracing::info!(
        span_export = telemetry_guard.is_exporting(),
        "Starting Quote Snapshot Server"
    );

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Quote Snapshot Server failed");
        return Err(e.into());
    }

    tracing::info!("Quote Snapshot Server stopped");
    Ok(())
}

async fn run() -> Result<(), StartupError> {
    init_metrics()?;

    let config = ServerConfig::from_env()?;
    log_config(&config);

    let provider_config = TwelveDataConfig::new(config.credentials.api_key().to_string())
        .with_base_url(config.provider.base_url.clone())
        .with_timeout(config.provider.timeout);
    let provider = Arc::new(TwelveDataAdapter::new(&provider_config)?);

    let loader = SnapshotLoader::new(provider, config.fetch.clone());
    let (snapshot, elapsed) = loader.load().await?;
    record_provider_fetch(elapsed);
    set_snapshot_records(snapshot.len());

    let state = AppState::new(snapshot)
        .with_match_policy(config.match_policy)
        .with_miss_status(config.miss_status)
        .with_default_symbols(&config.fetch.symbols)
        .with_default_interval(config.fetch.interval.clone());

    let app = create_router(state)
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http());

    let port = config.server.http_port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { port, source })?;

    log_endpoints(port);

    let shutdown_token = CancellationToken::new();
    tokio::spawn(await_shutdown(shutdown_token.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_token.cancelled_owned())
        .await
        .map_err(StartupError::Serve)
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &ServerConfig) {
    tracing::info!(
        symbols = %config.fetch.symbol_param(),
        interval = %config.fetch.interval,
        outputsize = config.fetch.outputsize,
        timezone = %config.fetch.timezone,
        order = config.fetch.order.map_or("provider", |o| o.as_str()),
        match_policy = %config.match_policy,
        miss_status = %config.miss_status,
        http_port = config.server.http_port,
        "Configuration loaded"
    );
    tracing::debug!(
        base_url = %config.provider.base_url,
        timeout_secs = config.provider.timeout.as_secs(),
        cors_any = config.cors.allows_any(),
        "Provider settings"
    );
}

fn log_endpoints(port: u16) {
    tracing::info!(port, "HTTP server listening");
    tracing::info!("  GET  /                                                      - Dashboard");
    tracing::info!("  GET  /data                                                  - Full snapshot");
    tracing::info!("  GET  /data/{{symbol}}                                         - By symbol");
    tracing::info!("  GET  /data/{{symbol}}/{{interval}}                              - By symbol and interval");
    tracing::info!("  GET  /data/{{symbol}}/{{interval}}/{{start}}/{{end}}                - By datetime range");
    tracing::info!("  GET  /data/{{symbol}}/{{interval}}/{{start}}/{{end}}/{{outputsize}}   - By range and output size");
    tracing::info!("  GET  /api/stocks?symbols=A,B                                - Latest prices");
    tracing::info!("  GET  /api/series?symbol=AAPL&interval=1min                  - Close series");
    tracing::info!("  GET  /health, /healthz, /metrics                            - Operations");
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
