//! HTTP Controller (Driver Adapter)
//!
//! Axum router over the immutable startup snapshot. Nothing here reaches the
//! provider.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::application::ports::{DEFAULT_INTERVAL, DEFAULT_SYMBOLS};
use crate::application::services::normalize_symbols;
use crate::domain::query::{MatchPolicy, QuoteQuery};
use crate::domain::quote::QuoteSnapshot;
use crate::infrastructure::config::CorsSettings;
use crate::infrastructure::metrics::{self, Outcome, Route, get_metrics_handle};

use super::request::{
    IntervalPath, OutputsizePath, RangePath, SeriesParams, StocksParams, SymbolPath,
};
use super::response::{
    HealthResponse, LookupResponse, MissStatus, SeriesResponse, SnapshotStatus, StocksResponse,
};

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

/// Symbol charted by `/api/series` when none is given.
const DEFAULT_SERIES_SYMBOL: &str = "AAPL";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<QuoteSnapshot>,
    match_policy: MatchPolicy,
    miss_status: MissStatus,
    default_symbols: Arc<[String]>,
    default_interval: String,
    version: String,
    started_at: Instant,
}

impl AppState {
    /// State over `snapshot` with the default lookup policy.
    #[must_use]
    pub fn new(snapshot: Arc<QuoteSnapshot>) -> Self {
        Self {
            snapshot,
            match_policy: MatchPolicy::default(),
            miss_status: MissStatus::default(),
            default_symbols: DEFAULT_SYMBOLS.iter().map(ToString::to_string).collect(),
            default_interval: DEFAULT_INTERVAL.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Instant::now(),
        }
    }

    /// Set the lookup policy for `/data/...` routes.
    #[must_use]
    pub const fn with_match_policy(mut self, match_policy: MatchPolicy) -> Self {
        self.match_policy = match_policy;
        self
    }

    /// Set the status sent with a lookup miss.
    #[must_use]
    pub const fn with_miss_status(mut self, miss_status: MissStatus) -> Self {
        self.miss_status = miss_status;
        self
    }

    /// Symbols summarized by `/api/stocks` when none are requested.
    #[must_use]
    pub fn with_default_symbols(mut self, symbols: &[String]) -> Self {
        self.default_symbols = symbols.into();
        self
    }

    /// Interval used by `/api/series` when none is requested.
    #[must_use]
    pub fn with_default_interval(mut self, interval: impl Into<String>) -> Self {
        self.default_interval = interval.into();
        self
    }

    /// The snapshot being served.
    #[must_use]
    pub fn snapshot(&self) -> &QuoteSnapshot {
        &self.snapshot
    }

    /// The active lookup policy.
    #[must_use]
    pub const fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/data", get(all_data))
        .route("/data/{symbol}", get(data_by_symbol))
        .route("/data/{symbol}/{interval}", get(data_by_interval))
        .route(
            "/data/{symbol}/{interval}/{start_date}/{end_date}",
            get(data_by_range),
        )
        .route(
            "/data/{symbol}/{interval}/{start_date}/{end_date}/{outputsize}",
            get(data_by_outputsize),
        )
        .route("/api/stocks", get(stocks))
        .route("/api/series", get(series))
        .route("/health", get(health_check))
        .route("/healthz", get(liveness))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Cross-origin layer for read-only access from `settings.allowed_origins`.
pub fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if settings.allows_any() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

// =============================================================================
// Lookup Handlers
// =============================================================================

async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

async fn all_data(State(state): State<AppState>) -> Response {
    metrics::record_request(Route::All, Outcome::All);
    Json(state.snapshot.records()).into_response()
}

async fn data_by_symbol(State(state): State<AppState>, Path(path): Path<SymbolPath>) -> Response {
    lookup(&state, Route::Symbol, &path.into_query())
}

async fn data_by_interval(
    State(state): State<AppState>,
    Path(path): Path<IntervalPath>,
) -> Response {
    lookup(&state, Route::Interval, &path.into_query())
}

async fn data_by_range(State(state): State<AppState>, Path(path): Path<RangePath>) -> Response {
    lookup(&state, Route::Range, &path.into_query())
}

async fn data_by_outputsize(
    State(state): State<AppState>,
    Path(path): Path<OutputsizePath>,
) -> Response {
    lookup(&state, Route::Outputsize, &path.into_query())
}

fn lookup(state: &AppState, route: Route, query: &QuoteQuery) -> Response {
    let found = state.snapshot.find(query, state.match_policy);

    tracing::debug!(
        route = route.as_str(),
        policy = %state.match_policy,
        found = found.is_some(),
        "Quote lookup"
    );

    match found {
        Some(record) => {
            metrics::record_request(route, Outcome::Hit);
            LookupResponse::Found(record).into_response()
        }
        None => {
            metrics::record_request(route, Outcome::Miss);
            LookupResponse::Miss(state.miss_status).into_response()
        }
    }
}

// =============================================================================
// Dashboard API Handlers
// =============================================================================

async fn stocks(
    State(state): State<AppState>,
    Query(params): Query<StocksParams>,
) -> Json<StocksResponse> {
    let symbols = normalize_symbols(params.symbols.as_deref(), &state.default_symbols);
    let data = state.snapshot.summaries(&symbols);

    let outcome = if data.is_empty() {
        Outcome::Miss
    } else {
        Outcome::Hit
    };
    metrics::record_request(Route::Stocks, outcome);

    Json(StocksResponse { symbols, data })
}

async fn series(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> Json<SeriesResponse> {
    let symbol = params
        .symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SERIES_SYMBOL.to_string());
    let interval = params
        .interval
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| state.default_interval.clone());

    let points = state
        .snapshot
        .close_series(&symbol, &interval, params.outputsize);

    let outcome = if points.is_empty() {
        Outcome::Miss
    } else {
        Outcome::Hit
    };
    metrics::record_request(Route::Series, outcome);

    Json(SeriesResponse {
        symbol,
        interval,
        series: points,
    })
}

// =============================================================================
// Operational Handlers
// =============================================================================

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        current_time: Utc::now(),
        snapshot: SnapshotStatus {
            records: state.snapshot.len(),
            symbols: state
                .snapshot
                .symbols()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            fetched_at: state.snapshot.fetched_at(),
        },
    })
}

async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::CONTENT_TYPE, "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}
