//! HTTP API Integration Tests
//!
//! Drives the router with `oneshot` requests against fixed snapshots:
//! - Unfiltered and filtered `/data` lookups under both match policies
//! - Plain-text "No data found" misses, 200 by default or 404 when configured
//! - Dashboard endpoints and operational endpoints
//! - The snapshot is fetched once no matter how many requests are served

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use quote_snapshot_server::infrastructure::config::CorsSettings;
use quote_snapshot_server::{
    AppState, FetchRequest, MatchPolicy, MissStatus, NO_DATA_FOUND, ProviderError,
    QuoteProviderPort, QuoteRecord, QuoteSnapshot, SnapshotLoader, cors_layer, create_router,
    init_metrics,
};

// ============================================
// Helpers
// ============================================

fn priced(symbol: &str, interval: &str, datetime: &str, close: i64) -> QuoteRecord {
    let close = Decimal::new(close, 2);
    QuoteRecord::new(symbol, interval, datetime, 10).with_prices(close, close, close, close)
}

fn records() -> Vec<QuoteRecord> {
    vec![
        priced("AAPL", "1min", "2023-01-01 09:31:00", 15020),
        priced("AAPL", "1min", "2023-01-01 09:30:00", 15010),
        priced("MSFT", "1min", "2023-01-01 09:31:00", 25050),
        priced("MSFT", "1min", "2023-01-01 09:30:00", 25040),
    ]
}

fn app_with(records: Vec<QuoteRecord>, policy: MatchPolicy) -> Router {
    let state = AppState::new(Arc::new(QuoteSnapshot::new(records))).with_match_policy(policy);
    create_router(state)
}

fn app() -> Router {
    app_with(records(), MatchPolicy::FirstRecord)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("should build request");
    let response = app.oneshot(request).await.expect("request should succeed");

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("should read body");

    (status, String::from_utf8(bytes.to_vec()).unwrap(), content_type)
}

async fn get_json(app: Router, uri: &str) -> Value {
    let (status, body, _) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK, "unexpected status for {uri}: {body}");
    serde_json::from_str(&body).expect("should parse JSON")
}

fn assert_no_data(status: StatusCode, body: &str, content_type: Option<&str>) {
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, NO_DATA_FOUND);
    assert!(content_type.unwrap().starts_with("text/plain"));
}

// ============================================
// /data
// ============================================

#[tokio::test]
async fn data_returns_full_snapshot_in_order() {
    let (status, body, content_type) = get(app(), "/data").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("application/json"));
    let returned: Vec<QuoteRecord> = serde_json::from_str(&body).unwrap();
    assert_eq!(returned, records());
}

#[tokio::test]
async fn data_on_empty_snapshot_is_empty_array() {
    let json = get_json(app_with(vec![], MatchPolicy::FirstRecord), "/data").await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn record_json_carries_lookup_fields() {
    let json = get_json(app(), "/data/AAPL").await;

    assert_eq!(json["symbol"], "AAPL");
    assert_eq!(json["interval"], "1min");
    assert_eq!(json["datetime"], "2023-01-01 09:31:00");
    assert_eq!(json["outputsize"], 10);
    assert_eq!(json["close"], "150.20");
}

// ============================================
// /data/{symbol}/...
// ============================================

#[tokio::test]
async fn symbol_matching_first_record_is_found() {
    let returned: QuoteRecord =
        serde_json::from_value(get_json(app(), "/data/AAPL").await).unwrap();
    assert_eq!(returned, records()[0]);
}

#[tokio::test]
async fn first_record_policy_misses_symbol_present_later() {
    let (status, body, content_type) = get(app(), "/data/MSFT").await;
    assert_no_data(status, &body, content_type.as_deref());
}

#[tokio::test]
async fn full_scan_policy_finds_symbol_present_later() {
    let json = get_json(app_with(records(), MatchPolicy::FullScan), "/data/MSFT").await;

    assert_eq!(json["symbol"], "MSFT");
    assert_eq!(json["datetime"], "2023-01-01 09:31:00");
}

#[tokio::test]
async fn symbol_comparison_is_case_sensitive() {
    let (status, body, content_type) = get(app(), "/data/aapl").await;
    assert_no_data(status, &body, content_type.as_deref());
}

#[tokio::test]
async fn interval_mismatch_is_a_miss() {
    let (status, body, content_type) = get(app(), "/data/AAPL/5min").await;
    assert_no_data(status, &body, content_type.as_deref());

    let json = get_json(app(), "/data/AAPL/1min").await;
    assert_eq!(json["interval"], "1min");
}

#[tokio::test]
async fn range_lookup_on_single_record_snapshot() {
    let app = app_with(
        vec![QuoteRecord::new("AAPL", "1min", "2023-01-01 09:30:00", 10)],
        MatchPolicy::FirstRecord,
    );

    let json = get_json(
        app,
        "/data/AAPL/1min/2023-01-01%2009:00:00/2023-01-01%2010:00:00",
    )
    .await;

    assert_eq!(json["symbol"], "AAPL");
    assert_eq!(json["datetime"], "2023-01-01 09:30:00");
}

#[tokio::test]
async fn range_bounds_are_inclusive() {
    let json = get_json(
        app(),
        "/data/AAPL/1min/2023-01-01%2009:31:00/2023-01-01%2009:31:00",
    )
    .await;
    assert_eq!(json["datetime"], "2023-01-01 09:31:00");

    let (status, body, content_type) = get(
        app(),
        "/data/AAPL/1min/2023-01-01%2009:32:00/2023-01-01%2010:00:00",
    )
    .await;
    assert_no_data(status, &body, content_type.as_deref());
}

#[tokio::test]
async fn outputsize_is_compared_as_text() {
    let base = "/data/AAPL/1min/2023-01-01%2009:00:00/2023-01-01%2010:00:00";

    let json = get_json(app(), &format!("{base}/10")).await;
    assert_eq!(json["outputsize"], 10);

    for outputsize in ["5", "010", "ten"] {
        let (status, body, content_type) = get(app(), &format!("{base}/{outputsize}")).await;
        assert_no_data(status, &body, content_type.as_deref());
    }
}

#[tokio::test]
async fn miss_status_can_be_not_found() {
    let state = AppState::new(Arc::new(QuoteSnapshot::new(records())))
        .with_miss_status(MissStatus::NotFound);

    let (status, body, content_type) = get(create_router(state), "/data/MSFT").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, NO_DATA_FOUND);
    assert!(content_type.unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn hit_is_unaffected_by_miss_status() {
    let state = AppState::new(Arc::new(QuoteSnapshot::new(records())))
        .with_miss_status(MissStatus::NotFound);

    let (status, _, content_type) = get(create_router(state), "/data/AAPL").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("application/json"));
}

#[tokio::test]
async fn lookups_on_empty_snapshot_miss() {
    let app = app_with(vec![], MatchPolicy::FullScan);
    let (status, body, content_type) = get(app, "/data/AAPL").await;
    assert_no_data(status, &body, content_type.as_deref());
}

// ============================================
// Dashboard API
// ============================================

#[tokio::test]
async fn dashboard_is_html() {
    let (status, body, content_type) = get(app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(body.contains("/api/stocks"));
}

#[tokio::test]
async fn stocks_summarizes_requested_symbols() {
    let json = get_json(app(), "/api/stocks?symbols=msft,%20aapl,tsla").await;

    assert_eq!(json["symbols"], serde_json::json!(["MSFT", "AAPL", "TSLA"]));
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["symbol"], "MSFT");
    assert_eq!(data[0]["price"], "250.50");
    assert_eq!(data[0]["change_percent"], "0.0399");
    assert_eq!(data[1]["symbol"], "AAPL");
    assert_eq!(data[1]["updated"], "2023-01-01 09:31:00");
}

#[tokio::test]
async fn stocks_defaults_to_configured_symbols() {
    let state = AppState::new(Arc::new(QuoteSnapshot::new(records())))
        .with_default_symbols(&["MSFT".to_string()]);

    let json = get_json(create_router(state), "/api/stocks").await;

    assert_eq!(json["symbols"], serde_json::json!(["MSFT"]));
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn series_is_ascending_by_datetime() {
    let json = get_json(app(), "/api/series?symbol=aapl").await;

    assert_eq!(json["symbol"], "AAPL");
    assert_eq!(json["interval"], "1min");
    let series = json["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["t"], "2023-01-01 09:30:00");
    assert_eq!(series[0]["c"], "150.10");
    assert_eq!(series[1]["t"], "2023-01-01 09:31:00");
}

#[tokio::test]
async fn series_outputsize_keeps_newest_points() {
    let json = get_json(app(), "/api/series?symbol=MSFT&outputsize=1").await;

    let series = json["series"].as_array().unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["t"], "2023-01-01 09:31:00");
    assert_eq!(series[0]["c"], "250.50");
}

#[tokio::test]
async fn series_for_unknown_interval_is_empty() {
    let json = get_json(app(), "/api/series?symbol=AAPL&interval=1day").await;
    assert_eq!(json["series"], serde_json::json!([]));
}

// ============================================
// Operational Endpoints
// ============================================

#[tokio::test]
async fn health_reports_snapshot() {
    let json = get_json(app(), "/health").await;

    assert_eq!(json["status"], "healthy");
    assert_eq!(json["snapshot"]["records"], 4);
    assert_eq!(json["snapshot"]["symbols"], serde_json::json!(["AAPL", "MSFT"]));
    assert!(json["snapshot"]["fetched_at"].is_string());
}

#[tokio::test]
async fn liveness_is_ok() {
    let (status, body, _) = get(app(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn metrics_render_after_lookups() {
    init_metrics().unwrap();

    let _ = get(app(), "/data/MSFT").await;
    let (status, body, _) = get(app(), "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("quote_api_requests_total"));
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let app = app().layer(cors_layer(&CorsSettings::default()));
    let request = Request::builder()
        .uri("/data")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn cors_echoes_listed_origin_only() {
    let settings = CorsSettings {
        allowed_origins: vec!["http://localhost:8080".to_string()],
    };

    let allowed = app()
        .layer(cors_layer(&settings))
        .oneshot(
            Request::builder()
                .uri("/data")
                .header(header::ORIGIN, "http://localhost:8080")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:8080"
    );

    let denied = app()
        .layer(cors_layer(&settings))
        .oneshot(
            Request::builder()
                .uri("/data")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(
        denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

// ============================================
// Snapshot Lifetime
// ============================================

struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl QuoteProviderPort for CountingProvider {
    async fn fetch_snapshot(
        &self,
        _request: &FetchRequest,
    ) -> Result<Vec<QuoteRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(records())
    }
}

#[tokio::test]
async fn snapshot_is_never_refetched_between_requests() {
    let provider = Arc::new(CountingProvider {
        calls: AtomicUsize::new(0),
    });
    let loader = SnapshotLoader::new(Arc::clone(&provider), FetchRequest::default());
    let (snapshot, _) = loader.load().await.unwrap();
    let router = create_router(AppState::new(snapshot));

    for uri in [
        "/data",
        "/data/AAPL",
        "/data/AAPL/1min",
        "/data/MSFT",
        "/api/stocks",
        "/api/series",
        "/health",
    ] {
        let _ = get(router.clone(), uri).await;
    }

    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}
