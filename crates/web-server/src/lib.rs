// In crates/web-server/src/lib.rs

use api_client::KlineSource;
use app_config::types::ServerSettings;
use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use core_types::Symbol;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use types::{AnalyzeRequest, AnalyzeResponse};

pub mod error;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

/// The shared application state that is available to all API handlers.
///
/// The kline source is injected here once at startup, so every request
/// reuses the same underlying exchange connection.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn KlineSource>,
}

/// Creates the main application router with all routes and middleware.
///
/// # Arguments
///
/// * `app_state`: The shared `AppState` holding the kline source.
///
/// # Returns
///
/// The configured `axum::Router`.
pub fn create_router(app_state: AppState) -> Router {
    // Define a CORS layer to allow requests from our frontend.
    // In a production environment, you would restrict the origin to your actual frontend domain.
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any) // For development, allow any origin
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_check_handler))
        // The chat page and its assets.
        .route_service("/", ServeFile::new("static/index.html"))
        .nest_service("/static", ServeDir::new("static"))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// A simple health check handler.
/// Responds with a 200 OK and a plain body.
async fn health_check_handler() -> &'static str {
    "OK"
}

/// The handler for `POST /analyze`.
///
/// Fetches the requested candle window from the exchange, runs the
/// analysis pipeline over it, and returns the classified prediction.
async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>> {
    if request.symbol.trim().is_empty() {
        return Err(Error::EmptySymbol);
    }
    if request.lookback_period == 0 {
        return Err(Error::InvalidLookback);
    }

    let symbol = Symbol(request.symbol);
    let series = state
        .source
        .fetch_series(&symbol, &request.interval, request.lookback_period)
        .await?;

    let signal = analysis::analyze(&series)?;
    tracing::info!(symbol = %symbol, prediction = %signal.prediction(), "analysis complete");

    Ok(Json(AnalyzeResponse { symbol: symbol.0, prediction: signal.prediction() }))
}

/// The main entry point for running the web server.
///
/// This function sets up the TCP listener and serves the application router.
/// It will run forever until the process is terminated.
pub async fn run(settings: ServerSettings, app_state: AppState) -> Result<()> {
    let app = create_router(app_state);

    let address = format!("{}:{}", settings.host, settings.port);
    tracing::info!("Web server listening on {}", address);

    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(Error::ServerBindError)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{TimeZone, Utc};
    use core_types::{Candle, CandleSeries};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// A canned source that always returns the same series.
    struct StaticSource(CandleSeries);

    #[async_trait]
    impl KlineSource for StaticSource {
        async fn fetch_series(
            &self,
            _symbol: &Symbol,
            _interval: &str,
            _lookback: u16,
        ) -> api_client::Result<CandleSeries> {
            Ok(self.0.clone())
        }
    }

    /// A source for a symbol the venue knows nothing about.
    struct EmptySource;

    #[async_trait]
    impl KlineSource for EmptySource {
        async fn fetch_series(
            &self,
            symbol: &Symbol,
            _interval: &str,
            _lookback: u16,
        ) -> api_client::Result<CandleSeries> {
            Err(api_client::Error::EmptySeries { symbol: symbol.0.clone() })
        }
    }

    fn ascending_series(n: i64) -> CandleSeries {
        let candles = (1..=n)
            .map(|i| {
                let close = Decimal::from(i);
                let open_time = Utc.timestamp_opt(i * 60, 0).unwrap();
                Candle {
                    open_time,
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: Decimal::ONE,
                    close_time: open_time + chrono::Duration::seconds(59),
                }
            })
            .collect();
        CandleSeries::try_new(candles).unwrap()
    }

    fn router_with(source: impl KlineSource + 'static) -> Router {
        create_router(AppState { source: Arc::new(source) })
    }

    fn analyze_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn analyze_returns_the_prediction_for_a_rising_market() {
        let app = router_with(StaticSource(ascending_series(250)));
        let request = analyze_request(json!({
            "symbol": "BTCUSDT",
            "interval": "1m",
            "lookback_period": 250,
        }));

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "symbol": "BTCUSDT", "prediction": "BUY (Trend is Up)" }));
    }

    #[tokio::test]
    async fn interval_and_lookback_have_defaults() {
        let app = router_with(StaticSource(ascending_series(250)));
        let response =
            app.oneshot(analyze_request(json!({ "symbol": "ETHUSDT" }))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["symbol"], "ETHUSDT");
    }

    #[tokio::test]
    async fn unknown_symbol_maps_to_not_found() {
        let app = router_with(EmptySource);
        let response =
            app.oneshot(analyze_request(json!({ "symbol": "NOPEUSDT" }))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "No market data found.");
    }

    #[tokio::test]
    async fn short_history_maps_to_bad_request() {
        let app = router_with(StaticSource(ascending_series(199)));
        let response =
            app.oneshot(analyze_request(json!({ "symbol": "BTCUSDT" }))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("larger lookback"), "unexpected detail: {detail}");
    }

    #[tokio::test]
    async fn blank_symbol_is_rejected() {
        let app = router_with(StaticSource(ascending_series(250)));
        let response =
            app.oneshot(analyze_request(json!({ "symbol": "  " }))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn zero_lookback_is_rejected() {
        let app = router_with(StaticSource(ascending_series(250)));
        let request =
            analyze_request(json!({ "symbol": "BTCUSDT", "lookback_period": 0 }));
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let app = router_with(StaticSource(ascending_series(1)));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
