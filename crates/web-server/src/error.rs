// In crates/web-server/src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("symbol must not be empty")]
    EmptySymbol,
    #[error("lookback_period must be a positive integer")]
    InvalidLookback,
    #[error(transparent)]
    Fetch(#[from] api_client::Error),
    #[error(transparent)]
    Analysis(#[from] analysis::Error),
    #[error("Failed to bind server address: {0}")]
    ServerBindError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Error::EmptySymbol | Error::InvalidLookback => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::Fetch(api_client::Error::EmptySeries { .. }) => {
                (StatusCode::NOT_FOUND, "No market data found.".to_string())
            }
            Error::Fetch(e) => {
                tracing::error!(error = %e, "market data fetch failed");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Error fetching data: {e}"))
            }
            Error::Analysis(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Error::ServerBindError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
