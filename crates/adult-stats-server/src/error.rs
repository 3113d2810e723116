//! HTTP error rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use adult_stats::StatsError;

/// Body returned when a column endpoint is called without `column_name`.
pub const MISSING_COLUMN_MESSAGE: &str =
    "Error: No column_name field provided. Please specify a column_name.";

/// All errors a handler can return.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Missing column_name parameter")]
    MissingColumnName,

    #[error(transparent)]
    Stats(#[from] StatsError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingColumnName => StatusCode::BAD_REQUEST,
            ApiError::Stats(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingColumnName => (self.status(), MISSING_COLUMN_MESSAGE).into_response(),
            ApiError::Stats(ref e) => {
                tracing::warn!("Query failed: {e}");
                (
                    self.status(),
                    Json(serde_json::json!({
                        "error": {
                            "code": e.kind(),
                            "message": e.to_string(),
                        }
                    })),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
