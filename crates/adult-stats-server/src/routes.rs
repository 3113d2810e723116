//! Route table and handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use adult_stats::{AdultTable, QueryResult};

use crate::error::{ApiError, ApiResult};

pub const GREETING: &str = "We are alive, Hello Iktos !";

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub table: AdultTable,
}

impl ServerState {
    pub fn new(table: AdultTable) -> Self {
        Self { table }
    }
}

/// Query string of the column endpoints.
#[derive(Debug, Default)]
pub struct ColumnParams {
    pub column_name: Option<String>,
}

impl ColumnParams {
    /// Take the first `column_name` when the key is repeated.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let column_name = pairs
            .into_iter()
            .find(|(key, _)| key == "column_name")
            .map(|(_, value)| value);
        Self { column_name }
    }

    fn require(self) -> ApiResult<String> {
        self.column_name.ok_or(ApiError::MissingColumnName)
    }
}

/// Build the router with every endpoint.
pub fn router(state: Arc<ServerState>, cors: bool) -> Router {
    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/v1/first_row", get(first_row))
        .route("/api/v1/mean_value", get(mean_value))
        .route("/api/v1/most_frequentvalue", get(most_frequent_value))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

async fn index() -> Json<&'static str> {
    Json(GREETING)
}

/// Liveness check; does not touch the database.
async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn first_row(State(state): State<Arc<ServerState>>) -> ApiResult<Json<QueryResult>> {
    Ok(Json(state.table.first_row().await?))
}

async fn mean_value(
    State(state): State<Arc<ServerState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<HashMap<String, String>>> {
    let column = ColumnParams::from_pairs(pairs).require()?;
    let mean = state.table.mean_value(&column).await?;
    Ok(labelled(format!("Mean of {column}"), mean))
}

async fn most_frequent_value(
    State(state): State<Arc<ServerState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<HashMap<String, String>>> {
    let column = ColumnParams::from_pairs(pairs).require()?;
    let value = state.table.most_frequent_value(&column).await?;
    Ok(labelled(format!("Most frequent value of {column}"), value))
}

fn labelled(label: String, value: impl ToString) -> Json<HashMap<String, String>> {
    Json(HashMap::from([(label, value.to_string())]))
}
