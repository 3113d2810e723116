//! Endpoint tests driving the router against an in-memory table.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use adult_stats::sql::{first_row_sql, mean_sql, most_frequent_sql};
use adult_stats::{AdultTable, ColumnName, MemoryConnector, QueryResult, Scalar, ADULT_TABLE};
use adult_stats_server::{router, ServerState, GREETING, MISSING_COLUMN_MESSAGE};

// ─────────────────────── helpers ───────────────────────

const COLUMNS: &[&str] = &["age", "workclass", "fnlwgt", "education", "education-num", "sex"];

fn column(name: &str) -> ColumnName {
    ColumnName::resolve(name, ADULT_TABLE, &[name.to_string()]).unwrap()
}

/// Connector with a realistic first row and a couple of aggregates.
fn adult_connector() -> MemoryConnector {
    MemoryConnector::new(ADULT_TABLE, COLUMNS)
        .with_result(
            first_row_sql(),
            QueryResult::new(vec![vec![
                Scalar::Int(39),
                Scalar::from("State-gov"),
                Scalar::Int(77516),
                Scalar::from("Bachelors"),
                Scalar::from("Male"),
            ]]),
        )
        .with_result(
            mean_sql(&column("age")),
            QueryResult::single(Scalar::Decimal("38.5816".into())),
        )
        .with_result(
            most_frequent_sql(&column("workclass")),
            QueryResult::new(vec![vec![Scalar::from("Private"), Scalar::Int(22696)]]),
        )
        .with_result(most_frequent_sql(&column("sex")), QueryResult::default())
        .with_result(mean_sql(&column("education-num")), QueryResult::single(10.0))
        .with_result(mean_sql(&column("fnlwgt")), QueryResult::single(Scalar::Null))
}

fn app(connector: &MemoryConnector) -> Router {
    let table = AdultTable::new(Arc::new(connector.clone()));
    router(Arc::new(ServerState::new(table)), false)
}

/// GET `uri` and return status, content type and raw body.
async fn get(app: Router, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, content_type, body) = get(app, uri).await;
    assert!(content_type.starts_with("application/json"), "got {content_type}");
    (status, serde_json::from_str(&body).unwrap())
}

// ═══════════════════════════════════════════════════════
// ENDPOINTS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_index_greeting() {
    let connector = adult_connector();
    let (status, body) = get_json(app(&connector), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(GREETING));
    assert_eq!(body, json!("We are alive, Hello Iktos !"));
    assert_eq!(connector.connections_opened(), 0);
}

#[tokio::test]
async fn test_health() {
    let connector = adult_connector();
    let (status, body) = get_json(app(&connector), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(connector.connections_opened(), 0);
}

#[tokio::test]
async fn test_first_row() {
    let connector = adult_connector();
    let (status, body) = get_json(app(&connector), "/api/v1/first_row").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([[39, "State-gov", 77516, "Bachelors", "Male"]]));
    assert_eq!(connector.connections_closed(), 1);
}

#[tokio::test]
async fn test_mean_value() {
    let connector = adult_connector();
    let (status, body) = get_json(app(&connector), "/api/v1/mean_value?column_name=age").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Mean of age": "38.5816" }));
    let mean: f64 = body["Mean of age"].as_str().unwrap().parse().unwrap();
    assert!((mean - 38.5816).abs() < 1e-9);
}

#[tokio::test]
async fn test_mean_value_keeps_caller_spelling_in_label() {
    let connector = adult_connector();
    let (status, body) = get_json(app(&connector), "/api/v1/mean_value?column_name=Age").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Mean of Age": "38.5816" }));
}

#[tokio::test]
async fn test_most_frequent_value() {
    let connector = adult_connector();
    let (status, body) =
        get_json(app(&connector), "/api/v1/most_frequentvalue?column_name=workclass").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Most frequent value of workclass": "Private" }));
}

#[tokio::test]
async fn test_repeated_column_name_takes_first() {
    let connector = adult_connector();
    let (status, body) = get_json(
        app(&connector),
        "/api/v1/mean_value?column_name=age&column_name=workclass",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Mean of age": "38.5816" }));
}

#[tokio::test]
async fn test_hyphenated_column_name() {
    let connector = adult_connector();
    let (status, body) =
        get_json(app(&connector), "/api/v1/mean_value?column_name=education-num").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Mean of education-num": "10.0" }));
    assert_eq!(
        connector.executed(),
        vec!["SELECT AVG(`education-num`) FROM Adult LIMIT 1"]
    );
}

#[tokio::test]
async fn test_null_mean_renders_none() {
    let connector = adult_connector();
    let (status, body) = get_json(app(&connector), "/api/v1/mean_value?column_name=fnlwgt").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Mean of fnlwgt": "None" }));
}

// ═══════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_missing_column_name() {
    for uri in ["/api/v1/mean_value", "/api/v1/most_frequentvalue"] {
        let connector = adult_connector();
        let (status, content_type, body) = get(app(&connector), uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(content_type.starts_with("text/plain"), "got {content_type}");
        assert_eq!(body, MISSING_COLUMN_MESSAGE);
        assert_eq!(
            body,
            "Error: No column_name field provided. Please specify a column_name."
        );
        assert_eq!(connector.connections_opened(), 0);
    }
}

#[tokio::test]
async fn test_unknown_column_is_server_error() {
    let connector = adult_connector();
    let (status, body) =
        get_json(app(&connector), "/api/v1/mean_value?column_name=salary").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "unknown_column");
    assert!(connector.executed().is_empty());
    assert_eq!(connector.connections_closed(), 1);
}

#[tokio::test]
async fn test_injection_is_rejected_before_sql() {
    let connector = adult_connector();
    let uri = "/api/v1/most_frequentvalue?column_name=age%29%20FROM%20Adult%3B%20DROP%20TABLE%20Adult%3B%20--";
    let (status, body) = get_json(app(&connector), uri).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "unknown_column");
    assert!(connector.executed().is_empty());
}

#[tokio::test]
async fn test_empty_column_name_is_server_error() {
    let connector = adult_connector();
    let (status, body) = get_json(app(&connector), "/api/v1/mean_value?column_name=").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "invalid_column");
}

#[tokio::test]
async fn test_empty_result_is_server_error() {
    let connector = adult_connector();
    let (status, body) =
        get_json(app(&connector), "/api/v1/most_frequentvalue?column_name=sex").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "empty_result");
    assert_eq!(connector.connections_closed(), 1);
}

#[tokio::test]
async fn test_backend_failure_is_server_error() {
    let connector = MemoryConnector::new(ADULT_TABLE, COLUMNS);
    let (status, body) = get_json(app(&connector), "/api/v1/first_row").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "backend");
    assert_eq!(connector.connections_opened(), 1);
    assert_eq!(connector.connections_closed(), 1);
}

#[tokio::test]
async fn test_unknown_route() {
    let connector = adult_connector();
    let (status, _, _) = get(app(&connector), "/api/v1/median_value").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
