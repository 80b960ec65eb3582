use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use roi_engine::api::{build_router, AppState, BatchItem, CalculationResponse};
use roi_engine::ingestion::{IngestionRecord, IngestionSink};
use roi_engine::config::ServerConfig;
use roi_engine::{CountryBaselineTable, EngineConfig};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingSink {
    records: Mutex<Vec<IngestionRecord>>,
}

impl IngestionSink for RecordingSink {
    fn submit(&self, record: &IngestionRecord) -> anyhow::Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn state(sink: Arc<RecordingSink>) -> Arc<AppState> {
    Arc::new(AppState {
        table: CountryBaselineTable::builtin().clone(),
        config: EngineConfig::default(),
        sink,
    })
}

async fn post(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn scenario_a() -> Value {
    json!({
        "calls": 1000,
        "interactions": 1000,
        "country": "Bangladesh",
        "mode": "PER_BUNDLE",
        "bundle_price_usd": 1650
    })
}

#[tokio::test]
async fn calculate_returns_result_and_display() {
    let router = build_router(state(Arc::default()));
    let (status, body) = post(router, "/api/calculate", scenario_a()).await;
    assert_eq!(status, StatusCode::OK);
    let response: CalculationResponse = serde_json::from_slice(&body).unwrap();
    assert!((response.result.monthly_savings_usd - 3550.0).abs() < 1e-9);
    assert_eq!(response.display.traditional_cost, "$5.2K");
    assert_eq!(response.display.cost_unit, "per bundle");
}

#[tokio::test]
async fn calculate_reports_every_violation() {
    let router = build_router(state(Arc::default()));
    let body = json!({
        "calls": 0,
        "interactions": 0,
        "country": "Atlantis",
        "mode": "AGENT_COUNT",
        "analysis_period_months": 0
    });
    let (status, body) = post(router, "/api/calculate", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["violations"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn batch_returns_one_item_per_request() {
    let router = build_router(state(Arc::default()));
    let mut rejected = scenario_a();
    rejected["interactions"] = json!(0);
    let (status, body) = post(router, "/api/calculate/batch", json!([scenario_a(), rejected])).await;
    assert_eq!(status, StatusCode::OK);
    let items: Vec<BatchItem> = serde_json::from_slice(&body).unwrap();
    assert_eq!(items.len(), 2);
    assert!(matches!(items[0], BatchItem::Ok { .. }));
    assert!(matches!(items[1], BatchItem::Rejected { .. }));
}

#[tokio::test]
async fn submit_hands_record_to_sink() {
    let sink = Arc::new(RecordingSink::default());
    let router = build_router(state(sink.clone()));
    let mut body = scenario_a();
    body["email"] = json!("lead@example.com");
    let (status, body) = post(router, "/api/submit", body).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let record: IngestionRecord = serde_json::from_slice(&body).unwrap();
    assert!((record.roi - 2.1515).abs() < 1e-3);

    let stored = sink.records.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], record);
}

#[tokio::test]
async fn submit_rejects_bad_email() {
    let sink = Arc::new(RecordingSink::default());
    let router = build_router(state(sink.clone()));
    let mut body = scenario_a();
    body["email"] = json!("not-an-address");
    let (status, _) = post(router, "/api/submit", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(sink.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn oversized_request_is_a_client_error() {
    let router = build_router(state(Arc::default()));
    let mut body = scenario_a();
    body["call_handle_minutes"] = json!(1e306);
    let (status, body) = post(router, "/api/calculate", body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["violations"].as_array().unwrap().len(), 1);
}

#[test]
fn startup_refuses_an_empty_country_table() {
    let path = std::env::temp_dir().join(format!("roi-empty-table-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"version": "empty", "countries": []}"#).unwrap();
    let config = ServerConfig {
        bind_addr: "127.0.0.1:0".into(),
        country_table: Some(path.clone()),
        engine: EngineConfig::default(),
    };
    let outcome = AppState::from_config(&config);
    std::fs::remove_file(&path).unwrap();
    assert!(outcome.is_err());
}
