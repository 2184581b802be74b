//! Drives `GoogleSheetsSink` against a local stand-in for the OAuth and
//! Sheets endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use chrono::{Local, TimeZone};
use serde_json::{json, Value};
use starpair_api::{AnalysisLogSink, GoogleSheetsSink, LogRow};
use starpair_api::sheets::{ServiceAccountKey, HEADER_ROW};
use starpair_core::{fallback_bundle, Person, SheetsConfig, Sign};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const TEST_KEY: &str = include_str!("fixtures/test_service_account_key.pem");

#[derive(Default)]
struct Recorded {
    token_requests: Vec<HashMap<String, String>>,
    reads: Vec<String>,
    appends: Vec<(String, Value)>,
    existing_rows: Vec<Vec<Value>>,
    read_delay: Duration,
    failing_appends: usize,
}

type Shared = Arc<Mutex<Recorded>>;

async fn token(
    State(shared): State<Shared>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    shared.lock().unwrap().token_requests.push(form);
    Json(json!({"access_token": "test-token", "expires_in": 3600, "token_type": "Bearer"}))
}

async fn read_values(
    State(shared): State<Shared>,
    Path((_sheet, range)): Path<(String, String)>,
) -> Json<Value> {
    let delay = shared.lock().unwrap().read_delay;
    tokio::time::sleep(delay).await;
    let mut recorded = shared.lock().unwrap();
    recorded.reads.push(range.clone());
    if recorded.existing_rows.is_empty() {
        Json(json!({"range": range, "majorDimension": "ROWS"}))
    } else {
        Json(json!({"range": range, "values": recorded.existing_rows}))
    }
}

async fn append_values(
    State(shared): State<Shared>,
    Path((_sheet, range)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut recorded = shared.lock().unwrap();
    if recorded.failing_appends > 0 {
        recorded.failing_appends -= 1;
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": {"code": 503, "message": "backend unavailable"}})),
        );
    }
    // Appended rows show up in later reads, like the real worksheet.
    let rows = body["values"].as_array().cloned().unwrap_or_default();
    recorded
        .existing_rows
        .extend(rows.into_iter().filter_map(|r| r.as_array().cloned()));
    recorded.appends.push((range, body));
    (StatusCode::OK, Json(json!({"updates": {"updatedRows": 1}})))
}

async fn start_mock(shared: Shared) -> SocketAddr {
    let app = Router::new()
        .route("/token", post(token))
        .route(
            "/v4/spreadsheets/{sheet}/values/{range}",
            get(read_values).post(append_values),
        )
        .with_state(shared);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn sink_for(addr: SocketAddr) -> GoogleSheetsSink {
    let key = ServiceAccountKey::from_json(
        &json!({
            "type": "service_account",
            "client_email": "logger@starpair-test.iam.gserviceaccount.com",
            "private_key": TEST_KEY,
            "token_uri": format!("http://{addr}/token"),
        })
        .to_string(),
    )
    .unwrap();
    GoogleSheetsSink::new(
        key,
        "sheet-123".to_string(),
        "Sheet1!A:K".to_string(),
        format!("http://{addr}/v4"),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn row(name1: &str) -> LogRow {
    let p1 = Person {
        name: name1.to_string(),
        gender: "female".to_string(),
        birth: "1990-04-05".to_string(),
        zodiac_sign: Sign::Aries,
    };
    let p2 = Person {
        name: "Tuan".to_string(),
        gender: "male".to_string(),
        birth: "1991-06-02".to_string(),
        zodiac_sign: Sign::Gemini,
    };
    let bundle = fallback_bundle(&p1, &p2);
    LogRow::new(&p1, &p2, &bundle, Local.with_ymd_and_hms(2025, 10, 17, 8, 0, 0).unwrap())
}

#[tokio::test]
async fn empty_sheet_gets_header_then_rows() {
    let shared = Shared::default();
    let addr = start_mock(shared.clone()).await;
    let sink = sink_for(addr);

    sink.append(&row("Mai")).await.unwrap();
    sink.append(&row("Lan")).await.unwrap();

    let recorded = shared.lock().unwrap();
    assert_eq!(recorded.token_requests.len(), 1, "token should be cached");
    assert_eq!(
        recorded.token_requests[0]["grant_type"],
        "urn:ietf:params:oauth:grant-type:jwt-bearer"
    );
    assert_eq!(recorded.token_requests[0]["assertion"].split('.').count(), 3);

    assert_eq!(recorded.reads, vec!["Sheet1!A:K".to_string()]);

    assert_eq!(recorded.appends.len(), 3);
    assert_eq!(recorded.appends[0].0, "Sheet1!A:K:append");
    assert_eq!(recorded.appends[0].1["values"][0], json!(HEADER_ROW));
    assert_eq!(recorded.appends[1].1["values"][0][1], "Mai");
    assert_eq!(recorded.appends[1].1["values"][0][9], 98);
    assert_eq!(recorded.appends[2].1["values"][0][1], "Lan");
}

#[tokio::test]
async fn non_empty_sheet_gets_no_header() {
    let shared = Shared::default();
    shared.lock().unwrap().existing_rows = vec![vec![json!("Timestamp")]];
    let addr = start_mock(shared.clone()).await;
    let sink = sink_for(addr);

    sink.append(&row("Mai")).await.unwrap();

    let recorded = shared.lock().unwrap();
    assert_eq!(recorded.appends.len(), 1);
    assert_eq!(recorded.appends[0].1["values"][0][0], "2025-10-17 08:00:00");
}

#[tokio::test]
async fn concurrent_appends_wait_for_the_header() {
    let shared = Shared::default();
    shared.lock().unwrap().read_delay = Duration::from_millis(300);
    let addr = start_mock(shared.clone()).await;
    let sink = sink_for(addr);

    let (mai, lan) = (row("Mai"), row("Lan"));
    let (first, second) = tokio::join!(sink.append(&mai), sink.append(&lan));
    first.unwrap();
    second.unwrap();

    let recorded = shared.lock().unwrap();
    assert_eq!(recorded.reads.len(), 1);
    assert_eq!(recorded.existing_rows.len(), 3);
    assert_eq!(recorded.existing_rows[0], HEADER_ROW.map(|h| json!(h)).to_vec());
    let names: Vec<&Value> = recorded.existing_rows[1..].iter().map(|r| &r[1]).collect();
    assert!(names.contains(&&json!("Mai")));
    assert!(names.contains(&&json!("Lan")));
}

#[tokio::test]
async fn failed_header_write_keeps_the_row() {
    let shared = Shared::default();
    shared.lock().unwrap().failing_appends = 1;
    let addr = start_mock(shared.clone()).await;
    let sink = sink_for(addr);

    sink.append(&row("Mai")).await.unwrap();
    sink.append(&row("Lan")).await.unwrap();

    let recorded = shared.lock().unwrap();
    // The second append checks again and finds the sheet already in use.
    assert_eq!(recorded.reads.len(), 2);
    assert_eq!(recorded.appends.len(), 2);
    assert_eq!(recorded.appends[0].1["values"][0][1], "Mai");
    assert_eq!(recorded.appends[1].1["values"][0][1], "Lan");
}

#[tokio::test]
async fn unreachable_service_is_an_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sink = sink_for(addr);
    assert!(sink.append(&row("Mai")).await.is_err());
}

#[tokio::test]
async fn sink_is_built_from_credentials_file() {
    let shared = Shared::default();
    let addr = start_mock(shared.clone()).await;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("service-account.json");
    let credentials = json!({
        "client_email": "logger@starpair-test.iam.gserviceaccount.com",
        "private_key": TEST_KEY,
        "token_uri": format!("http://{addr}/token"),
    });
    std::fs::write(&path, credentials.to_string()).unwrap();

    let config = SheetsConfig {
        sheet_id: Some("sheet-123".to_string()),
        credentials_path: Some(path),
        api_base: format!("http://{addr}/v4"),
        ..SheetsConfig::default()
    };
    let sink = GoogleSheetsSink::from_config(&config).await.unwrap().unwrap();
    sink.append(&row("Mai")).await.unwrap();

    assert_eq!(shared.lock().unwrap().token_requests.len(), 1);
}

#[tokio::test]
async fn disabled_config_builds_no_sink() {
    let config = SheetsConfig {
        enabled: false,
        sheet_id: Some("sheet-123".to_string()),
        ..SheetsConfig::default()
    };
    assert!(GoogleSheetsSink::from_config(&config).await.unwrap().is_none());
}
