//! End-to-end checks against the router with real files on disk.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use meal_poll::{build_router, AppState, Config};
use tempfile::tempdir;
use tower::util::ServiceExt;

const SAMPLE: &str = "급식일자,요리명,칼로리정보(Kcal)
2024-03-01,비빔밥,550
2024-03-01,김치찌개,300
2024-03-02,비빔밥,560
";

fn app_for(path: &std::path::Path) -> axum::Router {
    let mut config = Config::default();
    config.dataset.path = path.to_string_lossy().to_string();
    build_router(AppState::new(&config).unwrap())
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn cp949_file_serves_same_rows_as_utf8() {
    let dir = tempdir().unwrap();
    let utf8_path = dir.path().join("utf8.csv");
    let cp949_path = dir.path().join("cp949.csv");

    std::fs::write(&utf8_path, SAMPLE).unwrap();
    let (encoded, _, had_errors) = encoding_rs::EUC_KR.encode(SAMPLE);
    assert!(!had_errors);
    std::fs::write(&cp949_path, &encoded).unwrap();

    let (_, utf8) = get_json(app_for(&utf8_path), "/api/v1/meals").await;
    let (status, cp949) = get_json(app_for(&cp949_path), "/api/v1/meals").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cp949["encoding"], "EUC-KR");
    assert_eq!(cp949["total"], utf8["total"]);
    assert_eq!(cp949["records"], utf8["records"]);
}

#[tokio::test]
async fn dataset_appearing_later_is_picked_up() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("meals_data.csv");
    let app = app_for(&path);

    let (status, json) = get_json(app.clone(), "/api/v1/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sections"].as_array().unwrap().len(), 0);
    assert_eq!(json["notices"][1]["level"], "warning");

    std::fs::write(&path, SAMPLE).unwrap();

    let (_, json) = get_json(app, "/api/v1/dashboard").await;
    assert_eq!(json["notices"].as_array().unwrap().len(), 0);
    assert_eq!(json["sections"][1]["choices"], serde_json::json!(["비빔밥", "김치찌개"]));
}

#[tokio::test]
async fn form_votes_reorder_tally_chart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("meals_data.csv");
    std::fs::write(&path, SAMPLE).unwrap();
    let app = app_for(&path);

    let vote = |cookie: Option<String>| {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/vote")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        // "김치찌개", percent-encoded
        builder
            .body(Body::from(
                "dish=%EA%B9%80%EC%B9%98%EC%B0%8C%EA%B0%9C",
            ))
            .unwrap()
    };

    let first = app.clone().oneshot(vote(None)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let cookie = first
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/charts/tally")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let chart: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(chart["bars"][0]["label"], "김치찌개");
    assert_eq!(chart["bars"][0]["value"], 1);
    assert_eq!(chart["bars"][1]["label"], "비빔밥");
    assert_eq!(chart["bars"][1]["value"], 0);
}
