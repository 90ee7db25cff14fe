// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;

#[tokio::test]
async fn test_health_check_works() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_version_reports_the_package_version() {
    let app = create_test_app().await;

    let response = app.server.get("/v1/version").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_scrape_rejects_an_empty_query() {
    let app = create_test_app().await;

    let payload = serde_json::json!({
        "query": "",
        "max_results": 5
    });
    let response = app.server.post("/v1/scrape").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .expect("error should be a string")
        .contains("Query cannot be empty"));
}

#[tokio::test]
async fn test_scrape_rejects_out_of_range_max_results() {
    let app = create_test_app().await;

    for bad in [0, 501] {
        let payload = serde_json::json!({
            "query": "coffee shops",
            "max_results": bad
        });
        let response = app.server.post("/v1/scrape").json(&payload).await;

        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "max_results={} should be rejected",
            bad
        );
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_scrape_rejects_an_unknown_profile() {
    let app = create_test_app().await;

    let payload = serde_json::json!({
        "query": "coffee shops",
        "max_results": 2,
        "profile": "warp"
    });
    let response = app.server.post("/v1/scrape").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .expect("error should be a string")
        .contains("warp"));
}

#[tokio::test]
async fn test_scrape_rejects_a_payload_without_a_query() {
    let app = create_test_app().await;

    let payload = serde_json::json!({ "max_results": 5 });
    let response = app.server.post("/v1/scrape").json(&payload).await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}
