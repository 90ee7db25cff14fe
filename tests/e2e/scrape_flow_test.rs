// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 完整抓取流程端到端测试
///
/// 从HTTP请求到商家记录响应，走完采集、提取与编排的全部环节
use crate::integration::helpers::{create_test_app, create_test_app_with_engine};
use axum::http::StatusCode;
use mapleads::engines::stub::StubBrowser;
use serde_json::json;

#[tokio::test]
async fn test_scrape_flow_returns_extracted_listings() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/scrape")
        .json(&json!({
            "query": "coffee shops in san francisco",
            "max_results": 3,
            "profile": "lightning"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_results"], 3);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    assert_eq!(
        body["message"],
        "Found 3 results for 'coffee shops in san francisco'"
    );

    let first = &body["data"][0];
    assert_eq!(first["name"], "Blue Bottle Coffee");
    assert_eq!(first["rating"], 4.6);
    assert_eq!(first["category"], "Coffee shop");
    assert_eq!(first["search_query"], "coffee shops in san francisco");
    assert!(first["source_url"]
        .as_str()
        .expect("source_url should be a string")
        .contains("/maps/place/"));
    assert_eq!(first["website_visited"], false);
    assert!(first["email"].is_null());
}

#[tokio::test]
async fn test_scrape_flow_truncates_to_the_requested_count() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/scrape")
        .json(&json!({
            "query": "coffee shops in san francisco",
            "max_results": 1
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_results"], 1);
    assert_eq!(body["data"][0]["name"], "Blue Bottle Coffee");
}

#[tokio::test]
async fn test_scrape_flow_with_an_empty_feed_reports_exhaustion() {
    let app = create_test_app_with_engine(StubBrowser::new()).await;

    let response = app
        .server
        .post("/v1/scrape")
        .json(&json!({
            "query": "nothing here",
            "max_results": 5
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_results"], 0);
    assert!(body["message"]
        .as_str()
        .expect("message should be a string")
        .contains("results feed exhausted"));
}
