// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use mapleads::config::settings::ProbeSettings;
use mapleads::domain::models::listing::ListingRecord;
use mapleads::domain::services::website_probe::WebsiteProbe;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn probe() -> WebsiteProbe {
    WebsiteProbe::new(&ProbeSettings {
        timeout_secs: 2,
        max_body_bytes: 65_536,
        user_agent: "mapleads-tests".to_string(),
    })
    .expect("Failed to build website probe")
}

fn record_with_website(website: String) -> ListingRecord {
    let mut record = ListingRecord::new(
        "https://www.google.com/maps/place/demo".to_string(),
        "cafes".to_string(),
    );
    record.name = Some("Demo Cafe".to_string());
    record.phone = Some("(415) 555-0100".to_string());
    record.website = Some(website);
    record
}

#[tokio::test]
async fn test_probe_pulls_contacts_from_the_business_site() {
    let mock_server = MockServer::start().await;
    let page = r#"<html><body>
        <a href="mailto:owner@cafedemo.example">Email the owner</a>
        <p>Support: support@cafedemo.example</p>
        <p>Call us at (415) 555-0100 or (415) 555-0177</p>
    </body></html>"#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&mock_server)
        .await;

    let mut record = record_with_website(mock_server.uri());
    probe().enrich(&mut record).await;

    assert_eq!(record.email.as_deref(), Some("owner@cafedemo.example"));
    assert_eq!(
        record.secondary_email.as_deref(),
        Some("support@cafedemo.example")
    );
    // the number already on the record does not reappear
    assert_eq!(record.additional_phones, vec!["(415) 555-0177"]);
    assert!(record.website_visited);
}

#[tokio::test]
async fn test_probe_leaves_the_record_alone_when_the_site_errors() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut record = record_with_website(mock_server.uri());
    probe().enrich(&mut record).await;

    assert_eq!(record.email, None);
    assert_eq!(record.secondary_email, None);
    assert!(record.additional_phones.is_empty());
    assert!(!record.website_visited);
}

#[tokio::test]
async fn test_probe_skips_records_without_a_website() {
    let mut record = ListingRecord::new(
        "https://www.google.com/maps/place/demo".to_string(),
        "cafes".to_string(),
    );
    probe().enrich(&mut record).await;

    assert!(!record.website_visited);
    assert_eq!(record.email, None);
}
