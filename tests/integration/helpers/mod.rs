// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Extension;
use axum_test::TestServer;
use mapleads::config::settings::{
    BrowserSettings, ProbeSettings, ScrapeSettings, ServerSettings, Settings,
};
use mapleads::domain::collector::{CancelToken, DelayRange};
use mapleads::domain::services::website_probe::WebsiteProbe;
use mapleads::engines::stub::StubBrowser;
use mapleads::presentation::routes;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub cancel: CancelToken,
}

/// Settings tuned for fast offline runs against the stub engine.
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        browser: BrowserSettings {
            engine: "stub".to_string(),
            remote_debugging_url: None,
            request_timeout_secs: 5,
        },
        scrape: ScrapeSettings {
            default_profile: "lightning".to_string(),
            default_max_results: 10,
            max_results_cap: 500,
            expand_coverage: false,
            scroll_attempts: None,
            stall_budget: None,
            detail_concurrency: Some(1),
            scroll_settle: Some(DelayRange::new(0, 0)),
        },
        probe: ProbeSettings {
            timeout_secs: 2,
            max_body_bytes: 65_536,
            user_agent: "mapleads-tests".to_string(),
        },
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with_engine(StubBrowser::sample()).await
}

pub async fn create_test_app_with_engine(engine: StubBrowser) -> TestApp {
    let settings = Arc::new(test_settings());
    let probe =
        Arc::new(WebsiteProbe::new(&settings.probe).expect("Failed to build website probe"));
    let cancel = CancelToken::default();

    let app = routes::routes::<StubBrowser>()
        .layer(Extension(Arc::new(engine)))
        .layer(Extension(probe))
        .layer(Extension(settings))
        .layer(Extension(cancel.clone()))
        .layer(TraceLayer::new_for_http());

    let server = TestServer::new(app).expect("Failed to start test server");
    TestApp { server, cancel }
}
