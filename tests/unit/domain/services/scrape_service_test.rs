// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抓取编排服务测试模块
///
/// 通过桩引擎验证完整的采集、提取与错误降级流程

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use mapleads::application::dto::scrape_request::ScrapeRequestDto;
    use mapleads::config::settings::{
        BrowserSettings, ProbeSettings, ScrapeSettings, ServerSettings, Settings,
    };
    use mapleads::domain::collector::{CancelToken, DelayRange, StopReason};
    use mapleads::domain::services::scrape_service::{ScrapeService, ScrapeServiceError};
    use mapleads::domain::services::website_probe::WebsiteProbe;
    use mapleads::engines::stub::StubBrowser;
    use mapleads::engines::traits::{ListingSnapshot, MapsBrowser, ResultsView, ViewError};
    use std::sync::Arc;

    fn test_settings() -> Arc<Settings> {
        Arc::new(Settings {
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
        })
    }

    fn service_for<E: MapsBrowser + 'static>(engine: E) -> ScrapeService<E> {
        let settings = test_settings();
        let probe = Arc::new(WebsiteProbe::new(&settings.probe).expect("probe should build"));
        ScrapeService::new(Arc::new(engine), probe, settings)
    }

    fn request(query: &str, max_results: u32) -> ScrapeRequestDto {
        ScrapeRequestDto {
            query: query.to_string(),
            max_results: Some(max_results),
            visit_websites: Some(false),
            profile: None,
        }
    }

    const NAMED: &str = r#"<html><body><h1 class="DUwDvf">Named Cafe</h1></body></html>"#;
    const NAMELESS: &str = r#"<html><body><p>under construction</p></body></html>"#;

    /// 引擎对指定URL返回致命错误，其余委托给内部桩
    struct PoisonedBrowser {
        inner: StubBrowser,
        poison: String,
    }

    #[async_trait]
    impl MapsBrowser for PoisonedBrowser {
        async fn open_results(
            &self,
            query: &str,
            settle: DelayRange,
        ) -> Result<Box<dyn ResultsView>, ViewError> {
            self.inner.open_results(query, settle).await
        }

        async fn fetch_listing(
            &self,
            url: &str,
            settle: DelayRange,
        ) -> Result<ListingSnapshot, ViewError> {
            if url == self.poison {
                return Err(ViewError::SessionLost("browser went away".to_string()));
            }
            self.inner.fetch_listing(url, settle).await
        }

        fn name(&self) -> &'static str {
            "poisoned"
        }
    }

    #[tokio::test]
    async fn test_full_run_extracts_records_in_link_order() {
        let service = service_for(StubBrowser::sample());
        let outcome = service
            .scrape(request("coffee shops", 3), CancelToken::default())
            .await
            .expect("scrape should succeed");

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.links_found, 3);
        assert_eq!(outcome.stop, StopReason::TargetReached);
        assert_eq!(outcome.message, "Found 3 results for 'coffee shops'");

        let first = &outcome.records[0];
        assert_eq!(first.name.as_deref(), Some("Blue Bottle Coffee"));
        assert_eq!(first.search_query, "coffee shops");
        assert!(first.source_url.contains("Blue+Bottle"));
        assert_eq!(first.rating, Some(4.6));
        assert!(!first.website_visited);
    }

    #[tokio::test]
    async fn test_results_are_truncated_to_the_requested_target() {
        let service = service_for(StubBrowser::sample());
        let outcome = service
            .scrape(request("coffee shops", 2), CancelToken::default())
            .await
            .expect("scrape should succeed");

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.stop, StopReason::TargetReached);
    }

    #[tokio::test]
    async fn test_nameless_listings_are_discarded() {
        let stub = StubBrowser::new()
            .with_batches(vec![vec!["u1".to_string(), "u2".to_string()]])
            .with_listing("u1", NAMED)
            .with_listing("u2", NAMELESS);
        let service = service_for(stub);

        let outcome = service
            .scrape(request("cafes", 2), CancelToken::default())
            .await
            .expect("scrape should succeed");

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].name.as_deref(), Some("Named Cafe"));
        assert!(outcome.message.contains("1 listings skipped"));
    }

    #[tokio::test]
    async fn test_unknown_profile_is_rejected() {
        let service = service_for(StubBrowser::sample());
        let mut dto = request("cafes", 2);
        dto.profile = Some("warp".to_string());

        let err = service
            .scrape(dto, CancelToken::default())
            .await
            .expect_err("unknown profile must fail");

        assert!(matches!(err, ScrapeServiceError::UnknownProfile(ref name) if name == "warp"));
    }

    #[tokio::test]
    async fn test_empty_query_fails_validation() {
        let service = service_for(StubBrowser::sample());
        let err = service
            .scrape(request("", 2), CancelToken::default())
            .await
            .expect_err("empty query must fail");

        assert!(matches!(err, ScrapeServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_cancellation_before_start_returns_empty_outcome() {
        let service = service_for(StubBrowser::sample());
        let cancel = CancelToken::default();
        cancel.cancel();

        let outcome = service
            .scrape(request("coffee shops", 3), cancel)
            .await
            .expect("cancelled scrape still succeeds");

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stop, StopReason::Cancelled);
        assert!(outcome.message.starts_with("Scrape cancelled"));
    }

    #[tokio::test]
    async fn test_transient_listing_failures_only_skip_that_listing() {
        // u2 has no registered page, the stub reports a lookup failure.
        let stub = StubBrowser::new()
            .with_batches(vec![vec!["u1".to_string(), "u2".to_string()]])
            .with_listing("u1", NAMED);
        let service = service_for(stub);

        let outcome = service
            .scrape(request("cafes", 2), CancelToken::default())
            .await
            .expect("scrape should succeed");

        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.message.contains("1 listings skipped"));
    }

    #[tokio::test]
    async fn test_session_loss_with_no_records_is_an_error() {
        let stub = StubBrowser::new().with_batches(vec![vec!["u1".to_string()]]);
        let service = service_for(PoisonedBrowser {
            inner: stub,
            poison: "u1".to_string(),
        });

        let err = service
            .scrape(request("cafes", 1), CancelToken::default())
            .await
            .expect_err("session loss with nothing extracted must fail");

        assert!(matches!(err, ScrapeServiceError::Session(_)));
    }

    #[tokio::test]
    async fn test_session_loss_after_partial_results_degrades_to_success() {
        let stub = StubBrowser::new()
            .with_batches(vec![vec!["u1".to_string(), "u2".to_string()]])
            .with_listing("u1", NAMED);
        let service = service_for(PoisonedBrowser {
            inner: stub,
            poison: "u2".to_string(),
        });

        let outcome = service
            .scrape(request("cafes", 2), CancelToken::default())
            .await
            .expect("partial results should be returned");

        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.message.contains("session lost"));
    }
}
