// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Offline stand-in for the Chromium engine.
//!
//! Serves scripted result batches and canned listing pages without
//! touching a browser. Used by the test suites and by deployments that
//! want to exercise the HTTP surface with no Chrome available.

use crate::domain::collector::DelayRange;
use crate::engines::traits::{ListingSnapshot, MapsBrowser, ResultsView, ViewError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Fixture file structure for stub listings
#[derive(Debug, Deserialize, Serialize)]
pub struct StubFixtures {
    /// 每轮滚动后可见的链接批次
    pub batches: Vec<Vec<String>>,
    /// 链接到详情页HTML的映射
    pub listings: HashMap<String, String>,
}

/// Read and parse one fixture file
fn read_fixture_file(path: &str) -> Option<StubFixtures> {
    let content = fs::read_to_string(path).ok()?;
    let fixtures = serde_yaml::from_str::<StubFixtures>(&content).ok()?;
    info!("Loaded stub fixtures from {}", path);
    Some(fixtures)
}

/// Load stub fixtures from the first readable YAML candidate
fn load_fixtures() -> Option<StubFixtures> {
    let mut candidates = vec![
        "test-data/stub-listings.yaml".to_string(),
        "stub-listings.yaml".to_string(),
    ];
    if let Ok(path) = std::env::var("MAPLEADS_STUB_FIXTURES") {
        candidates.insert(0, path);
    }

    candidates.iter().find_map(|path| read_fixture_file(path))
}

/// 离线桩引擎
#[derive(Debug, Default, Clone)]
pub struct StubBrowser {
    batches: Vec<Vec<String>>,
    listings: HashMap<String, String>,
}

impl StubBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设定每轮滚动后返回的链接批次
    pub fn with_batches(mut self, batches: Vec<Vec<String>>) -> Self {
        self.batches = batches;
        self
    }

    /// 注册一个详情页
    pub fn with_listing(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.listings.insert(url.into(), html.into());
        self
    }

    /// Built-in demo data set, overridable through a fixture file.
    pub fn sample() -> Self {
        if let Some(fixtures) = load_fixtures() {
            return Self {
                batches: fixtures.batches,
                listings: fixtures.listings,
            };
        }

        let urls = [
            "https://www.google.com/maps/place/Blue+Bottle+Coffee",
            "https://www.google.com/maps/place/Sightglass+Coffee",
            "https://www.google.com/maps/place/Ritual+Roasters",
        ];

        let mut stub = Self::new().with_batches(vec![
            vec![urls[0].to_string(), urls[1].to_string()],
            urls.iter().map(|u| u.to_string()).collect(),
        ]);

        stub = stub.with_listing(
            urls[0],
            sample_listing_html(
                "Blue Bottle Coffee",
                "66 Mint St, San Francisco, CA 94103",
                "4.6",
                "(1,234)",
                "Coffee shop",
                "https://bluebottlecoffee.com/",
                "+14155550100",
            ),
        );
        stub = stub.with_listing(
            urls[1],
            sample_listing_html(
                "Sightglass Coffee",
                "270 7th St, San Francisco, CA 94103",
                "4.5",
                "(987)",
                "Coffee roasters",
                "https://sightglasscoffee.com/",
                "+14155550123",
            ),
        );
        stub = stub.with_listing(
            urls[2],
            sample_listing_html(
                "Ritual Roasters",
                "1026 Valencia St, San Francisco, CA 94110",
                "4.4",
                "(765)",
                "Coffee shop",
                "https://ritualroasters.com/",
                "+14155550155",
            ),
        );

        stub
    }
}

/// Render a minimal place page carrying the markup the field extractor
/// looks for.
fn sample_listing_html(
    name: &str,
    address: &str,
    rating: &str,
    reviews: &str,
    category: &str,
    website: &str,
    phone: &str,
) -> String {
    format!(
        r#"<html><body>
            <h1 class="DUwDvf">{}</h1>
            <div class="F7nice"><span aria-hidden="true">{}</span><span>{}</span></div>
            <button class="DkEaL">{}</button>
            <button data-item-id="address"><div class="Io6YTe">{}</div></button>
            <a data-item-id="authority" href="{}">Website</a>
            <button data-item-id="phone:tel:{}">Call</button>
        </body></html>"#,
        name, rating, reviews, category, address, website, phone
    )
}

/// 桩结果视图
///
/// 每次推进后可见批次前移一位，越过末尾时停在最后一批
pub struct StubResultsView {
    batches: Vec<Vec<String>>,
    cursor: AtomicUsize,
}

#[async_trait]
impl ResultsView for StubResultsView {
    async fn visible_links(&self) -> Result<Vec<String>, ViewError> {
        if self.batches.is_empty() {
            return Ok(Vec::new());
        }
        let index = self.cursor.load(Ordering::SeqCst).min(self.batches.len() - 1);
        Ok(self.batches[index].clone())
    }

    async fn advance(&self) -> Result<(), ViewError> {
        self.cursor.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), ViewError> {
        Ok(())
    }
}

#[async_trait]
impl MapsBrowser for StubBrowser {
    async fn open_results(
        &self,
        _query: &str,
        _settle: DelayRange,
    ) -> Result<Box<dyn ResultsView>, ViewError> {
        Ok(Box::new(StubResultsView {
            batches: self.batches.clone(),
            cursor: AtomicUsize::new(0),
        }))
    }

    async fn fetch_listing(
        &self,
        url: &str,
        _settle: DelayRange,
    ) -> Result<ListingSnapshot, ViewError> {
        match self.listings.get(url) {
            Some(html) => Ok(ListingSnapshot {
                url: url.to_string(),
                html: html.clone(),
            }),
            None => Err(ViewError::Lookup(format!("No stub listing for {}", url))),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
