// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Chromium-backed Google Maps engine.
//!
//! Drives a headless Chrome instance over CDP to open search result
//! feeds and capture listing pages. The results feed is exposed through
//! [`ChromiumResultsView`], which tracks its own growth so it can
//! escalate recovery (zig-zag scroll, "show more" click, full reload)
//! when the feed stops loading new entries.

use crate::config::settings::BrowserSettings;
use crate::domain::collector::{DelayRange, DelayStrategy, JitterDelay};
use crate::engines::traits::{ListingSnapshot, MapsBrowser, ResultsView, ViewError};
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Direct search URL prefix, the encoded query is appended.
const SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// Maps landing page, used when the direct search URL yields no feed.
const MAPS_HOME: &str = "https://www.google.com/maps";

/// Substring that marks an anchor as a place detail link.
const RESULT_LINK_MARKER: &str = "/maps/place/";

/// Origin used to absolutize relative place links.
const GOOGLE_ORIGIN: &str = "https://www.google.com";

/// Consent interstitial accept buttons, tried in order.
const CONSENT_BUTTONS: [&str; 3] = [
    "button[aria-label='Accept all']",
    "#L2AGLb",
    "form[action*='consent'] button",
];

/// Elements whose presence confirms the page is a results feed.
const FEED_MARKERS: [&str; 2] = ["div[role='feed']", "a[href*='/maps/place/']"];

/// Scroll the results container to its bottom. Google rotates the
/// container markup, so a list of known candidates is probed and the
/// window itself is the last resort.
const SCROLL_FEED_JS: &str = r##"
    (() => {
        const candidates = [
            "div[role='feed']",
            "div[role='main']",
            ".m6QErb",
            "#pane",
            ".siAUzd",
            ".section-scrollbox",
            ".section-layout",
        ];
        for (const selector of candidates) {
            const el = document.querySelector(selector);
            if (el && el.scrollHeight > el.clientHeight) {
                el.scrollTop = el.scrollHeight;
                return selector;
            }
        }
        window.scrollBy(0, window.innerHeight);
        return "window";
    })()
"##;

/// Recovery for a stagnant feed: jiggle the scroll position to retrigger
/// lazy loading, then click any "show more" style button if present.
const SHOW_MORE_JS: &str = r#"
    (() => {
        const feed = document.querySelector("div[role='feed']");
        if (feed) {
            feed.scrollTop = Math.max(0, feed.scrollTop - 800);
            setTimeout(() => { feed.scrollTop = feed.scrollHeight; }, 50);
        }
        const button = Array.from(document.querySelectorAll("button"))
            .find(b => /show more|more results/i.test(b.textContent || ""));
        if (button) {
            button.click();
            return "clicked";
        }
        return "scrolled";
    })()
"#;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("Failed to compile anchor selector"));

// Global browser instance to avoid re-launching Chrome on every request.
// This significantly improves performance for browser-based scraping.
static BROWSER_INSTANCE: OnceCell<Browser> = OnceCell::const_new();

/// Chromium引擎
///
/// 基于chromiumoxide实现的Google Maps浏览器引擎
pub struct ChromiumEngine {
    settings: BrowserSettings,
}

impl ChromiumEngine {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    // Asynchronously gets or initializes the shared browser instance.
    // This function ensures that the browser is launched only once.
    async fn browser(&self) -> Result<&'static Browser, ViewError> {
        let settings = self.settings.clone();
        BROWSER_INSTANCE
            .get_or_try_init(|| async move {
                let (browser, mut handler) = if let Some(ref url) = settings.remote_debugging_url {
                    tracing::info!("Connecting to remote Chrome instance at: {}", url);
                    Browser::connect(url.clone()).await.map_err(|e| {
                        ViewError::SessionLost(format!("Failed to connect to remote Chrome: {}", e))
                    })?
                } else {
                    let config = BrowserConfig::builder()
                        .no_sandbox()
                        .request_timeout(Duration::from_secs(settings.request_timeout_secs))
                        .arg("--disable-gpu")
                        .arg("--disable-dev-shm-usage")
                        .arg("--lang=en-US")
                        .build()
                        .map_err(ViewError::SessionLost)?;
                    Browser::launch(config)
                        .await
                        .map_err(|e| ViewError::SessionLost(e.to_string()))?
                };

                // Spawn a handler to process browser events
                tokio::spawn(async move {
                    while let Some(h) = handler.next().await {
                        if h.is_err() {
                            break;
                        }
                    }
                });

                Ok(browser)
            })
            .await
    }

    /// 将搜索结果页准备到可供采集的状态
    ///
    /// 依次处理：直达搜索URL、同意页拦截、封禁检测，
    /// 以及直达URL未产生结果列表时回退到首页手工搜索
    async fn prepare_results_page(
        &self,
        page: &Page,
        query: &str,
        settle: DelayRange,
    ) -> Result<(), ViewError> {
        let url = search_url(query);
        tracing::debug!("Opening results for '{}' at {}", query, url);
        page.goto(url.as_str())
            .await
            .map_err(|e| ViewError::Navigation(e.to_string()))?;
        JitterDelay.pause(settle).await;

        if self.accept_consent(page).await? {
            page.goto(url.as_str())
                .await
                .map_err(|e| ViewError::Navigation(e.to_string()))?;
            JitterDelay.pause(settle).await;
        }

        self.ensure_not_blocked(page).await?;

        if !self.has_results_feed(page).await {
            tracing::warn!(
                "Direct search URL produced no results feed for '{}', falling back to manual search",
                query
            );
            self.search_via_home(page, query, settle).await?;
            self.ensure_not_blocked(page).await?;
        }

        Ok(())
    }

    /// Returns true when a consent interstitial was dismissed and the
    /// original search URL needs to be reloaded.
    async fn accept_consent(&self, page: &Page) -> Result<bool, ViewError> {
        let current = page.url().await.map_err(page_error)?.unwrap_or_default();
        if !current.contains("consent.google.com") {
            return Ok(false);
        }

        tracing::info!("Consent interstitial detected, accepting");
        for selector in CONSENT_BUTTONS {
            if let Ok(button) = page.find_element(selector).await {
                if button.click().await.is_ok() {
                    tokio::time::sleep(Duration::from_millis(1_000)).await;
                    return Ok(true);
                }
            }
        }

        // No button matched but we are still on the consent host, let
        // the caller retry the search URL anyway.
        Ok(true)
    }

    /// 检查页面标题是否出现封禁特征
    async fn ensure_not_blocked(&self, page: &Page) -> Result<(), ViewError> {
        let title = page
            .get_title()
            .await
            .map_err(page_error)?
            .unwrap_or_default()
            .to_lowercase();
        if title.contains("sorry") || title.contains("blocked") {
            return Err(ViewError::Blocked(format!(
                "Page title indicates blocking: {}",
                title
            )));
        }
        Ok(())
    }

    async fn has_results_feed(&self, page: &Page) -> bool {
        for marker in FEED_MARKERS {
            if page.find_element(marker).await.is_ok() {
                return true;
            }
        }
        false
    }

    /// Fallback path: load the Maps landing page and drive the search
    /// box by hand. Failures here are navigation failures, the run
    /// cannot start without a results page.
    async fn search_via_home(
        &self,
        page: &Page,
        query: &str,
        settle: DelayRange,
    ) -> Result<(), ViewError> {
        let nav = |e: CdpError| ViewError::Navigation(e.to_string());

        page.goto(MAPS_HOME).await.map_err(nav)?;
        JitterDelay.pause(settle).await;
        self.accept_consent(page).await?;

        let input = page
            .find_element("#searchboxinput")
            .await
            .map_err(|e| ViewError::Navigation(format!("Search box not found: {}", e)))?;
        input.click().await.map_err(nav)?;
        input.type_str(query).await.map_err(nav)?;

        match page.find_element("#searchbox-searchbutton").await {
            Ok(button) => {
                button.click().await.map_err(nav)?;
            }
            Err(_) => {
                input.press_key("Enter").await.map_err(nav)?;
            }
        }
        JitterDelay.pause(settle).await;

        Ok(())
    }
}

#[async_trait]
impl MapsBrowser for ChromiumEngine {
    async fn open_results(
        &self,
        query: &str,
        settle: DelayRange,
    ) -> Result<Box<dyn ResultsView>, ViewError> {
        let browser = self.browser().await?;
        let page = browser.new_page("about:blank").await.map_err(page_error)?;

        if let Err(e) = self.prepare_results_page(&page, query, settle).await {
            // Page is Clone over a shared target handle, close the
            // duplicate so the failed tab does not leak.
            let _ = page.clone().close().await;
            return Err(e);
        }

        Ok(Box::new(ChromiumResultsView {
            page,
            last_count: AtomicUsize::new(0),
            no_growth: AtomicU32::new(0),
        }))
    }

    async fn fetch_listing(
        &self,
        url: &str,
        settle: DelayRange,
    ) -> Result<ListingSnapshot, ViewError> {
        let browser = self.browser().await?;
        let page = browser.new_page("about:blank").await.map_err(page_error)?;
        let result = capture_snapshot(&page, url, settle).await;
        let _ = page.close().await;
        result
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// 单个详情页的导航与快照捕获
///
/// 错误按瞬态分类，单个详情页失败不应终止整个运行，
/// 除非错误特征表明浏览器会话已丢失
async fn capture_snapshot(
    page: &Page,
    url: &str,
    settle: DelayRange,
) -> Result<ListingSnapshot, ViewError> {
    page.goto(url).await.map_err(page_error)?;
    JitterDelay.pause(settle).await;

    let html = page.content().await.map_err(page_error)?;
    let current = page
        .url()
        .await
        .map_err(page_error)?
        .unwrap_or_else(|| url.to_string());

    Ok(ListingSnapshot { url: current, html })
}

/// 搜索结果列表视图
///
/// 持有结果页并跟踪两次读取之间的链接增长，
/// 无增长时逐级升级恢复动作
pub struct ChromiumResultsView {
    page: Page,
    last_count: AtomicUsize,
    no_growth: AtomicU32,
}

#[async_trait]
impl ResultsView for ChromiumResultsView {
    async fn visible_links(&self) -> Result<Vec<String>, ViewError> {
        let mut links = Vec::new();

        // Single-result queries redirect straight to the place page, in
        // which case the page URL itself is the only link there is.
        if let Ok(Some(current)) = self.page.url().await {
            if current.contains(RESULT_LINK_MARKER) {
                links.push(current);
            }
        }

        let html = self.page.content().await.map_err(page_error)?;
        for link in extract_place_links(&html) {
            if !links.contains(&link) {
                links.push(link);
            }
        }

        let previous = self.last_count.swap(links.len(), Ordering::SeqCst);
        if links.len() > previous {
            self.no_growth.store(0, Ordering::SeqCst);
        } else {
            self.no_growth.fetch_add(1, Ordering::SeqCst);
        }

        Ok(links)
    }

    async fn advance(&self) -> Result<(), ViewError> {
        let stagnant = self.no_growth.load(Ordering::SeqCst);

        if stagnant >= 6 {
            tracing::debug!("Results feed stagnant for {} rounds, reloading page", stagnant);
            self.page.reload().await.map_err(page_error)?;
            self.no_growth.store(0, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(1_500)).await;
            return Ok(());
        }

        if stagnant >= 3 {
            tracing::debug!("Results feed stagnant for {} rounds, trying show-more", stagnant);
            self.page.evaluate(SHOW_MORE_JS).await.map_err(page_error)?;
        }

        self.page.evaluate(SCROLL_FEED_JS).await.map_err(page_error)?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), ViewError> {
        self.page.close().await.map_err(page_error)
    }
}

/// 生成查询的直达搜索URL，空格以加号连接
pub(crate) fn search_url(query: &str) -> String {
    let encoded = urlencoding::encode(query.trim()).replace("%20", "+");
    format!("{}{}", SEARCH_URL, encoded)
}

/// Pull place detail links out of a results page snapshot.
///
/// Relative hrefs are absolutized against the Google origin, duplicates
/// are dropped, and first-seen document order is preserved.
pub(crate) fn extract_place_links(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    // Html is not Send, keep parsing inside this synchronous scope.
    let doc = Html::parse_document(html);
    for element in doc.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.contains(RESULT_LINK_MARKER) {
            continue;
        }
        let absolute = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", GOOGLE_ORIGIN, href)
        };
        if seen.insert(absolute.clone()) {
            links.push(absolute);
        }
    }

    links
}

/// CDP错误分类
///
/// 超时与会话丢失有专属变体，其余按瞬态页面交互失败处理
fn classify_page_error(message: &str) -> ViewError {
    let lowered = message.to_lowercase();
    if lowered.contains("timeout") || lowered.contains("timed out") {
        return ViewError::Timeout;
    }

    let session_markers = [
        "session",
        "target closed",
        "target crashed",
        "detached",
        "connection",
        "websocket",
    ];
    if session_markers.iter().any(|m| lowered.contains(m)) {
        ViewError::SessionLost(message.to_string())
    } else {
        ViewError::Evaluation(message.to_string())
    }
}

fn page_error(err: CdpError) -> ViewError {
    classify_page_error(&err.to_string())
}
