// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Scrape orchestration.
//!
//! Ties the pipeline together for one request: resolve the pacing
//! profile, collect place links from the results feed, optionally widen
//! coverage with query variations, then visit each listing to extract
//! fields and (on request) probe the business website for contacts.
//!
//! Failure policy follows the error taxonomy of the engines: transient
//! errors cost a single listing or a single round, fatal errors abort
//! the run. A run that dies with partial results still returns them.

use crate::application::dto::scrape_request::ScrapeRequestDto;
use crate::config::profiles::ScrapeProfile;
use crate::config::settings::Settings;
use crate::domain::collector::{
    CancelToken, DelayStrategy, JitterDelay, LinkCollector, StopReason,
};
use crate::domain::extractor::FieldExtractor;
use crate::domain::models::listing::ListingRecord;
use crate::domain::services::website_probe::WebsiteProbe;
use crate::engines::traits::{MapsBrowser, ViewError};
use futures::{stream, StreamExt};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Hard cap on generated query variations per run.
const VARIATION_CAP: usize = 6;

#[derive(Error, Debug)]
pub enum ScrapeServiceError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Unknown scrape profile: {0}")]
    UnknownProfile(String),
    #[error("Browser session failed: {0}")]
    Session(#[from] ViewError),
}

/// 一次抓取运行的完整结果
#[derive(Debug)]
pub struct ScrapeOutcome {
    /// 原始查询
    pub query: String,
    /// 保留下来的商家记录
    pub records: Vec<ListingRecord>,
    /// 生效的目标结果数
    pub requested: usize,
    /// 采集阶段找到的链接数
    pub links_found: usize,
    /// 链接采集的停止原因
    pub stop: StopReason,
    /// 运行耗时（毫秒）
    pub duration_ms: u64,
    /// 面向调用方的结果说明
    pub message: String,
}

/// Per-listing visit result, tallied into a [`VisitSummary`].
enum VisitOutcome {
    Kept(Box<ListingRecord>),
    Discarded,
    Failed,
    Skipped,
    Fatal(ViewError),
}

struct VisitSummary {
    records: Vec<ListingRecord>,
    discarded: usize,
    failed: usize,
    skipped: usize,
    fatal: Option<ViewError>,
}

/// 抓取编排服务
pub struct ScrapeService<E> {
    engine: Arc<E>,
    probe: Arc<WebsiteProbe>,
    settings: Arc<Settings>,
    extractor: FieldExtractor,
}

impl<E> ScrapeService<E>
where
    E: MapsBrowser + 'static,
{
    pub fn new(engine: Arc<E>, probe: Arc<WebsiteProbe>, settings: Arc<Settings>) -> Self {
        Self {
            engine,
            probe,
            settings,
            extractor: FieldExtractor::new(),
        }
    }

    #[instrument(skip(self, dto, cancel), fields(query = %dto.query))]
    pub async fn scrape(
        &self,
        dto: ScrapeRequestDto,
        cancel: CancelToken,
    ) -> Result<ScrapeOutcome, ScrapeServiceError> {
        dto.validate()
            .map_err(|e| ScrapeServiceError::ValidationError(e.to_string()))?;

        let profile = self.resolve_profile(&dto)?;
        let requested = dto
            .max_results
            .unwrap_or(self.settings.scrape.default_max_results);
        let target = requested.min(self.settings.scrape.max_results_cap) as usize;
        let visit_websites = dto.visit_websites.unwrap_or(false);

        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            "Scrape {} started: query='{}' target={} engine={}",
            run_id,
            dto.query,
            target,
            self.engine.name()
        );

        // 1. Collect place links from the results feed
        let harvest = self
            .collect_pass(&dto.query, &profile, target, &cancel)
            .await?;
        let mut links = harvest.links;
        let mut stop = harvest.stop;

        // 2. Optionally widen coverage through query variations
        if self.settings.scrape.expand_coverage && links.len() < target && !cancel.is_cancelled() {
            (links, stop) = self
                .expand_coverage(links, stop, &dto.query, &profile, target, &cancel)
                .await;
        }
        links.truncate(target);
        let links_found = links.len();
        info!(
            "Scrape {}: collected {} links, stop reason {:?}",
            run_id, links_found, stop
        );

        // 3. Visit each listing, extract fields, probe websites on request
        let summary = self
            .visit_all(&links, &profile, &dto.query, visit_websites, &cancel)
            .await;

        // A session death with nothing extracted is a hard failure; with
        // partial results it degrades to a truncated success.
        let interrupted = summary.fatal.is_some();
        if let Some(fatal) = summary.fatal {
            if summary.records.is_empty() {
                return Err(ScrapeServiceError::Session(fatal));
            }
            warn!(
                "Scrape {} interrupted after {} records: {}",
                run_id,
                summary.records.len(),
                fatal
            );
        }

        if cancel.is_cancelled() {
            stop = StopReason::Cancelled;
        }

        let skipped = summary.discarded + summary.failed + summary.skipped;
        let message = build_message(
            &dto.query,
            summary.records.len(),
            target,
            links_found,
            skipped,
            stop,
            interrupted,
        );
        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "Scrape {} finished: {} records in {}ms",
            run_id,
            summary.records.len(),
            duration_ms
        );

        Ok(ScrapeOutcome {
            query: dto.query,
            records: summary.records,
            requested: target,
            links_found,
            stop,
            duration_ms,
            message,
        })
    }

    fn resolve_profile(&self, dto: &ScrapeRequestDto) -> Result<ScrapeProfile, ScrapeServiceError> {
        let name = dto
            .profile
            .as_deref()
            .unwrap_or(&self.settings.scrape.default_profile);
        let mut profile = ScrapeProfile::named(name)
            .ok_or_else(|| ScrapeServiceError::UnknownProfile(name.to_string()))?;
        profile.apply_overrides(&self.settings.scrape);
        Ok(profile)
    }

    /// 对单个查询执行一轮完整的链接采集
    ///
    /// 视图在所有路径上关闭，采集错误原样上抛
    async fn collect_pass(
        &self,
        query: &str,
        profile: &ScrapeProfile,
        target: usize,
        cancel: &CancelToken,
    ) -> Result<crate::domain::collector::Harvest, ViewError> {
        let view = self
            .engine
            .open_results(query, profile.search_settle)
            .await?;
        let collector = LinkCollector::new(profile.collector_config(target));
        let result = collector.collect(view.as_ref(), cancel).await;
        if let Err(e) = view.close().await {
            warn!("Failed to close results view for '{}': {}", query, e);
        }
        result
    }

    /// 目标未达时用地理变体查询追加采集
    ///
    /// 变体轮次的失败只中止扩展阶段，主结果不受影响
    async fn expand_coverage(
        &self,
        mut links: Vec<String>,
        mut stop: StopReason,
        query: &str,
        profile: &ScrapeProfile,
        target: usize,
        cancel: &CancelToken,
    ) -> (Vec<String>, StopReason) {
        let mut seen: HashSet<String> = links.iter().cloned().collect();
        let base = query.trim().to_lowercase();

        for variation in query_variations(query) {
            if variation == base {
                continue;
            }
            if links.len() >= target {
                break;
            }
            if cancel.is_cancelled() {
                stop = StopReason::Cancelled;
                break;
            }

            info!("Expanding coverage with variation '{}'", variation);
            match self.collect_pass(&variation, profile, target, cancel).await {
                Ok(extra) => {
                    for link in extra.links {
                        if seen.insert(link.clone()) {
                            links.push(link);
                        }
                    }
                }
                Err(e) => {
                    warn!("Coverage pass for '{}' failed: {}", variation, e);
                    break;
                }
            }
        }

        if links.len() >= target {
            stop = StopReason::TargetReached;
        }
        (links, stop)
    }

    /// 按档位并发访问全部详情页
    ///
    /// `buffered` 保持结果与链接的先见顺序一致
    async fn visit_all(
        &self,
        links: &[String],
        profile: &ScrapeProfile,
        query: &str,
        visit_websites: bool,
        cancel: &CancelToken,
    ) -> VisitSummary {
        let aborted = AtomicBool::new(false);
        // Indexed iteration keeps the closure argument lifetime-free so the
        // buffered stream satisfies the handler future's `Send` bound.
        let outcomes: Vec<VisitOutcome> = stream::iter(0..links.len())
            .map(|i| self.visit_one(&links[i], profile, query, visit_websites, cancel, &aborted))
            .buffered(profile.detail_concurrency.max(1))
            .collect()
            .await;

        let mut summary = VisitSummary {
            records: Vec::new(),
            discarded: 0,
            failed: 0,
            skipped: 0,
            fatal: None,
        };
        for outcome in outcomes {
            match outcome {
                VisitOutcome::Kept(record) => summary.records.push(*record),
                VisitOutcome::Discarded => summary.discarded += 1,
                VisitOutcome::Failed => summary.failed += 1,
                VisitOutcome::Skipped => summary.skipped += 1,
                VisitOutcome::Fatal(e) => {
                    summary.skipped += 1;
                    if summary.fatal.is_none() {
                        summary.fatal = Some(e);
                    }
                }
            }
        }
        summary
    }

    async fn visit_one(
        &self,
        url: &str,
        profile: &ScrapeProfile,
        query: &str,
        visit_websites: bool,
        cancel: &CancelToken,
        aborted: &AtomicBool,
    ) -> VisitOutcome {
        if cancel.is_cancelled() || aborted.load(Ordering::SeqCst) {
            return VisitOutcome::Skipped;
        }

        let snapshot = match self
            .engine
            .fetch_listing(url, profile.listing_settle)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_fatal() => {
                aborted.store(true, Ordering::SeqCst);
                return VisitOutcome::Fatal(e);
            }
            Err(e) => {
                warn!("Skipping listing {}: {}", url, e);
                return VisitOutcome::Failed;
            }
        };

        let mut record = self.extractor.extract(&snapshot, query);
        if !record.has_name() {
            debug!("Discarding listing without a name: {}", url);
            return VisitOutcome::Discarded;
        }

        if visit_websites {
            self.probe.enrich(&mut record).await;
        }

        JitterDelay.pause(profile.listing_pause).await;
        VisitOutcome::Kept(Box::new(record))
    }
}

fn build_message(
    query: &str,
    kept: usize,
    target: usize,
    links_found: usize,
    skipped: usize,
    stop: StopReason,
    interrupted: bool,
) -> String {
    if matches!(stop, StopReason::Cancelled) {
        return format!(
            "Scrape cancelled after collecting {} results for '{}'",
            kept, query
        );
    }
    if interrupted {
        return format!(
            "Found {} results for '{}' (browser session lost part way through)",
            kept, query
        );
    }
    if kept >= target {
        return format!("Found {} results for '{}'", kept, query);
    }
    if links_found < target {
        return format!(
            "Found {} results for '{}' (results feed exhausted)",
            kept, query
        );
    }
    format!(
        "Found {} results for '{}' ({} listings skipped)",
        kept, query, skipped
    )
}

/// Geographic variations of a search query.
///
/// The location is taken from an "in"/"near"/"around" clause, or the
/// last word when no clause is present. Known metro areas additionally
/// contribute per-neighborhood variants. Queries with no recognizable
/// location produce no variations.
pub fn query_variations(query: &str) -> Vec<String> {
    let query = query.trim().to_lowercase();
    let mut base = String::new();
    let mut location = String::new();

    for keyword in [" in ", " near ", " around "] {
        if let Some((head, tail)) = query.split_once(keyword) {
            base = head.trim().to_string();
            location = tail.trim().to_string();
            break;
        }
    }

    if location.is_empty() {
        let words: Vec<&str> = query.split_whitespace().collect();
        if words.len() > 1 {
            base = words[..words.len() - 1].join(" ");
            location = words[words.len() - 1].to_string();
        }
    }

    if base.is_empty() || location.is_empty() {
        return Vec::new();
    }

    let mut variations = vec![
        format!("{} in {}", base, location),
        format!("{} near {}", base, location),
        format!("{} {} downtown", base, location),
        format!("{} {} center", base, location),
        format!("{} {} area", base, location),
    ];

    let neighborhoods: [(&str, &[&str]); 5] = [
        ("new york", &["manhattan", "brooklyn", "queens", "bronx"]),
        (
            "san francisco",
            &["downtown", "mission", "soma", "financial district"],
        ),
        (
            "los angeles",
            &["hollywood", "beverly hills", "santa monica", "downtown"],
        ),
        ("chicago", &["downtown", "north side", "south side", "loop"]),
        ("miami", &["south beach", "downtown", "brickell", "coral gables"]),
    ];

    for (city, areas) in neighborhoods {
        if location.contains(city) {
            for area in areas {
                variations.push(format!("{} in {} {}", base, area, location));
            }
            break;
        }
    }

    variations.truncate(VARIATION_CAP);
    variations
}
