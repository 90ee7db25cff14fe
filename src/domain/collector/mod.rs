// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Incremental link collection over a scrollable results view.
//!
//! The collector drives a [`ResultsView`] in rounds: read the links that are
//! currently visible, merge the genuinely new ones into the collected set,
//! then scroll and wait for the view to settle. A run stops when the target
//! size is reached, the attempt budget is spent, the view stops producing
//! new links for a configured number of consecutive rounds, or the caller
//! cancels. An empty harvest is a valid outcome, not an error.

use crate::engines::traits::{ResultsView, ViewError};
use std::collections::HashSet;
use tracing::{debug, warn};

pub mod cancel;
pub mod delay;

pub use cancel::CancelToken;
pub use delay::{DelayRange, DelayStrategy, JitterDelay, NoDelay};

/// Tuning knobs for one collection run.
///
/// All thresholds come from configuration profiles; nothing here is
/// hard-coded into the loop itself.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Stop once this many unique links have been collected.
    pub target: usize,
    /// Hard ceiling on extract/scroll rounds.
    pub max_attempts: u32,
    /// Consecutive no-progress rounds tolerated before giving up.
    pub stall_budget: u32,
    /// Settle delay between a scroll and the next extraction.
    pub settle: DelayRange,
}

/// Why a collection run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The collected set reached the requested size.
    TargetReached,
    /// The attempt budget ran out before the target was met.
    Exhausted,
    /// The view produced no new links for `stall_budget` consecutive rounds.
    Stalled,
    /// The caller cancelled the run.
    Cancelled,
}

/// The outcome of one collection run.
#[derive(Debug)]
pub struct Harvest {
    /// Unique result links in first-seen order, truncated to the target.
    pub links: Vec<String>,
    pub stop: StopReason,
    /// Completed extract/scroll rounds.
    pub attempts: u32,
}

/// Scroll-and-extract loop over a results view.
///
/// Generic over the delay strategy so tests can run with [`NoDelay`]
/// instead of wall-clock sleeps.
pub struct LinkCollector<D = JitterDelay> {
    config: CollectorConfig,
    delay: D,
}

impl LinkCollector<JitterDelay> {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            delay: JitterDelay,
        }
    }
}

impl<D: DelayStrategy> LinkCollector<D> {
    pub fn with_delay(config: CollectorConfig, delay: D) -> Self {
        Self { config, delay }
    }

    /// Run the collection loop until one of the stop conditions holds.
    ///
    /// # Errors
    ///
    /// Only fatal view failures (lost session, impossible navigation,
    /// blocked page) are returned as errors. Transient extraction or
    /// scroll hiccups are logged, counted as an empty round, and the loop
    /// keeps going. The view is left open either way; the caller owns its
    /// lifecycle and must close it on every path.
    pub async fn collect<V>(&self, view: &V, cancel: &CancelToken) -> Result<Harvest, ViewError>
    where
        V: ResultsView + ?Sized,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut links: Vec<String> = Vec::new();
        let mut attempts: u32 = 0;
        let mut stalls: u32 = 0;

        let stop = loop {
            if links.len() >= self.config.target {
                break StopReason::TargetReached;
            }
            if attempts >= self.config.max_attempts {
                break StopReason::Exhausted;
            }
            if cancel.is_cancelled() {
                break StopReason::Cancelled;
            }

            let visible = match view.visible_links().await {
                Ok(batch) => batch,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(attempt = attempts, error = %e, "link extraction failed, treating as empty round");
                    Vec::new()
                }
            };

            let mut fresh = 0usize;
            for link in visible {
                if seen.insert(link.clone()) {
                    links.push(link);
                    fresh += 1;
                }
            }

            if fresh > 0 {
                stalls = 0;
                debug!(
                    fresh,
                    collected = links.len(),
                    target = self.config.target,
                    "new result links"
                );
            } else {
                stalls += 1;
                if stalls >= self.config.stall_budget {
                    break StopReason::Stalled;
                }
            }

            if let Err(e) = view.advance().await {
                if e.is_fatal() {
                    return Err(e);
                }
                warn!(attempt = attempts, error = %e, "scroll advance failed");
            }
            self.delay.pause(self.config.settle).await;
            attempts += 1;
        };

        links.truncate(self.config.target);
        debug!(collected = links.len(), ?stop, attempts, "collection finished");
        Ok(Harvest {
            links,
            stop,
            attempts,
        })
    }
}
