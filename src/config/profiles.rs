// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 抓取档位预设。
//!
//! 每个档位是一组经过实测调校的节奏参数，决定滚动耐心与等待
//! 时长之间的取舍。配置文件可以覆盖单项参数而不必放弃档位。

use super::settings::ScrapeSettings;
use crate::domain::collector::{CollectorConfig, DelayRange};

/// 一组抓取节奏参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeProfile {
    /// 结果列表滚动尝试次数上限
    pub scroll_attempts: u32,
    /// 连续无新链接轮数上限，超过即判定列表耗尽
    pub stall_budget: u32,
    /// 搜索页加载后的等待区间
    pub search_settle: DelayRange,
    /// 每次滚动后的等待区间
    pub scroll_settle: DelayRange,
    /// 详情页加载后的等待区间
    pub listing_settle: DelayRange,
    /// 相邻详情页之间的间隔区间
    pub listing_pause: DelayRange,
    /// 详情页抓取并发数
    pub detail_concurrency: usize,
}

impl ScrapeProfile {
    /// Default profile. Human-ish pacing, sequential detail visits.
    pub const fn balanced() -> Self {
        Self {
            scroll_attempts: 25,
            stall_budget: 5,
            search_settle: DelayRange::new(6_000, 8_000),
            scroll_settle: DelayRange::new(4_000, 6_000),
            listing_settle: DelayRange::new(2_000, 4_000),
            listing_pause: DelayRange::new(1_000, 2_000),
            detail_concurrency: 1,
        }
    }

    /// Speed over stealth. Minimal waits, aggressive concurrency.
    pub const fn lightning() -> Self {
        Self {
            scroll_attempts: 80,
            stall_budget: 15,
            search_settle: DelayRange::new(2_500, 3_500),
            scroll_settle: DelayRange::new(100, 200),
            listing_settle: DelayRange::new(800, 1_200),
            listing_pause: DelayRange::new(50, 100),
            detail_concurrency: 4,
        }
    }

    /// Exhaustive collection for large result sets.
    pub const fn thorough() -> Self {
        Self {
            scroll_attempts: 300,
            stall_budget: 50,
            search_settle: DelayRange::new(3_000, 5_000),
            scroll_settle: DelayRange::new(800, 1_500),
            listing_settle: DelayRange::new(1_500, 3_500),
            listing_pause: DelayRange::new(300, 800),
            detail_concurrency: 2,
        }
    }

    /// 按名称查找档位，未知名称返回 `None`。
    pub fn named(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "balanced" => Some(Self::balanced()),
            "lightning" => Some(Self::lightning()),
            "thorough" => Some(Self::thorough()),
            _ => None,
        }
    }

    /// 应用配置中的单项覆盖。
    pub fn apply_overrides(&mut self, settings: &ScrapeSettings) {
        if let Some(attempts) = settings.scroll_attempts {
            self.scroll_attempts = attempts;
        }
        if let Some(budget) = settings.stall_budget {
            self.stall_budget = budget;
        }
        if let Some(concurrency) = settings.detail_concurrency {
            self.detail_concurrency = concurrency;
        }
        if let Some(settle) = settings.scroll_settle {
            self.scroll_settle = settle;
        }
    }

    /// 将档位换算成链接采集器配置。
    pub fn collector_config(&self, target: usize) -> CollectorConfig {
        CollectorConfig {
            target,
            max_attempts: self.scroll_attempts,
            stall_budget: self.stall_budget,
            settle: self.scroll_settle,
        }
    }
}
