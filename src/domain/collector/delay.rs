// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// 延迟区间（毫秒）
///
/// 描述一次等待的最小和最大时长，具体时长在区间内随机抽取
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DelayRange {
    /// 最小延迟（毫秒）
    pub min_ms: u64,
    /// 最大延迟（毫秒）
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// 在区间内抽取一个时长
    pub fn sample(&self) -> Duration {
        let millis = if self.max_ms > self.min_ms {
            rand::random_range(self.min_ms..=self.max_ms)
        } else {
            self.min_ms
        };
        Duration::from_millis(millis)
    }
}

/// 延迟策略特质
///
/// 将等待行为从采集循环中剥离，便于在测试中替换为零延迟实现
#[async_trait]
pub trait DelayStrategy: Send + Sync {
    async fn pause(&self, range: DelayRange);
}

/// 随机抖动延迟
///
/// 生产环境默认策略，每次在配置区间内随机休眠
pub struct JitterDelay;

#[async_trait]
impl DelayStrategy for JitterDelay {
    async fn pause(&self, range: DelayRange) {
        tokio::time::sleep(range.sample()).await;
    }
}

/// 零延迟策略
///
/// 测试专用，立即返回
pub struct NoDelay;

#[async_trait]
impl DelayStrategy for NoDelay {
    async fn pause(&self, _range: DelayRange) {}
}
