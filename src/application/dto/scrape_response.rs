// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::listing::ListingRecord;
use crate::domain::services::scrape_service::ScrapeOutcome;
use serde::Serialize;

/// 抓取响应数据传输对象
#[derive(Debug, Serialize)]
pub struct ScrapeResponseDto {
    /// 请求是否成功
    pub success: bool,
    /// 商家记录列表
    pub data: Vec<ListingRecord>,
    /// 记录总数
    pub total_results: usize,
    /// 结果说明
    pub message: String,
}

impl From<ScrapeOutcome> for ScrapeResponseDto {
    fn from(outcome: ScrapeOutcome) -> Self {
        Self {
            success: true,
            total_results: outcome.records.len(),
            message: outcome.message,
            data: outcome.records,
        }
    }
}
