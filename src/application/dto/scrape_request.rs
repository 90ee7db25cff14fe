// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 抓取请求数据传输对象
///
/// 封装客户端发起的地图抓取请求参数
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ScrapeRequestDto {
    /// 搜索查询，例如 "coffee shops in seattle"
    #[validate(length(min = 1, message = "Query cannot be empty"))]
    pub query: String,
    /// 期望的结果数，缺省时使用服务端默认值
    #[validate(range(min = 1, max = 500))]
    pub max_results: Option<u32>,
    /// 是否访问商家网站提取邮箱与额外电话
    pub visit_websites: Option<bool>,
    /// 抓取档位 (balanced, lightning, thorough)
    pub profile: Option<String>,
}
