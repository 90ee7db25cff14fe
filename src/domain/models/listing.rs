// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 商家记录
///
/// 从一个详情页抽取出的结构化商家信息。除来源字段外，
/// 每个字段都是独立可选的：抽取不到即为`None`，序列化为`null`。
/// 缺失是数据而不是错误
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    /// 商家名称，缺失时整条记录会被调用方丢弃
    pub name: Option<String>,
    /// 地址
    pub address: Option<String>,
    /// 评分
    pub rating: Option<f64>,
    /// 评论数
    pub review_count: Option<u64>,
    /// 类目
    pub category: Option<String>,
    /// 官网URL
    pub website: Option<String>,
    /// 电话（去除非数字字符后至少10位才会保留）
    pub phone: Option<String>,
    /// 官网探测到的首选邮箱
    pub email: Option<String>,
    /// 官网探测到的备用邮箱
    pub secondary_email: Option<String>,
    /// 官网探测到的额外电话
    pub additional_phones: Vec<String>,
    /// 详情页URL
    pub source_url: String,
    /// 产生该记录的查询
    pub search_query: String,
    /// 是否已访问官网
    pub website_visited: bool,
    /// 抽取时间
    pub scraped_at: DateTime<Utc>,
}

impl ListingRecord {
    /// 创建一条空记录，仅填入来源信息
    pub fn new(source_url: String, search_query: String) -> Self {
        Self {
            name: None,
            address: None,
            rating: None,
            review_count: None,
            category: None,
            website: None,
            phone: None,
            email: None,
            secondary_email: None,
            additional_phones: Vec::new(),
            source_url,
            search_query,
            website_visited: false,
            scraped_at: Utc::now(),
        }
    }

    /// 记录是否带有商家名称
    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }
}
