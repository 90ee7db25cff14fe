// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::collector::delay::DelayRange;
use async_trait::async_trait;
use thiserror::Error;

/// 浏览器视图错误类型
#[derive(Error, Debug)]
pub enum ViewError {
    /// 元素查找失败
    #[error("Element lookup failed: {0}")]
    Lookup(String),
    /// 页面交互失败
    #[error("Page interaction failed: {0}")]
    Evaluation(String),
    /// 导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 页面被目标站点拦截
    #[error("Page blocked by target site: {0}")]
    Blocked(String),
    /// 浏览器会话丢失
    #[error("Browser session lost: {0}")]
    SessionLost(String),
    /// 超时
    #[error("Operation timed out")]
    Timeout,
}

impl ViewError {
    /// 判断错误是否致命
    ///
    /// 致命错误会中止整个采集运行；非致命错误按一次空结果处理，
    /// 由调用方继续推进
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ViewError::Navigation(_) | ViewError::Blocked(_) | ViewError::SessionLost(_)
        )
    }
}

/// 商家详情页快照
///
/// 详情页在设置的等待时间后捕获的完整HTML，字段抽取在快照上同步完成
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    /// 详情页URL
    pub url: String,
    /// 页面HTML内容
    pub html: String,
}

/// 可滚动结果视图特质
///
/// 对搜索结果列表的最小抽象：读取当前可见的结果链接，
/// 推进一次滚动，以及在所有退出路径上释放底层页面
#[async_trait]
pub trait ResultsView: Send + Sync {
    /// 提取当前视图中可见的结果链接
    async fn visible_links(&self) -> Result<Vec<String>, ViewError>;

    /// 推进一次滚动动作
    async fn advance(&self) -> Result<(), ViewError>;

    /// 关闭视图并释放底层页面
    async fn close(self: Box<Self>) -> Result<(), ViewError>;
}

/// 地图浏览器引擎特质
#[async_trait]
pub trait MapsBrowser: Send + Sync {
    /// 为一次查询打开搜索结果视图
    ///
    /// 返回的视图由调用方负责关闭
    async fn open_results(
        &self,
        query: &str,
        settle: DelayRange,
    ) -> Result<Box<dyn ResultsView>, ViewError>;

    /// 打开一个商家详情页并捕获快照
    ///
    /// 实现内部负责页面的创建与释放
    async fn fetch_listing(&self, url: &str, settle: DelayRange)
        -> Result<ListingSnapshot, ViewError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
