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

use crate::domain::collector::DelayRange;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、浏览器引擎、抓取行为与网站探测等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 浏览器引擎配置
    pub browser: BrowserSettings,
    /// 抓取行为配置
    pub scrape: ScrapeSettings,
    /// 网站联系方式探测配置
    pub probe: ProbeSettings,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 浏览器引擎配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 引擎类型 (chromium, stub)
    pub engine: String,
    /// 远程调试地址 (可选，设置后连接已有浏览器而非本地启动)
    pub remote_debugging_url: Option<String>,
    /// CDP 请求超时时间（秒）
    pub request_timeout_secs: u64,
}

/// 抓取行为配置设置
///
/// 可选项覆盖所选档位的对应参数，未设置时使用档位默认值
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeSettings {
    /// 默认抓取档位 (balanced, lightning, thorough)
    pub default_profile: String,
    /// 请求未指定时的默认结果数
    pub default_max_results: u32,
    /// 单次请求结果数上限
    pub max_results_cap: u32,
    /// 是否通过查询变体扩大覆盖范围
    pub expand_coverage: bool,
    /// 滚动尝试次数上限（覆盖档位值）
    pub scroll_attempts: Option<u32>,
    /// 连续无增长轮数上限（覆盖档位值）
    pub stall_budget: Option<u32>,
    /// 详情页并发数（覆盖档位值）
    pub detail_concurrency: Option<usize>,
    /// 滚动后等待区间（覆盖档位值）
    pub scroll_settle: Option<DelayRange>,
}

/// 网站联系方式探测配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeSettings {
    /// HTTP 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 响应体读取上限（字节）
    pub max_body_bytes: usize,
    /// 请求使用的 User-Agent
    pub user_agent: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default browser settings
            .set_default("browser.engine", "chromium")?
            .set_default("browser.request_timeout_secs", 30)?
            // Default scrape settings
            .set_default("scrape.default_profile", "balanced")?
            .set_default("scrape.default_max_results", 100)?
            .set_default("scrape.max_results_cap", 500)?
            .set_default("scrape.expand_coverage", false)?
            // Default probe settings
            .set_default("probe.timeout_secs", 10)?
            .set_default("probe.max_body_bytes", 262_144)?
            .set_default(
                "probe.user_agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            )?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("MAPLEADS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
