// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    application::dto::{scrape_request::ScrapeRequestDto, scrape_response::ScrapeResponseDto},
    config::settings::Settings,
    domain::{
        collector::CancelToken,
        services::{
            scrape_service::{ScrapeService, ScrapeServiceError},
            website_probe::WebsiteProbe,
        },
    },
    engines::traits::MapsBrowser,
};

/// 处理抓取请求
///
/// # 参数
///
/// * `engine` - 地图浏览器引擎实例
/// * `probe` - 网站联系方式探测器实例
/// * `settings` - 应用配置
/// * `cancel` - 关停取消令牌
/// * `payload` - 抓取请求数据
///
/// # 返回值
///
/// 返回实现了 `IntoResponse` 的响应，包含商家记录或错误信息
///
/// # 错误
///
/// 可能在以下情况下返回错误响应：
/// - 请求参数验证失败
/// - 抓取档位名称未知
/// - 浏览器会话失败且没有任何结果
pub async fn scrape<E>(
    Extension(engine): Extension<Arc<E>>,
    Extension(probe): Extension<Arc<WebsiteProbe>>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(cancel): Extension<CancelToken>,
    Json(payload): Json<ScrapeRequestDto>,
) -> impl IntoResponse
where
    E: MapsBrowser + 'static,
{
    let service = ScrapeService::new(engine, probe, settings);
    match service.scrape(payload, cancel).await {
        Ok(outcome) => (StatusCode::OK, Json(ScrapeResponseDto::from(outcome))).into_response(),
        Err(e) => {
            let (status, msg): (StatusCode, String) = e.into();
            (status, Json(json!({ "success": false, "error": msg }))).into_response()
        }
    }
}

impl From<ScrapeServiceError> for (StatusCode, String) {
    fn from(err: ScrapeServiceError) -> Self {
        match err {
            ScrapeServiceError::ValidationError(details) => (StatusCode::BAD_REQUEST, details),
            ScrapeServiceError::UnknownProfile(name) => (
                StatusCode::BAD_REQUEST,
                format!("Unknown scrape profile: {}", name),
            ),
            ScrapeServiceError::Session(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        }
    }
}
