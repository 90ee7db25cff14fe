// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::MapsBrowser;
use crate::presentation::handlers::scrape_handler;
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

/// 创建应用路由
///
/// 路由对引擎类型泛型化，注册时以具体引擎实例化
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes<E>() -> Router
where
    E: MapsBrowser + 'static,
{
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let scrape_routes = Router::new().route("/v1/scrape", post(scrape_handler::scrape::<E>));

    Router::new().merge(public_routes).merge(scrape_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回服务状态与当前时间戳
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
