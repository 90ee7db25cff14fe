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

use axum::Extension;
use mapleads::config::settings::Settings;
use mapleads::domain::collector::CancelToken;
use mapleads::domain::services::website_probe::WebsiteProbe;
use mapleads::engines::chromium::ChromiumEngine;
use mapleads::engines::stub::StubBrowser;
use mapleads::engines::traits::MapsBrowser;
use mapleads::presentation::routes;
use mapleads::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting mapleads...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Initialize the website contact probe
    let probe = Arc::new(WebsiteProbe::new(&settings.probe)?);

    // 4. Create the cancel token wired into graceful shutdown
    let cancel = CancelToken::default();

    // 5. Select the engine and start serving
    match settings.browser.engine.as_str() {
        "stub" => {
            info!("Using stub engine, no browser will be launched");
            serve(Arc::new(StubBrowser::sample()), probe, settings, cancel).await
        }
        _ => {
            serve(
                Arc::new(ChromiumEngine::new(settings.browser.clone())),
                probe,
                settings,
                cancel,
            )
            .await
        }
    }
}

/// 构建路由并运行HTTP服务直到收到关停信号
async fn serve<E>(
    engine: Arc<E>,
    probe: Arc<WebsiteProbe>,
    settings: Arc<Settings>,
    cancel: CancelToken,
) -> anyhow::Result<()>
where
    E: MapsBrowser + 'static,
{
    let app = routes::routes::<E>()
        .layer(Extension(engine))
        .layer(Extension(probe))
        .layer(Extension(settings.clone()))
        .layer(Extension(cancel.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;

    Ok(())
}

/// 等待关停信号并取消所有进行中的抓取
async fn shutdown_signal(cancel: CancelToken) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, cancelling active scrapes");
    cancel.cancel();
}
