mod common;
mod http_client;
mod model;
mod optimizer;
mod prompts;
mod ui;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use model::arg::Args;
use model::config::{API_KEY_ENV, Config};
use optimizer::OpenAiClient;
use prompts::{PromptService, SqlitePromptStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let config_path = args
        .config
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let mut config = Config::load(&config_path)
        .with_context(|| format!("加载配置失败: {}", config_path))?;
    if let Some(database) = args.database {
        config.database_path = database;
    }
    tracing::debug!("配置文件: {:?}", config.config_path());

    // 凭据只在启动时解析一次
    let settings = config.openai_settings(std::env::var(API_KEY_ENV).ok());
    let client = http_client::build_client(config.proxy_url.as_deref())?;
    let optimizer = Arc::new(OpenAiClient::new(settings, client));
    tracing::info!(
        "上游: {} (模型: {})",
        optimizer.endpoint(),
        optimizer.model()
    );

    let store = Arc::new(SqlitePromptStore::open(&config.database_path)?);
    tracing::info!("数据库: {}", config.database_path);

    let service = Arc::new(PromptService::new(optimizer, store));

    let app = Router::new()
        .nest("/api", prompts::create_prompts_router(service))
        .merge(ui::create_ui_router())
        .layer(cors_layer(&config.cors_origins));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("监听地址失败: {}", addr))?;
    tracing::info!("启动 HTTP 服务: http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// CORS 中间层
///
/// 只允许配置中的前端来源，方法和请求头不限制
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("忽略无效的 CORS 来源: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
