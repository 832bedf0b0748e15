//! Prompt API 路由

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{get_prompt, get_prompts, optimize_prompt};
use super::service::PromptService;

/// Prompt API 状态
#[derive(Clone)]
pub struct PromptsState {
    pub service: Arc<PromptService>,
}

/// 创建 Prompt API 路由
///
/// # 端点
/// - `GET /prompts` - 获取全部记录（最新在前）
/// - `GET /prompts/{id}` - 按 ID 获取记录
/// - `POST /prompts/optimize` - 改写并保存 prompt
///
/// 返回 Router<()>，可直接 nest 到主应用
pub fn create_prompts_router(service: Arc<PromptService>) -> Router {
    let state = PromptsState { service };

    Router::new()
        .route("/prompts", get(get_prompts))
        .route("/prompts/optimize", post(optimize_prompt))
        .route("/prompts/{id}", get(get_prompt))
        .with_state(state)
}
