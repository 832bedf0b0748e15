//! Prompt API 处理器

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Json},
};

use super::error::PromptServiceError;
use super::router::PromptsState;
use super::types::OptimizePromptRequest;

/// 原始 prompt 的最大字符数
pub const MAX_ORIGINAL_PROMPT_CHARS: usize = 4000;

/// GET /api/prompts
pub async fn get_prompts(State(state): State<PromptsState>) -> impl IntoResponse {
    match state.service.list_all().await {
        Ok(response) => Json(response).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// GET /api/prompts/{id}
pub async fn get_prompt(
    State(state): State<PromptsState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.service.get_by_id(id).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// POST /api/prompts/optimize
pub async fn optimize_prompt(
    State(state): State<PromptsState>,
    payload: Result<Json<OptimizePromptRequest>, JsonRejection>,
) -> impl IntoResponse {
    // 请求体格式错误（非 JSON、类型不符、缺少 Content-Type）统一按 400 处理
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            let e = PromptServiceError::InvalidRequest(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ));
            return (e.status_code(), Json(e.into_response())).into_response();
        }
    };

    let original_prompt = match validate_original_prompt(payload.original_prompt) {
        Ok(p) => p,
        Err(e) => return (e.status_code(), Json(e.into_response())).into_response(),
    };

    match state.service.optimize_and_save(original_prompt).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => (e.status_code(), Json(e.into_response())).into_response(),
    }
}

/// 校验原始 prompt：必填、非空白、不超过长度上限
///
/// 通过时原样返回输入（不做 trim）
fn validate_original_prompt(prompt: Option<String>) -> Result<String, PromptServiceError> {
    let prompt = prompt.unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(PromptServiceError::InvalidRequest(
            "originalPrompt is required.".to_string(),
        ));
    }
    if prompt.chars().count() > MAX_ORIGINAL_PROMPT_CHARS {
        return Err(PromptServiceError::InvalidRequest(format!(
            "originalPrompt must be at most {} characters.",
            MAX_ORIGINAL_PROMPT_CHARS
        )));
    }
    Ok(prompt)
}
