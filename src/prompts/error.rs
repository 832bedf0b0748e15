//! Prompt 服务错误类型

use std::fmt;

use axum::http::StatusCode;

use super::types::ErrorResponse;

/// Prompt 服务错误
#[derive(Debug)]
pub enum PromptServiceError {
    /// 请求参数无效
    InvalidRequest(String),
    /// 记录不存在
    NotFound(i64),
    /// 存储层失败
    Storage(anyhow::Error),
}

impl fmt::Display for PromptServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptServiceError::InvalidRequest(msg) => write!(f, "{}", msg),
            PromptServiceError::NotFound(id) => write!(f, "Prompt #{} not found.", id),
            PromptServiceError::Storage(e) => write!(f, "Storage failure: {}", e),
        }
    }
}

impl std::error::Error for PromptServiceError {}

impl From<anyhow::Error> for PromptServiceError {
    fn from(e: anyhow::Error) -> Self {
        PromptServiceError::Storage(e)
    }
}

impl PromptServiceError {
    /// 获取对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            PromptServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PromptServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            PromptServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 转换为 API 错误响应
    pub fn into_response(self) -> ErrorResponse {
        let error_type = match &self {
            PromptServiceError::InvalidRequest(_) => "invalid_request_error",
            PromptServiceError::NotFound(_) => "not_found_error",
            PromptServiceError::Storage(_) => "internal_error",
        };
        ErrorResponse::new(error_type, self.to_string())
    }
}
