//! Prompt API 请求/响应类型

use serde::{Deserialize, Serialize};

use super::model::PromptRecord;

/// POST /api/prompts/optimize 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizePromptRequest {
    /// 缺失时按空白输入处理，由处理器返回 400
    #[serde(default)]
    pub original_prompt: Option<String>,
}

/// 单条 prompt 记录响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResponse {
    pub id: i64,
    pub original_prompt: String,
    pub optimized_prompt: String,
    /// RFC3339 格式
    pub created_at: String,
}

impl From<PromptRecord> for PromptResponse {
    fn from(record: PromptRecord) -> Self {
        Self {
            id: record.id,
            original_prompt: record.original_prompt,
            optimized_prompt: record.optimized_prompt,
            created_at: record.created_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        }
    }
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                error_type: error_type.into(),
                message: message.into(),
            },
        }
    }
}
