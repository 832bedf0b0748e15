//! 上游 Chat Completions 客户端

use std::time::Instant;

use reqwest::Client;

use crate::common::truncate_with_ellipsis;
use crate::model::config::OpenAiSettings;

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// 降级结果前缀，调用方据此识别 fallback
pub const FALLBACK_PREFIX: &str = "[fallback]";

/// 引导上游只改写、不回答的系统指令
const SYSTEM_INSTRUCTION: &str = "You are a prompt optimization assistant. Rewrite the user's prompt to be clear, specific, and constrained, preserving intent. Do not answer the prompt, only rewrite it.";

/// 固定采样温度
const TEMPERATURE: f32 = 0.3;

/// 写入 fallback 文本的上游错误体最大字节数
const MAX_ERROR_BODY_BYTES: usize = 2000;

/// Prompt 改写客户端
///
/// `optimize` 永远返回字符串：上游失败时返回带 `[fallback]` 前缀的降级文本，
/// 上游成功但没有内容时原样返回输入
pub struct OpenAiClient {
    client: Client,
    settings: OpenAiSettings,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings, client: Client) -> Self {
        if settings.api_key.is_empty() {
            tracing::warn!("未配置 API 密钥，上游请求将鉴权失败并走 fallback");
        }
        Self { client, settings }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    /// 改写 prompt
    pub async fn optimize(&self, original_prompt: &str) -> String {
        let request = ChatCompletionRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(original_prompt),
            ],
            temperature: TEMPERATURE,
        };

        #[cfg(feature = "sensitive-logs")]
        tracing::debug!(
            body = %serde_json::to_string(&request).unwrap_or_default(),
            "上游请求体"
        );

        let started = Instant::now();
        let mut builder = self.client.post(&self.settings.endpoint).json(&request);
        if !self.settings.api_key.is_empty() {
            builder = builder.bearer_auth(&self.settings.api_key);
        }

        let response = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("上游请求发送失败，使用 fallback: {}", e);
                return fallback(original_prompt, &format!("request failed - {}", e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            // 错误体读取失败时按空处理，保留状态码
            let body = response.text().await.unwrap_or_default();

            #[cfg(feature = "sensitive-logs")]
            tracing::debug!(status = %status, body = %body, "上游错误响应体");

            tracing::warn!(status = %status, "上游返回错误状态，使用 fallback");
            let problem = truncate_with_ellipsis(&body, MAX_ERROR_BODY_BYTES);
            return fallback(original_prompt, &format!("{} - {}", status, problem));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("读取上游响应失败，使用 fallback: {}", e);
                return fallback(original_prompt, &format!("request failed - {}", e));
            }
        };

        #[cfg(feature = "sensitive-logs")]
        tracing::debug!(status = %status, body = %body, "上游响应体");

        let parsed: ChatCompletionResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("上游响应不是有效 JSON，使用 fallback: {}", e);
                return fallback(original_prompt, &format!("invalid response - {}", e));
            }
        };

        match parsed.first_content() {
            Some(content) => {
                tracing::debug!(
                    model = %self.settings.model,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "prompt 改写完成"
                );
                content.to_string()
            }
            None => {
                tracing::debug!("上游响应没有消息内容，原样返回输入");
                original_prompt.to_string()
            }
        }
    }
}

/// 构造降级文本
fn fallback(original_prompt: &str, detail: &str) -> String {
    format!(
        "{} Improve and clarify: {}\n\n(API error: {})",
        FALLBACK_PREFIX, original_prompt, detail
    )
}
