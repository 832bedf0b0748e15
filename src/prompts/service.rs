//! Prompt 业务逻辑服务

use std::sync::Arc;

use crate::common::truncate_chars_with_ellipsis;
use crate::optimizer::OpenAiClient;

use super::error::PromptServiceError;
use super::model::NewPrompt;
use super::store::PromptRepository;
use super::types::PromptResponse;

/// 改写结果的最大字符数（超出部分截断）
pub const MAX_OPTIMIZED_PROMPT_CHARS: usize = 8000;

/// Prompt 服务
///
/// 组合改写客户端与存储：改写并保存、列表查询、按 ID 查询
pub struct PromptService {
    optimizer: Arc<OpenAiClient>,
    repository: Arc<dyn PromptRepository>,
}

impl PromptService {
    pub fn new(optimizer: Arc<OpenAiClient>, repository: Arc<dyn PromptRepository>) -> Self {
        Self {
            optimizer,
            repository,
        }
    }

    /// 改写 prompt 并保存
    ///
    /// 输入校验由调用方负责。无论上游成功还是走 fallback，每次调用都写入一条记录；
    /// 写入失败直接返回错误，不重试
    pub async fn optimize_and_save(
        &self,
        original_prompt: String,
    ) -> Result<PromptResponse, PromptServiceError> {
        let optimized = self.optimizer.optimize(&original_prompt).await;
        let optimized_prompt = truncate_chars_with_ellipsis(&optimized, MAX_OPTIMIZED_PROMPT_CHARS);

        let repository = self.repository.clone();
        let new_prompt = NewPrompt {
            original_prompt,
            optimized_prompt,
        };
        let record = tokio::task::spawn_blocking(move || repository.insert(new_prompt))
            .await
            .map_err(anyhow::Error::from)?
            .map_err(|e| {
                tracing::error!("保存 prompt 记录失败: {:#}", e);
                PromptServiceError::Storage(e)
            })?;

        tracing::info!(id = record.id, "prompt 已改写并保存");
        Ok(record.into())
    }

    /// 获取全部记录（最新在前）
    pub async fn list_all(&self) -> Result<Vec<PromptResponse>, PromptServiceError> {
        let repository = self.repository.clone();
        let records = tokio::task::spawn_blocking(move || repository.list_all())
            .await
            .map_err(anyhow::Error::from)?
            .map_err(|e| {
                tracing::error!("查询 prompt 列表失败: {:#}", e);
                PromptServiceError::Storage(e)
            })?;
        Ok(records.into_iter().map(PromptResponse::from).collect())
    }

    /// 按 ID 获取记录
    pub async fn get_by_id(&self, id: i64) -> Result<PromptResponse, PromptServiceError> {
        let repository = self.repository.clone();
        let record = tokio::task::spawn_blocking(move || repository.get_by_id(id))
            .await
            .map_err(anyhow::Error::from)?
            .map_err(|e| {
                tracing::error!(id, "查询 prompt 记录失败: {:#}", e);
                PromptServiceError::Storage(e)
            })?;
        record
            .map(PromptResponse::from)
            .ok_or(PromptServiceError::NotFound(id))
    }
}
