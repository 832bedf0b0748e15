//! Prompt 记录数据模型

use chrono::{DateTime, Utc};

/// 已持久化的 prompt 记录
///
/// `id` 和 `created_at` 由存储层在插入时分配，记录只追加、不修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub id: i64,
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub created_at: DateTime<Utc>,
}

/// 待插入的 prompt 记录
#[derive(Debug, Clone)]
pub struct NewPrompt {
    pub original_prompt: String,
    pub optimized_prompt: String,
}
