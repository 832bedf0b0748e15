//! Prompt 改写模块
//!
//! 调用上游 Chat Completions 接口改写 prompt，上游不可用时降级为本地 fallback 文本

mod client;
pub mod types;

pub use client::OpenAiClient;
