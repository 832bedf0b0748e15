//! Prompt 记录模块
//!
//! 提供改写并保存、列表查询、按 ID 查询，以及对应的 HTTP API

mod error;
mod handlers;
pub mod model;
mod router;
mod service;
pub mod store;
mod types;

pub use router::create_prompts_router;
pub use service::PromptService;
pub use store::SqlitePromptStore;
