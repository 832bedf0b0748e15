use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 上游 Chat Completions 服务的连接参数
///
/// 启动时由 [`Config::openai_settings`] 一次性解析，之后注入到客户端，
/// 请求处理过程中不再读取环境变量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    /// Chat Completions 端点
    pub endpoint: String,
    /// 模型标识
    pub model: String,
    /// Bearer 凭据（空字符串表示不发送 Authorization 头）
    pub api_key: String,
}

/// Prompt Optimizer 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// 上游 Chat Completions 端点
    #[serde(default = "default_openai_endpoint")]
    pub openai_endpoint: String,

    /// 用于改写 prompt 的模型
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// API 密钥（可选，未配置时回退到环境变量 OPENAI_API_KEY）
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// SQLite 数据库文件路径（支持 ":memory:"）
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// 允许跨域访问的前端来源
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// HTTP 代理地址（可选）
    /// 支持格式: http://host:port, https://host:port, socks5://host:port
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// 配置文件路径（运行时元数据，不从 JSON 读取）
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

/// 环境变量中的 API 密钥名
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_database_path() -> String {
    "prompts.db".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            openai_endpoint: default_openai_endpoint(),
            openai_model: default_openai_model(),
            openai_api_key: None,
            database_path: default_database_path(),
            cors_origins: default_cors_origins(),
            proxy_url: None,
            config_path: None,
        }
    }
}

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置
            let mut config = Self::default();
            config.config_path = Some(path.to_path_buf());
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// 获取配置文件路径（如果有）
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// 解析上游连接参数
    ///
    /// 凭据优先使用配置文件中的 openaiApiKey，其次是 `env_api_key`
    /// （通常来自 OPENAI_API_KEY），都没有时为空字符串。
    /// 空白值视为未配置。
    pub fn openai_settings(&self, env_api_key: Option<String>) -> OpenAiSettings {
        let api_key = self
            .openai_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or(env_api_key.filter(|k| !k.trim().is_empty()))
            .unwrap_or_default();

        OpenAiSettings {
            endpoint: self.openai_endpoint.clone(),
            model: self.openai_model.clone(),
            api_key,
        }
    }
}
