//! 测试辅助：本地假上游 Chat Completions 服务

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use parking_lot::Mutex;

use crate::model::config::OpenAiSettings;
use crate::optimizer::OpenAiClient;
use crate::prompts::model::{NewPrompt, PromptRecord};
use crate::prompts::store::PromptRepository;

/// 假上游收到的请求
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    body: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// 监听 127.0.0.1 随机端口的假上游，对每个请求返回固定的状态码和响应体
pub struct FakeUpstream {
    pub url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl FakeUpstream {
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            status,
            body: body.into(),
            captured: captured.clone(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(fake_completions))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/v1/chat/completions", addr),
            captured,
        }
    }

    /// 返回给定 content 的成功响应
    pub async fn completing(content: &str) -> Self {
        Self::start(StatusCode::OK, completion_body(content)).await
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().clone()
    }

    /// 指向该假上游的客户端
    pub fn client(&self, api_key: &str) -> OpenAiClient {
        client_for(&self.url, api_key)
    }
}

async fn fake_completions(
    State(state): State<FakeState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let body = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
    state.captured.lock().push(CapturedRequest {
        authorization,
        body,
    });
    (state.status, state.body.clone())
}

/// 构造 Chat Completions 成功响应体
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

/// 一个没有服务监听的地址（连接会被拒绝）
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1/chat/completions", addr)
}

pub fn client_for(endpoint: &str, api_key: &str) -> OpenAiClient {
    OpenAiClient::new(
        OpenAiSettings {
            endpoint: endpoint.to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: api_key.to_string(),
        },
        reqwest::Client::builder().no_proxy().build().unwrap(),
    )
}

/// 原始 TCP 服务：返回状态行和声明 1000 字节的 Content-Length，只写出部分响应体就断开
pub async fn truncated_response_url(status: u16) -> String {
    use tokio::io::AsyncWriteExt;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            read_full_request(&mut socket).await;
            let head = format!(
                "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: 1000\r\n\r\npartial",
                status
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}/v1/chat/completions", addr)
}

/// 读完整个请求（请求头 + Content-Length 声明的请求体），避免未读数据导致连接被 RST
async fn read_full_request(socket: &mut tokio::net::TcpStream) {
    use tokio::io::AsyncReadExt;

    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        data.extend_from_slice(&buf[..n]);

        let Some(head_end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&data[..head_end]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if data.len() >= head_end + 4 + content_length {
            return;
        }
    }
}

/// 所有操作都失败的仓库
pub struct FailingRepository;

impl PromptRepository for FailingRepository {
    fn list_all(&self) -> anyhow::Result<Vec<PromptRecord>> {
        anyhow::bail!("database is locked")
    }

    fn get_by_id(&self, _id: i64) -> anyhow::Result<Option<PromptRecord>> {
        anyhow::bail!("database is locked")
    }

    fn insert(&self, _prompt: NewPrompt) -> anyhow::Result<PromptRecord> {
        anyhow::bail!("database is locked")
    }
}
