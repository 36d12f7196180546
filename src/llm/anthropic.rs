//! Anthropic Messages API 客户端
//!
//! 直接以 reqwest 调用 `POST {base_url}/v1/messages`：
//! System 消息合并进顶层 `system` 字段，其余消息按顺序放入 `messages`，返回所有 text 块拼接后的文本。

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{LlmClient, LlmError, Message, Role};

/// Anthropic API 常量
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

/// Anthropic 客户端；未设置 API Key 时仍可创建，调用时返回 MissingCredential
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_tokens: u32,
    timeout_secs: u64,
}

impl AnthropicClient {
    /// api_key 为 None 时读取环境变量 `ANTHROPIC_API_KEY`
    pub fn new(
        base_url: Option<&str>,
        model: &str,
        api_key: Option<&str>,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var(ANTHROPIC_API_KEY_VAR).ok())
            .filter(|k| !k.trim().is_empty());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client ({}), using defaults", e);
                reqwest::Client::new()
            });

        Self {
            client,
            api_key,
            model: model.to_string(),
            base_url: base_url
                .unwrap_or(ANTHROPIC_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            max_tokens,
            timeout_secs,
        }
    }

    fn request_body(&self, messages: &[Message]) -> Value {
        let (system, messages) = to_anthropic_messages(messages);
        let mut body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": messages,
        });
        if let Some(system) = system {
            body["system"] = Value::String(system);
        }
        body
    }
}

/// 拆分出 system 文本（多条以空行连接）与对话消息
fn to_anthropic_messages(messages: &[Message]) -> (Option<String>, Vec<Value>) {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let conversation = messages
        .iter()
        .filter_map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => return None,
            };
            Some(json!({ "role": role, "content": m.content }))
        })
        .collect();

    let system = (!system.is_empty()).then(|| system.join("\n\n"));
    (system, conversation)
}

/// 拼接响应中的 text 块
fn extract_text(resp: &Value) -> Option<String> {
    resp["content"]
        .as_array()?
        .iter()
        .filter(|b| b["type"].as_str() == Some("text"))
        .filter_map(|b| b["text"].as_str())
        .map(String::from)
        .reduce(|a, b| a + &b)
}

#[async_trait]
impl LlmClient for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential {
            var: ANTHROPIC_API_KEY_VAR,
        })?;

        let body = self.request_body(messages);
        tracing::debug!(model = %self.model, messages = messages.len(), "anthropic request");

        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::Request(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "anthropic API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let resp: Value = resp
            .json()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        if let Some(usage) = resp.get("usage") {
            tracing::debug!(
                input_tokens = usage["input_tokens"].as_u64().unwrap_or(0),
                output_tokens = usage["output_tokens"].as_u64().unwrap_or(0),
                "anthropic usage"
            );
        }

        extract_text(&resp).ok_or(LlmError::EmptyResponse)
    }
}
