//! LLM 客户端抽象
//!
//! 所有后端（Anthropic / OpenAI 兼容 / Mock）实现 LlmClient：输入消息列表，输出生成文本或 LlmError。
//! 调用方（编排器）把 LlmError 转成展示给用户的文本，从不向上抛出。

use async_trait::async_trait;
use thiserror::Error;

use super::Message;

/// 生成后端错误
#[derive(Error, Debug)]
pub enum LlmError {
    /// 缺少 API Key（配置错误）
    #[error("Error: {var} not set. Add it to your .env file.")]
    MissingCredential { var: &'static str },

    #[error("Error: request failed: {0}")]
    Request(String),

    #[error("Error: API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Error: request timed out after {0}s")]
    Timeout(u64),

    #[error("Error: empty response from model")]
    EmptyResponse,
}

impl LlmError {
    /// 是否为配置错误（用户可通过设置环境变量修复）
    pub fn is_config_error(&self) -> bool {
        matches!(self, LlmError::MissingCredential { .. })
    }
}

/// LLM 客户端 trait：非流式完成
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 后端名称（用于日志）
    fn name(&self) -> &str;

    /// 非流式完成
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;
}
