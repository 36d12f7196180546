//! DeepSeek API 客户端（OpenAI 兼容格式）
//!
//! DeepSeek 提供与 OpenAI 完全兼容的 API 接口。
//! - Base URL: https://api.deepseek.com
//! - 默认模型: deepseek-chat，可通过配置或 `DEEPSEEK_MODEL` 改用其他模型

use crate::llm::OpenAiClient;

/// DeepSeek API 常量
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const DEEPSEEK_CHAT: &str = "deepseek-chat";
pub const DEEPSEEK_API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

/// 创建 DeepSeek 客户端
///
/// - 使用环境变量 `DEEPSEEK_API_KEY`；未设置时调用返回 MissingCredential
/// - 模型可通过 `model` 参数或 `DEEPSEEK_MODEL` 环境变量指定，默认 `deepseek-chat`
pub fn create_deepseek_client(model: Option<&str>) -> OpenAiClient {
    let api_key = std::env::var(DEEPSEEK_API_KEY_VAR).ok();

    let model = model
        .map(String::from)
        .or_else(|| std::env::var("DEEPSEEK_MODEL").ok())
        .unwrap_or_else(|| DEEPSEEK_CHAT.to_string());

    // 显式传入空串，避免回落到 OPENAI_API_KEY
    OpenAiClient::new(
        Some(DEEPSEEK_BASE_URL),
        &model,
        Some(api_key.as_deref().unwrap_or("")),
    )
    .with_key_var(DEEPSEEK_API_KEY_VAR)
}
