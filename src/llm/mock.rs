//! Mock LLM 客户端（用于测试与离线演示，无需 API）
//!
//! 回显技能说明的首行与用户查询，便于本地跑通整个路由流程。

use async_trait::async_trait;

use super::{last_user_content, LlmClient, LlmError, Message, Role};

/// Mock 客户端：回显 system 首行与最后一条 User 消息
#[derive(Debug, Default)]
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let skill_line = messages
            .iter()
            .find(|m| m.role == Role::System)
            .and_then(|m| m.content.lines().find(|l| !l.trim().is_empty()))
            .unwrap_or("(no skill)");
        let query = last_user_content(messages).unwrap_or("(no input)");

        Ok(format!("[mock] {}\n{}", skill_line.trim(), query))
    }
}
