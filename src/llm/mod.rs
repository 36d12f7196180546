//! LLM 层：生成后端抽象与实现（Anthropic / OpenAI 兼容 / DeepSeek / Mock）

pub mod anthropic;
pub mod deepseek;
pub mod message;
pub mod mock;
pub mod openai;
pub mod traits;

pub use anthropic::{AnthropicClient, ANTHROPIC_API_KEY_VAR, DEFAULT_ANTHROPIC_MODEL};
pub use deepseek::{create_deepseek_client, DEEPSEEK_CHAT};
pub use message::{last_user_content, Message, Role};
pub use mock::MockLlmClient;
pub use openai::OpenAiClient;
pub use traits::{LlmClient, LlmError};
