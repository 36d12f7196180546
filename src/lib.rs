//! Skill Router - 技能路由器
//!
//! 模块划分：
//! - **cli**: 命令行参数（clap）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、查询阶段、过程事件、查询编排器
//! - **llm**: 生成后端抽象与实现（Anthropic / OpenAI 兼容 / DeepSeek / Mock）
//! - **observability**: tracing 日志初始化
//! - **skills**: 注册表解析、技能匹配、技能说明加载
//! - **ui**: 交互式命令行

pub mod cli;
pub mod config;
pub mod core;
pub mod llm;
pub mod observability;
pub mod skills;
pub mod ui;

pub use crate::core::{Orchestrator, QueryOutcome};
