//! 路由器错误类型
//!
//! 所有错误都在检测到它的组件边界被处理：注册表缺失降级为空目录，技能文档缺失只中止当前查询。

use std::path::PathBuf;

use thiserror::Error;

/// 注册表解析、技能加载与配置过程中可能出现的错误
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Registry not found: {}", .0.display())]
    RegistryNotFound(PathBuf),

    #[error("Failed to read registry {}: {source}", path.display())]
    RegistryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Skill file not found: {}", .0.display())]
    SkillNotFound(PathBuf),

    #[error("Skill file is empty: {}", .0.display())]
    SkillEmpty(PathBuf),

    #[error("Failed to read skill file {}: {source}", path.display())]
    SkillRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl RouterError {
    /// 是否为「文件不存在」类错误（区别于读取失败）
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RouterError::RegistryNotFound(_) | RouterError::SkillNotFound(_)
        )
    }
}

impl From<config::ConfigError> for RouterError {
    fn from(e: config::ConfigError) -> Self {
        RouterError::Config(e.to_string())
    }
}
