//! 单次查询的状态机阶段
//!
//! LoadRegistry → Match → Decide →（接受）LoadSkill → Generate → Done；
//! Decide 拒绝或 LoadSkill 失败时直接进入 Done。

use std::fmt;

use serde::Serialize;

/// 查询处理阶段（用于日志与事件）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPhase {
    LoadRegistry,
    Match,
    Decide,
    LoadSkill,
    Generate,
    Done,
}

impl QueryPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryPhase::LoadRegistry => "load_registry",
            QueryPhase::Match => "match",
            QueryPhase::Decide => "decide",
            QueryPhase::LoadSkill => "load_skill",
            QueryPhase::Generate => "generate",
            QueryPhase::Done => "done",
        }
    }
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
