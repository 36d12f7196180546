//! 路由过程事件：供交互界面实时展示注册表加载、匹配、技能加载与生成进度

use serde::Serialize;

/// 单步过程事件（可序列化为 JSON 供前端展示）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouterEvent {
    /// 注册表已解析
    RegistryLoaded { count: usize },
    /// 注册表不存在或不可读（按空目录继续）
    RegistryUnavailable { reason: String },
    /// 开始匹配
    Matching { query: String },
    /// 匹配成功（分数达到阈值）
    Matched {
        skill: String,
        score: u32,
        domain: Option<String>,
        /// 前几个触发词
        triggers: Vec<String>,
    },
    /// 没有技能达到阈值
    NoMatch { best_score: u32 },
    /// 正在读取技能说明
    LoadingSkill { path: String },
    /// 技能说明已读取
    SkillLoaded { chars: usize },
    /// 技能说明读取失败
    SkillLoadFailed { reason: String },
    /// 技能需要浏览器自动化
    BrowserRequired { skill: String },
    /// 正在调用生成后端
    Generating { backend: String },
    /// 生成结束
    Generated,
    /// 生成后端报错（缺 Key、HTTP 错误等）
    BackendError { text: String },
}

impl RouterEvent {
    /// 渲染为终端展示的文本（可多行）
    pub fn render(&self) -> String {
        match self {
            RouterEvent::RegistryLoaded { count } => format!("📋 Loading registry...\n   Found {count} skills"),
            RouterEvent::RegistryUnavailable { reason } => format!("❌ {reason}"),
            RouterEvent::Matching { query } => format!("🎯 Matching query: \"{query}\""),
            RouterEvent::Matched {
                skill,
                score,
                domain,
                triggers,
            } => format!(
                "   ✅ Matched: {skill} (score: {score})\n   📁 Domain: {}\n   🔑 Triggers: {}",
                domain.as_deref().unwrap_or("unknown"),
                triggers.join(", ")
            ),
            RouterEvent::NoMatch { best_score } => format!(
                "   ❌ No skill matched (best score: {best_score})\n   → Using general capabilities"
            ),
            RouterEvent::LoadingSkill { path } => format!("📖 Loading skill: {path}"),
            RouterEvent::SkillLoaded { chars } => format!("   ✅ Loaded ({chars} chars)"),
            RouterEvent::SkillLoadFailed { reason } => format!("   ❌ {reason}"),
            RouterEvent::BrowserRequired { skill } => {
                format!("🌐 Note: {skill} requires browser automation (web-tools)")
            }
            RouterEvent::Generating { backend } => format!("🤖 Generating with {backend}..."),
            RouterEvent::Generated => "📤 OUTPUT".to_string(),
            RouterEvent::BackendError { text } => format!("   ❌ {text}"),
        }
    }
}
