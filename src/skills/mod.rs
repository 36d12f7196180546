//! 技能系统
//!
//! 技能（Skill）是一份指导 LLM 处理某类请求的说明文档。
//! 注册表列出所有技能的触发词与领域，匹配器据此为查询挑选技能，加载器读取技能说明全文。
//!
//! 目录结构：
//! ```text
//! skills-builder/
//! ├── registry.md         # 技能注册表（### name + **Label**: value）
//! └── skills/
//!     ├── scraper/
//!     │   └── SKILL.md    # 技能说明（作为 system prompt）
//!     └── ...
//! ```

mod loader;
mod matcher;
mod registry;

pub use loader::{SkillLoader, SKILL_FILE};
pub use matcher::{
    DomainKeywords, MatchResult, SkillMatcher, DOMAIN_WEIGHT, PHRASE_WEIGHT, WORD_WEIGHT,
};
pub use registry::{load_registry, parse_registry, SkillRecord};
