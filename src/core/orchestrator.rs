//! 查询编排器
//!
//! 每次查询：重新解析注册表 → 打分匹配 → 阈值判定 → 读取技能说明 → 以技能说明为 system prompt 调用 LLM。
//! 注册表缺失、技能文件缺失、LLM 报错都转成 QueryOutcome，不会中断会话。

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::{QueryPhase, RouterEvent};
use crate::llm::{
    create_deepseek_client, AnthropicClient, LlmClient, Message, MockLlmClient, OpenAiClient,
};
use crate::skills::{load_registry, SkillLoader, SkillMatcher, SkillRecord};

/// 接受匹配所需的最低分数：一次整词命中（3）加一个领域关键词（1）即可通过，单独的部分命中（2）不行
pub const MATCH_THRESHOLD: u32 = 4;

/// 进度输出中展示的触发词个数
const MATCHED_TRIGGER_PREVIEW: usize = 5;

pub const NO_MATCH_MESSAGE: &str =
    "No matching skill found. Please try a different query or create a new skill.";
pub const SKILL_LOAD_FAILED_MESSAGE: &str = "Failed to load skill file.";

/// 单次查询的结果；Display 即展示给用户的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// 没有技能达到阈值（正常结果，不是错误）
    NoMatch { best_score: u32 },
    /// 匹配成功但技能说明读取失败
    SkillLoadFailed { skill: String, reason: String },
    /// 生成成功
    Generated {
        skill: String,
        score: u32,
        output: String,
    },
    /// 生成后端报错，error 为展示给用户的文本
    BackendError { skill: String, error: String },
}

impl QueryOutcome {
    /// 命中的技能名（NoMatch 时为 None）
    pub fn skill(&self) -> Option<&str> {
        match self {
            QueryOutcome::NoMatch { .. } => None,
            QueryOutcome::SkillLoadFailed { skill, .. }
            | QueryOutcome::Generated { skill, .. }
            | QueryOutcome::BackendError { skill, .. } => Some(skill),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, QueryOutcome::Generated { .. })
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutcome::NoMatch { .. } => f.write_str(NO_MATCH_MESSAGE),
            QueryOutcome::SkillLoadFailed { .. } => f.write_str(SKILL_LOAD_FAILED_MESSAGE),
            QueryOutcome::Generated { output, .. } => f.write_str(output),
            QueryOutcome::BackendError { error, .. } => f.write_str(error),
        }
    }
}

/// 根据配置选择生成后端（Anthropic / OpenAI 兼容 / DeepSeek / Mock）
///
/// 缺少 API Key 时仍返回对应后端，调用时以 MissingCredential 报告，不会静默切换到 Mock。
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let timeout = cfg.llm.timeouts.request;
    match cfg.llm.provider.to_lowercase().as_str() {
        "mock" => {
            tracing::info!("Using Mock LLM");
            Arc::new(MockLlmClient)
        }
        "openai" => {
            let model = cfg
                .llm
                .openai
                .model
                .clone()
                .unwrap_or_else(|| "gpt-4o-mini".to_string());
            tracing::info!("Using OpenAI LLM ({})", model);
            Arc::new(
                OpenAiClient::new(cfg.llm.base_url.as_deref(), &model, None).with_timeout(timeout),
            )
        }
        "deepseek" => {
            let client = create_deepseek_client(cfg.llm.deepseek.model.as_deref()).with_timeout(timeout);
            tracing::info!("Using DeepSeek LLM ({})", client.model());
            Arc::new(client)
        }
        other => {
            if other != "anthropic" {
                tracing::warn!("Unknown LLM provider '{}', using Anthropic", other);
            }
            tracing::info!("Using Anthropic LLM ({})", cfg.llm.model);
            Arc::new(AnthropicClient::new(
                cfg.llm.base_url.as_deref(),
                &cfg.llm.model,
                None,
                cfg.llm.max_tokens,
                timeout,
            ))
        }
    }
}

/// 查询编排器：无跨查询状态，每次查询都重新读取注册表
pub struct Orchestrator {
    registry_path: PathBuf,
    matcher: SkillMatcher,
    loader: SkillLoader,
    llm: Arc<dyn LlmClient>,
}

impl Orchestrator {
    pub fn new(
        registry_path: impl Into<PathBuf>,
        loader: SkillLoader,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            registry_path: registry_path.into(),
            matcher: SkillMatcher::default(),
            loader,
            llm,
        }
    }

    /// 按配置创建：注册表路径、技能目录与 LLM 后端
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(
            cfg.app.registry_path.clone(),
            SkillLoader::new(&cfg.app.skills_dir),
            create_llm_from_config(cfg),
        )
    }

    /// 替换匹配器（自定义领域关键词表）
    pub fn with_matcher(mut self, matcher: SkillMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// 读取并解析注册表；不存在或不可读时记录警告并返回空目录
    pub fn load_catalog(&self) -> Vec<SkillRecord> {
        self.load_catalog_reporting(None)
    }

    fn load_catalog_reporting(
        &self,
        events: Option<&mpsc::UnboundedSender<RouterEvent>>,
    ) -> Vec<SkillRecord> {
        match load_registry(&self.registry_path) {
            Ok(skills) => skills,
            Err(e) => {
                tracing::warn!("{}, continuing with empty catalog", e);
                emit(events, RouterEvent::RegistryUnavailable {
                    reason: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// 处理单条查询
    pub async fn run(&self, query: &str) -> QueryOutcome {
        self.run_with_events(query, None).await
    }

    /// 处理单条查询，并通过 events 推送进度；events 在返回时被释放，接收端随之结束
    pub async fn run_with_events(
        &self,
        query: &str,
        events: Option<mpsc::UnboundedSender<RouterEvent>>,
    ) -> QueryOutcome {
        let events = events.as_ref();

        tracing::debug!(phase = %QueryPhase::LoadRegistry, path = %self.registry_path.display());
        let catalog = self.load_catalog_reporting(events);
        emit(events, RouterEvent::RegistryLoaded {
            count: catalog.len(),
        });

        tracing::debug!(phase = %QueryPhase::Match, skills = catalog.len());
        emit(events, RouterEvent::Matching {
            query: query.to_string(),
        });
        let result = self.matcher.best_match(query, &catalog);

        tracing::debug!(phase = %QueryPhase::Decide, score = result.score);
        let skill = match result.best {
            Some(skill) if result.score >= MATCH_THRESHOLD => skill,
            _ => {
                tracing::info!(best_score = result.score, "no skill matched");
                emit(events, RouterEvent::NoMatch {
                    best_score: result.score,
                });
                tracing::debug!(phase = %QueryPhase::Done);
                return QueryOutcome::NoMatch {
                    best_score: result.score,
                };
            }
        };
        tracing::info!(skill = %skill.name, score = result.score, "skill matched");
        emit(events, RouterEvent::Matched {
            skill: skill.name.clone(),
            score: result.score,
            domain: skill.domain.clone(),
            triggers: skill.leading_triggers(MATCHED_TRIGGER_PREVIEW).to_vec(),
        });

        tracing::debug!(phase = %QueryPhase::LoadSkill, skill = %skill.name);
        emit(events, RouterEvent::LoadingSkill {
            path: self.loader.skill_path(&skill.name).display().to_string(),
        });
        let instructions = match self.loader.load(&skill.name) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("{}", e);
                emit(events, RouterEvent::SkillLoadFailed {
                    reason: e.to_string(),
                });
                tracing::debug!(phase = %QueryPhase::Done);
                return QueryOutcome::SkillLoadFailed {
                    skill: skill.name.clone(),
                    reason: e.to_string(),
                };
            }
        };
        emit(events, RouterEvent::SkillLoaded {
            chars: instructions.chars().count(),
        });
        if skill.browser {
            emit(events, RouterEvent::BrowserRequired {
                skill: skill.name.clone(),
            });
        }

        tracing::debug!(phase = %QueryPhase::Generate, backend = self.llm.name());
        emit(events, RouterEvent::Generating {
            backend: self.llm.name().to_string(),
        });
        let messages = [Message::system(instructions), Message::user(query)];
        let outcome = match self.llm.complete(&messages).await {
            Ok(output) => {
                emit(events, RouterEvent::Generated);
                QueryOutcome::Generated {
                    skill: skill.name.clone(),
                    score: result.score,
                    output,
                }
            }
            Err(e) => {
                if e.is_config_error() {
                    tracing::warn!("{}", e);
                } else {
                    tracing::error!(skill = %skill.name, "generation failed: {}", e);
                }
                emit(events, RouterEvent::BackendError {
                    text: e.to_string(),
                });
                QueryOutcome::BackendError {
                    skill: skill.name.clone(),
                    error: e.to_string(),
                }
            }
        };
        tracing::debug!(phase = %QueryPhase::Done);
        outcome
    }
}

fn emit(events: Option<&mpsc::UnboundedSender<RouterEvent>>, event: RouterEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::DomainKeywords;
    use std::path::Path;
    use tempfile::TempDir;

    const REGISTRY: &str = "\
### scraper
**Path**: skills/scraper
**Triggers**: scrape, crawl website
**Domain**: web
**Browser**: yes

### deployer
**Triggers**: deploy
";

    fn setup(registry: Option<&str>, skills: &[(&str, &str)]) -> (TempDir, Orchestrator) {
        let dir = TempDir::new().unwrap();
        let registry_path = dir.path().join("registry.md");
        if let Some(doc) = registry {
            std::fs::write(&registry_path, doc).unwrap();
        }
        let skills_dir = dir.path().join("skills");
        for (name, content) in skills {
            write_skill(&skills_dir, name, content);
        }
        let orchestrator = Orchestrator::new(
            registry_path,
            SkillLoader::new(&skills_dir),
            Arc::new(MockLlmClient),
        );
        (dir, orchestrator)
    }

    fn write_skill(skills_dir: &Path, name: &str, content: &str) {
        let dir = skills_dir.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("SKILL.md"), content).unwrap();
    }

    #[tokio::test]
    async fn test_accepts_and_generates() {
        let (_dir, orch) = setup(Some(REGISTRY), &[("scraper", "# Scraper skill")]);
        let outcome = orch.run("please scrape this website").await;
        assert_eq!(
            outcome,
            QueryOutcome::Generated {
                skill: "scraper".to_string(),
                score: 7,
                output: "[mock] # Scraper skill\nplease scrape this website".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_threshold_boundary() {
        // deploy 无领域：3 分被拒
        let (_dir, orch) = setup(Some(REGISTRY), &[("deployer", "# Deployer")]);
        let outcome = orch.run("deploy now").await;
        assert_eq!(outcome, QueryOutcome::NoMatch { best_score: 3 });
        assert_eq!(outcome.to_string(), NO_MATCH_MESSAGE);

        // 加上 devops 领域：deploy 同时是领域关键词，4 分通过
        let registry = "### deployer\n**Triggers**: deploy\n**Domain**: devops\n";
        let (_dir, orch) = setup(Some(registry), &[("deployer", "# Deployer")]);
        let outcome = orch.run("deploy now").await;
        assert!(outcome.is_generated());
        assert_eq!(outcome.skill(), Some("deployer"));
    }

    #[tokio::test]
    async fn test_missing_skill_file() {
        let (_dir, orch) = setup(Some(REGISTRY), &[]);
        let outcome = orch.run("scrape it").await;
        assert!(matches!(outcome, QueryOutcome::SkillLoadFailed { ref skill, .. } if skill == "scraper"));
        assert_eq!(outcome.to_string(), SKILL_LOAD_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_empty_skill_file() {
        let registry = "### scraper\n**Triggers**: scrape\n**Domain**: web\n";
        let (_dir, orch) = setup(Some(registry), &[("scraper", "")]);
        let outcome = orch.run("scrape it").await;
        assert!(matches!(outcome, QueryOutcome::SkillLoadFailed { ref skill, .. } if skill == "scraper"));
        assert_eq!(outcome.to_string(), SKILL_LOAD_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_custom_domain_keywords() {
        let registry = "### composer\n**Triggers**: compose\n**Domain**: music\n";
        let (_dir, orch) = setup(Some(registry), &[("composer", "# Composer")]);
        // 内置表没有 music 领域，只有整词命中的 3 分
        assert_eq!(
            orch.run("compose a melody").await,
            QueryOutcome::NoMatch { best_score: 3 }
        );

        let domains = DomainKeywords::builtin().with_domain("music", &["melody", "chord"]);
        let orch = orch.with_matcher(SkillMatcher::new(domains));
        let outcome = orch.run("compose a melody").await;
        assert!(matches!(outcome, QueryOutcome::Generated { ref skill, score: 4, .. } if skill == "composer"));
    }

    #[tokio::test]
    async fn test_missing_registry_is_no_match() {
        let (_dir, orch) = setup(None, &[]);
        assert!(orch.load_catalog().is_empty());
        let outcome = orch.run("please scrape this website").await;
        assert_eq!(outcome, QueryOutcome::NoMatch { best_score: 0 });
    }

    #[tokio::test]
    async fn test_events_in_order() {
        let (_dir, orch) = setup(Some(REGISTRY), &[("scraper", "# Scraper")]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        orch.run_with_events("scrape", Some(tx)).await;

        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        assert_eq!(events[0], RouterEvent::RegistryLoaded { count: 2 });
        assert!(matches!(events[2], RouterEvent::Matched { score: 4, .. }));
        assert!(events.contains(&RouterEvent::BrowserRequired {
            skill: "scraper".to_string()
        }));
        assert_eq!(events.last(), Some(&RouterEvent::Generated));
    }

    #[test]
    fn test_mock_provider_from_config() {
        let mut cfg = AppConfig::default();
        cfg.llm.provider = "MOCK".to_string();
        assert_eq!(create_llm_from_config(&cfg).name(), "mock");

        cfg.llm.provider = "anthropic".to_string();
        assert_eq!(create_llm_from_config(&cfg).name(), "anthropic");
    }
}
