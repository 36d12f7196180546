//! 技能匹配器
//!
//! 加权关键词打分（不调用 LLM）：
//! - 触发词整体出现在查询中（子串）：+3
//! - 否则，多词触发词中任一单词出现在查询的词集合中：+2（每个触发词最多计一次）
//! - 技能所属领域的每个领域关键词出现在查询中（子串）：+1
//!
//! 只有分数严格大于当前最佳时才替换，平分时先出现的技能胜出。

use std::collections::{HashMap, HashSet};

use super::SkillRecord;

/// 触发词整体命中得分
pub const PHRASE_WEIGHT: u32 = 3;
/// 触发词部分单词命中得分
pub const WORD_WEIGHT: u32 = 2;
/// 领域关键词命中得分
pub const DOMAIN_WEIGHT: u32 = 1;

/// 领域 → 领域关键词 查找表
#[derive(Debug, Clone, Default)]
pub struct DomainKeywords {
    table: HashMap<String, Vec<String>>,
}

impl DomainKeywords {
    /// 空表：任何领域都不加分
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置领域表
    pub fn builtin() -> Self {
        Self::new()
            .with_domain("creative", &["write", "copy", "marketing", "ad", "content", "script"])
            .with_domain("web", &["scrape", "browse", "website", "extract", "crawl"])
            .with_domain("code", &["function", "class", "code", "implement", "build"])
            .with_domain("docs", &["document", "readme", "explain", "describe"])
            .with_domain("data", &["analyze", "csv", "json", "data", "report"])
            .with_domain("devops", &["deploy", "docker", "ci", "pipeline"])
    }

    /// 添加或替换一个领域的关键词
    pub fn with_domain(mut self, domain: &str, keywords: &[&str]) -> Self {
        self.table.insert(
            domain.to_string(),
            keywords.iter().map(|k| k.to_string()).collect(),
        );
        self
    }

    /// 领域关键词；未知领域返回空切片
    pub fn keywords(&self, domain: &str) -> &[String] {
        self.table.get(domain).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// 单次匹配结果：最佳技能（可能没有）与其分数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub best: Option<&'a SkillRecord>,
    pub score: u32,
}

/// 预处理后的查询：小写全文 + 词集合（词借用自全文）
struct NormalizedQuery<'q> {
    text: &'q str,
    words: HashSet<&'q str>,
}

impl<'q> NormalizedQuery<'q> {
    fn new(lowered: &'q str) -> Self {
        Self {
            text: lowered,
            words: lowered.split_whitespace().collect(),
        }
    }
}

/// 技能匹配器：持有领域关键词表
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    domains: DomainKeywords,
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self::new(DomainKeywords::builtin())
    }
}

impl SkillMatcher {
    pub fn new(domains: DomainKeywords) -> Self {
        Self { domains }
    }

    pub fn domains(&self) -> &DomainKeywords {
        &self.domains
    }

    /// 计算单个技能对查询的分数
    pub fn score(&self, query: &str, skill: &SkillRecord) -> u32 {
        let lowered = query.to_lowercase();
        self.score_normalized(&NormalizedQuery::new(&lowered), skill)
    }

    fn score_normalized(&self, query: &NormalizedQuery<'_>, skill: &SkillRecord) -> u32 {
        let mut score = 0;

        for trigger in &skill.triggers {
            let trigger = trigger.to_lowercase();
            if query.text.contains(trigger.as_str()) {
                score += PHRASE_WEIGHT;
            } else if trigger
                .split_whitespace()
                .any(|word| query.words.contains(word))
            {
                score += WORD_WEIGHT;
            }
        }

        if let Some(domain) = skill.domain.as_deref() {
            let hits = self
                .domains
                .keywords(domain)
                .iter()
                .filter(|k| query.text.contains(k.as_str()))
                .count() as u32;
            score += hits * DOMAIN_WEIGHT;
        }

        score
    }

    /// 对目录中所有技能打分，返回最佳技能与分数
    pub fn best_match<'a>(&self, query: &str, catalog: &'a [SkillRecord]) -> MatchResult<'a> {
        let lowered = query.to_lowercase();
        let normalized = NormalizedQuery::new(&lowered);

        let mut result = MatchResult {
            best: None,
            score: 0,
        };
        for skill in catalog {
            let score = self.score_normalized(&normalized, skill);
            tracing::trace!(skill = %skill.name, score, "skill scored");
            if score > result.score {
                result = MatchResult {
                    best: Some(skill),
                    score,
                };
            }
        }
        result
    }
}
