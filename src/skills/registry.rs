//! 技能注册表解析器
//!
//! 注册表是一份 Markdown 文档，每个技能条目以 `### <name>` 开头，正文持续到下一个 `### ` 标题、
//! `---` 分隔线或文档结尾。正文中用 `**Label**: value` 描述字段：
//!
//! ```text
//! ### scraper
//! **Path**: skills/scraper
//! **Triggers**: scrape, crawl website
//! **Domain**: web
//! **Browser**: yes
//! ```
//!
//! 解析分三步：逐行分类（标题 / 分隔线 / 文本）→ 按标题切分条目 → 在条目正文中提取字段。
//! 没有 `Triggers` 的条目直接丢弃。

use std::path::Path;

use crate::core::RouterError;

/// 注册表中的一条技能记录（解析后不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRecord {
    /// 技能名，同时是技能文档目录名
    pub name: String,
    /// 注册表中声明的路径（仅作提示，不参与加载）
    pub path: Option<String>,
    pub triggers: Vec<String>,
    pub domain: Option<String>,
    /// 是否需要浏览器自动化（只展示，不参与打分）
    pub browser: bool,
}

impl SkillRecord {
    /// 前 n 个触发词，用于进度输出与 /skills 列表
    pub fn leading_triggers(&self, n: usize) -> &[String] {
        &self.triggers[..self.triggers.len().min(n)]
    }
}

/// 单行分类结果
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// `### name`：开始一个新条目
    Heading(&'a str),
    /// `### ` 开头但不是单个名字（如 `### Full Catalog`）：结束当前条目，不开始新条目
    OtherHeading,
    /// `---` 开头的分隔线
    Rule,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix("### ") {
        let rest = rest.trim_end();
        if !rest.is_empty() && !rest.contains(char::is_whitespace) {
            return Line::Heading(rest);
        }
        return Line::OtherHeading;
    }
    if line.starts_with("---") {
        return Line::Rule;
    }
    Line::Text(line)
}

/// 按标题切分出的原始条目：名字 + 正文
#[derive(Debug)]
struct RawEntry<'a> {
    name: &'a str,
    body: String,
}

fn split_entries(document: &str) -> Vec<RawEntry<'_>> {
    let mut entries = Vec::new();
    let mut current: Option<RawEntry<'_>> = None;

    for line in document.lines() {
        match classify(line) {
            Line::Heading(name) => {
                entries.extend(current.take());
                current = Some(RawEntry {
                    name,
                    body: String::new(),
                });
            }
            Line::OtherHeading | Line::Rule => entries.extend(current.take()),
            Line::Text(text) => {
                if let Some(entry) = current.as_mut() {
                    entry.body.push_str(text);
                    entry.body.push('\n');
                }
            }
        }
    }
    entries.extend(current);
    entries
}

/// 取 `**Label**:` 之后的值：跳过空白（可跨行），取到行尾；没有值时返回 None
fn field_value<'a>(body: &'a str, label: &str) -> Option<&'a str> {
    let marker = format!("**{label}**:");
    let start = body.find(&marker)? + marker.len();
    let rest = body[start..].trim_start();
    let value = rest.lines().next()?;
    (!value.is_empty()).then_some(value)
}

/// 取值开头的连续单词字符（字母、数字、下划线）
fn leading_word(value: &str) -> Option<&str> {
    let end = value
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(value.len());
    (end > 0).then(|| &value[..end])
}

fn extract_record(entry: RawEntry<'_>) -> Option<SkillRecord> {
    let body = entry.body.as_str();

    let triggers = field_value(body, "Triggers")?
        .split(',')
        .map(|t| t.trim().to_string())
        .collect();

    let path = field_value(body, "Path").map(|p| p.trim().to_string());
    let domain = field_value(body, "Domain")
        .and_then(leading_word)
        .map(String::from);
    let browser = field_value(body, "Browser")
        .and_then(leading_word)
        .is_some_and(|b| b.eq_ignore_ascii_case("yes"));

    Some(SkillRecord {
        name: entry.name.to_string(),
        path,
        triggers,
        domain,
        browser,
    })
}

/// 解析注册表文档，按文档顺序返回有效技能（没有 Triggers 的条目被丢弃）
pub fn parse_registry(document: &str) -> Vec<SkillRecord> {
    split_entries(document)
        .into_iter()
        .filter_map(extract_record)
        .collect()
}

/// 从磁盘读取并解析注册表；文件不存在返回 RegistryNotFound，由调用方降级为空目录
pub fn load_registry(path: impl AsRef<Path>) -> Result<Vec<SkillRecord>, RouterError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RouterError::RegistryNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| RouterError::RegistryRead {
        path: path.to_path_buf(),
        source,
    })?;
    let skills = parse_registry(&content);
    tracing::debug!(path = %path.display(), count = skills.len(), "registry parsed");
    Ok(skills)
}
