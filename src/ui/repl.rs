//! 交互式命令行
//!
//! 逐行读取用户输入：`/skills` 列出技能目录，`/quit` 退出，其余文本作为查询交给编排器。
//! 一次只处理一条查询；输入结束（EOF）、读取失败或 Ctrl-C 时结束会话。
//! 查询执行中按下 Ctrl-C 不会打断生成，当前结果打印后会话结束。

use std::future::Future;
use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::core::{Orchestrator, RouterEvent};
use crate::skills::SkillRecord;

const RULE_WIDTH: usize = 60;
/// /skills 列表中展示的触发词个数
const LISTED_TRIGGERS: usize = 4;
const PROMPT: &str = "\n💬 Enter your request: ";
const GOODBYE: &str = "\n👋 Goodbye!";

/// 一行输入的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// 空行，忽略
    Empty,
    ListSkills,
    Quit,
    Query(String),
}

impl ReplCommand {
    /// 命令不区分大小写
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        match line.to_lowercase().as_str() {
            "/quit" => ReplCommand::Quit,
            "/skills" => ReplCommand::ListSkills,
            _ => ReplCommand::Query(line.to_string()),
        }
    }
}

fn rule(c: char, width: usize) -> String {
    std::iter::repeat(c).take(width).collect()
}

/// 启动横幅
pub fn render_banner() -> String {
    let heavy = rule('=', RULE_WIDTH);
    format!(
        "\n{heavy}\n🚀 SKILL ROUTER - Skill Orchestrator\n{heavy}\n\n\
         This tool automatically matches your queries to skills\n\
         and generates output using the SKILL.md instructions.\n\n\
         Commands:\n  /skills  - List available skills\n  /quit    - Exit\n{}",
        rule('-', RULE_WIDTH)
    )
}

/// /skills 列表：浏览器标记、名字、领域、前几个触发词
pub fn render_skill_list(catalog: &[SkillRecord]) -> String {
    let mut out = format!("\n📋 Available Skills:\n{}\n", rule('-', 40));
    for skill in catalog {
        let browser = if skill.browser { "🌐" } else { "  " };
        out.push_str(&format!(
            "  {} {} ({})\n      Triggers: {}\n",
            browser,
            skill.name,
            skill.domain.as_deref().unwrap_or("?"),
            skill.leading_triggers(LISTED_TRIGGERS).join(", ")
        ));
    }
    out
}

/// 运行交互循环，直到 /quit、EOF、读取失败或 Ctrl-C
pub async fn run_repl<R, W>(
    orchestrator: &Orchestrator,
    input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_repl_until(orchestrator, input, output, ctrl_c).await
}

/// 与 [`run_repl`] 相同，但由 `shutdown` 决定何时结束会话
///
/// 等待输入时 `shutdown` 完成则立即退出；查询执行期间完成则等这条查询
/// 打印完结果后再退出，不再读取后续输入。
pub async fn run_repl_until<R, W, S>(
    orchestrator: &Orchestrator,
    input: R,
    output: &mut W,
    shutdown: S,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    writeln!(output, "{}", render_banner())?;
    let mut lines = input.lines();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let line = tokio::select! {
            biased;
            _ = &mut shutdown => {
                writeln!(output, "\n{GOODBYE}")?;
                return Ok(());
            }
            line = lines.next_line() => line,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                writeln!(output, "\n{GOODBYE}")?;
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("stdin read failed: {}", e);
                writeln!(output, "\n{GOODBYE}")?;
                return Ok(());
            }
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => {
                writeln!(output, "{GOODBYE}")?;
                return Ok(());
            }
            ReplCommand::ListSkills => {
                let catalog = orchestrator.load_catalog();
                write!(output, "{}", render_skill_list(&catalog))?;
            }
            ReplCommand::Query(query) => {
                let mut interrupted = false;
                {
                    let query_done = run_query(orchestrator, &query, output);
                    tokio::pin!(query_done);
                    // 生成调用不可取消：收到中断后继续等它结束
                    loop {
                        tokio::select! {
                            biased;
                            _ = &mut shutdown, if !interrupted => {
                                tracing::info!("Interrupt received, finishing current query");
                                interrupted = true;
                            }
                            result = &mut query_done => break result?,
                        }
                    }
                }
                if interrupted {
                    writeln!(output, "\n{GOODBYE}")?;
                    return Ok(());
                }
            }
        }
    }
}

/// 处理一条查询：边执行边打印进度事件，最后打印结果
async fn run_query<W: Write>(
    orchestrator: &Orchestrator,
    query: &str,
    output: &mut W,
) -> std::io::Result<()> {
    let heavy = rule('=', RULE_WIDTH);
    writeln!(output, "\n{heavy}\n🔍 SKILL ROUTER - Skill Orchestrator\n{heavy}")?;

    let (tx, mut rx) = mpsc::unbounded_channel::<RouterEvent>();
    let print_events = async {
        while let Some(event) = rx.recv().await {
            writeln!(output, "\n{}", event.render())?;
            output.flush()?;
        }
        Ok::<_, std::io::Error>(())
    };
    let (outcome, printed) = tokio::join!(orchestrator.run_with_events(query, Some(tx)), print_events);
    printed?;

    writeln!(output, "{heavy}\n{outcome}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("/QUIT"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse(" /Skills "), ReplCommand::ListSkills);
        assert_eq!(
            ReplCommand::parse("  scrape this  "),
            ReplCommand::Query("scrape this".to_string())
        );
    }

    #[test]
    fn test_render_skill_list() {
        let catalog = vec![
            SkillRecord {
                name: "scraper".to_string(),
                path: None,
                triggers: ["a", "b", "c", "d", "e"].iter().map(|t| t.to_string()).collect(),
                domain: Some("web".to_string()),
                browser: true,
            },
            SkillRecord {
                name: "misc".to_string(),
                path: None,
                triggers: vec!["x".to_string()],
                domain: None,
                browser: false,
            },
        ];
        let text = render_skill_list(&catalog);
        assert!(text.contains("🌐 scraper (web)"));
        assert!(text.contains("Triggers: a, b, c, d\n"));
        assert!(text.contains("misc (?)"));
    }
}
