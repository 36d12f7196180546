//! Skill Router - 技能路由器
//!
//! 入口：加载 .env 与配置、初始化日志、创建编排器。
//! 带查询词时执行一次；否则进入交互式命令行。

use anyhow::Context;
use clap::Parser;
use skill_router::{
    cli::Cli,
    config::{load_config, AppConfig},
    observability,
    ui::run_repl,
    Orchestrator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // API Key 等可放在 .env
    dotenvy::dotenv().ok();
    observability::init();
    let cli = Cli::parse();

    // 显式指定的配置文件必须可用；默认配置缺失或有误时退回内置默认值
    let cfg = match cli.config.clone() {
        Some(path) => {
            anyhow::ensure!(path.is_file(), "Config file not found: {}", path.display());
            load_config(Some(path)).context("Failed to load config")?
        }
        None => load_config(None).unwrap_or_else(|e| {
            tracing::warn!("Config load failed ({}), using defaults", e);
            AppConfig::default()
        }),
    };
    let orchestrator = Orchestrator::from_config(&cfg);

    if let Some(query) = cli.one_shot_query() {
        let outcome = orchestrator.run(&query).await;
        println!("{outcome}");
        return Ok(());
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_repl(&orchestrator, stdin, &mut stdout)
        .await
        .context("Interactive session failed")?;

    Ok(())
}
