//! 命令行参数
//!
//! `skill-router [--config <file>] [query...]`：带查询词时执行一次后退出，否则进入交互式命令行。

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "skill-router")]
#[command(about = "Route a request to the best matching skill and generate with its SKILL.md")]
#[command(version)]
pub struct Cli {
    /// 额外的配置文件，叠加在 config/default.toml 之上
    #[arg(long, short = 'c', env = "SKILL_ROUTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// 单次查询；省略时进入交互模式
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub query: Vec<String>,
}

impl Cli {
    /// 拼接后的单次查询，没有查询词时为 None
    pub fn one_shot_query(&self) -> Option<String> {
        let query = self.query.join(" ");
        let query = query.trim();
        (!query.is_empty()).then(|| query.to_string())
    }
}
