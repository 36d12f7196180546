//! 交互界面：逐行读取的命令行（REPL）

pub mod repl;

pub use repl::{render_banner, render_skill_list, run_repl, run_repl_until, ReplCommand};
