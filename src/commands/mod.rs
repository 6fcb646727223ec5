//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `analyzer/`, `utils/`
//! - 子模块: analyze, peaks, lines

pub mod analyze;
pub mod lines;
pub mod peaks;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Analyze(args) => analyze::execute(args),
        Commands::Peaks(args) => peaks::execute(args),
        Commands::Lines(args) => lines::execute(args),
    }
}
