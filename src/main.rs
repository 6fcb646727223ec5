//! # Edsfit - EDS/EDX 谱定量峰拟合工具
//!
//! 从能谱仪导出的谱文件中提取各特征 X 射线峰的净强度，
//! 统一成单一可执行文件。
//!
//! ## 子命令
//! - `analyze` - ROI 峰拟合分析（单文件或批量目录）
//! - `peaks`   - 指定位置的独立单峰拟合
//! - `lines`   - 查询元素参考线
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── analyzer/  (分析编排、导出与绘图)
//!   │     ├── parsers/   (谱文件解析器)
//!   │     ├── catalog/   (X 射线参考线目录)
//!   │     ├── fit/       (峰拟合引擎)
//!   │     └── models/    (数据模型)
//!   ├── batch/      (并行批量处理)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod analyzer;
mod batch;
mod catalog;
mod cli;
mod commands;
mod error;
mod fit;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
