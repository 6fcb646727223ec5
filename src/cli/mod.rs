//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `analyze`: ROI 峰拟合分析（单文件或批量目录）
//! - `peaks`: 指定位置的独立单峰拟合
//! - `lines`: 查询元素参考线
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: analyze, peaks, lines

pub mod analyze;
pub mod lines;
pub mod peaks;

use clap::{Parser, Subcommand};

/// Edsfit - EDS/EDX 谱定量峰拟合工具
#[derive(Parser)]
#[command(name = "edsfit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A quantitative EDS/EDX X-ray spectrum peak fitting toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Fit ROI peaks in EDS/EDX spectra and export intensities
    Analyze(analyze::AnalyzeArgs),

    /// Fit standalone peaks at user-specified positions
    Peaks(peaks::PeaksArgs),

    /// List X-ray reference lines for elements
    Lines(lines::LinesArgs),
}
