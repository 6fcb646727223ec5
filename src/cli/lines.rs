//! # lines 子命令 CLI 定义
//!
//! 查询元素的 X 射线参考线并以表格打印。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/lines.rs`

use clap::{Args, ValueEnum};

/// 参考线类别
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum LineCategory {
    /// Major emission lines
    #[default]
    Major,
    /// Minor emission lines
    Minor,
    /// Satellite lines
    Satellite,
    /// Ionization edges
    Edge,
    /// Si escape peaks
    Escape,
    /// All of the above
    All,
}

impl std::fmt::Display for LineCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineCategory::Major => write!(f, "major"),
            LineCategory::Minor => write!(f, "minor"),
            LineCategory::Satellite => write!(f, "satellite"),
            LineCategory::Edge => write!(f, "edge"),
            LineCategory::Escape => write!(f, "escape"),
            LineCategory::All => write!(f, "all"),
        }
    }
}

/// lines 子命令参数
#[derive(Args, Debug)]
pub struct LinesArgs {
    /// Element symbol, e.g. 'Cu' (repeatable)
    #[arg(short, long = "element", required = true)]
    pub elements: Vec<String>,

    /// Line category to list
    #[arg(short, long, value_enum, default_value = "major")]
    pub category: LineCategory,

    /// Lower energy bound in keV
    #[arg(long)]
    pub min_energy: Option<f64>,

    /// Upper energy bound in keV
    #[arg(long)]
    pub max_energy: Option<f64>,
}
