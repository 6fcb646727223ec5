//! # 解析器模块
//!
//! 提供各种能谱文件格式的解析器。
//!
//! ## 依赖关系
//! - 被 `analyzer/` 与 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: emsa, csvexport

pub mod csvexport;
pub mod emsa;

use crate::error::{EdsfitError, Result};
use crate::models::Spectrum;
use std::path::Path;

/// 从文件路径推断格式并解析
pub fn parse_spectrum_file(path: &Path) -> Result<Spectrum> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "emsa" | "msa" | "txt" => emsa::parse_emsa_file(path),
        "csv" => csvexport::parse_csv_file(path),
        _ => Err(EdsfitError::UnsupportedFormat(format!(
            "Cannot determine format for: {}",
            path.display()
        ))),
    }
}
