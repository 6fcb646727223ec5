//! # analyze 子命令 CLI 定义
//!
//! ROI 峰拟合分析入口，支持单谱文件与批量目录两种模式。
//! 命令行参数在配方之上覆盖或追加。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/analyze.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::error::{EdsfitError, Result};
use crate::fit::FitMethod;
use crate::models::recipe::RoiSpec;

// ─────────────────────────────────────────────────────────────
// 拟合策略
// ─────────────────────────────────────────────────────────────

/// 命令行上的拟合策略
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FitMethodArg {
    /// Independent area, position and width per line
    Peak,
    /// Shared height and rigid position shift per line family
    Family,
    /// Single anchored position, widths from the detector model
    Anchored,
    /// Whole spectrum fitted as one region
    Spectrum,
}

impl std::fmt::Display for FitMethodArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitMethodArg::Peak => write!(f, "peak"),
            FitMethodArg::Family => write!(f, "family"),
            FitMethodArg::Anchored => write!(f, "anchored"),
            FitMethodArg::Spectrum => write!(f, "spectrum"),
        }
    }
}

impl From<FitMethodArg> for FitMethod {
    fn from(arg: FitMethodArg) -> Self {
        match arg {
            FitMethodArg::Peak => FitMethod::Peak,
            FitMethodArg::Family => FitMethod::Family,
            FitMethodArg::Anchored => FitMethod::Anchored,
            FitMethodArg::Spectrum => FitMethod::Spectrum,
        }
    }
}

// ─────────────────────────────────────────────────────────────
// ROI 描述解析
// ─────────────────────────────────────────────────────────────

/// 解析 ROI 描述 "LABEL:MIN:MAX[:nobg]"，能量单位 keV
///
/// 标签允许包含空格；末尾的 `nobg` 表示拟合时不含线性背景。
pub fn parse_roi_spec(input: &str) -> Result<RoiSpec> {
    let mut parts: Vec<&str> = input.split(':').map(str::trim).collect();

    let no_background = match parts.last() {
        Some(last) if last.eq_ignore_ascii_case("nobg") => {
            parts.pop();
            true
        }
        _ => false,
    };

    if parts.len() < 3 {
        return Err(EdsfitError::InvalidRange(format!(
            "{} (expected LABEL:MIN:MAX[:nobg])",
            input
        )));
    }

    let n = parts.len();
    let min_kev: f64 = parts[n - 2]
        .parse()
        .map_err(|_| EdsfitError::InvalidRange(input.to_string()))?;
    let max_kev: f64 = parts[n - 1]
        .parse()
        .map_err(|_| EdsfitError::InvalidRange(input.to_string()))?;
    let label = parts[..n - 2].join(":");

    if label.is_empty() {
        return Err(EdsfitError::InvalidRange(format!(
            "{} (empty label)",
            input
        )));
    }
    if min_kev >= max_kev {
        return Err(EdsfitError::InvalidRange(format!(
            "{} (must satisfy MIN < MAX)",
            input
        )));
    }

    Ok(RoiSpec {
        label,
        range_kev: (min_kev, max_kev),
        no_background,
    })
}

// ─────────────────────────────────────────────────────────────
// analyze 子命令参数
// ─────────────────────────────────────────────────────────────

/// analyze 子命令参数
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input spectrum file (.emsa/.msa/.txt EMSA or exported .csv)
    #[arg(long, conflicts_with = "batch", required_unless_present = "batch")]
    pub spectrum: Option<PathBuf>,

    /// Directory of spectrum files for batch mode
    #[arg(long)]
    pub batch: Option<PathBuf>,

    /// Analysis recipe JSON file
    #[arg(long)]
    pub recipe: Option<PathBuf>,

    /// Output directory for tables and figures
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Element present in the sample, e.g. 'Cu' (repeatable)
    #[arg(short, long = "element")]
    pub elements: Vec<String>,

    /// ROI as 'LABEL:MIN:MAX[:nobg]' in keV (repeatable)
    #[arg(long = "roi")]
    pub rois: Vec<String>,

    /// Detector electronic noise in eV
    #[arg(long)]
    pub noise_ev: Option<f64>,

    /// Detector Fano factor
    #[arg(long)]
    pub fano: Option<f64>,

    /// Allowed peak position shift in keV
    #[arg(long)]
    pub max_position_error: Option<f64>,

    /// Fit strategy
    #[arg(long, value_enum)]
    pub fit_method: Option<FitMethodArg>,

    /// Upper energy limit in keV (default: beam energy from the file)
    #[arg(long)]
    pub max_energy: Option<f64>,

    /// Fit the carbon region with an extra peak at 0.15 keV
    #[arg(long, default_value_t = false)]
    pub double_carbon: bool,

    /// Export fitted curves per ROI as CSV
    #[arg(long, default_value_t = false)]
    pub export_rois: bool,

    /// Additionally render a log-scale overview figure
    #[arg(long, default_value_t = false)]
    pub log_scale: bool,

    /// Skip figure generation
    #[arg(long, default_value_t = false)]
    pub no_figures: bool,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode)
    #[arg(long, default_value = "*.emsa,*.msa,*.csv")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roi_spec_plain() {
        let spec = parse_roi_spec("Roi Cu K:7.8:9.2").unwrap();

        assert_eq!(spec.label, "Roi Cu K");
        assert!((spec.range_kev.0 - 7.8).abs() < 1e-12);
        assert!((spec.range_kev.1 - 9.2).abs() < 1e-12);
        assert!(!spec.no_background);
    }

    #[test]
    fn test_parse_roi_spec_no_background() {
        let spec = parse_roi_spec("Roi DC K:0.15:0.45:nobg").unwrap();

        assert_eq!(spec.label, "Roi DC K");
        assert!(spec.no_background);
    }

    #[test]
    fn test_parse_roi_spec_rejects_bad_input() {
        assert!(parse_roi_spec("Roi Cu K:7.8").is_err());
        assert!(parse_roi_spec("Roi Cu K:9.2:7.8").is_err());
        assert!(parse_roi_spec(":7.8:9.2").is_err());
        assert!(parse_roi_spec("Roi Cu K:abc:9.2").is_err());
    }
}
