//! # peaks 子命令 CLI 定义
//!
//! 在用户给定的窗口和初始位置上做独立单峰拟合，不依赖参考线目录。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/peaks.rs`

use clap::Args;
use std::path::PathBuf;

use crate::error::{EdsfitError, Result};
use crate::fit::SinglePeakSpec;

/// 解析单峰描述 "LABEL:MIN:MAX:POSITION"，能量单位 keV
///
/// 标签允许包含空格；初始位置必须落在窗口内。
pub fn parse_peak_spec(input: &str) -> Result<SinglePeakSpec> {
    let parts: Vec<&str> = input.split(':').map(str::trim).collect();

    if parts.len() < 4 {
        return Err(EdsfitError::InvalidRange(format!(
            "{} (expected LABEL:MIN:MAX:POSITION)",
            input
        )));
    }

    let n = parts.len();
    let min_kev: f64 = parts[n - 3]
        .parse()
        .map_err(|_| EdsfitError::InvalidRange(input.to_string()))?;
    let max_kev: f64 = parts[n - 2]
        .parse()
        .map_err(|_| EdsfitError::InvalidRange(input.to_string()))?;
    let position_kev: f64 = parts[n - 1]
        .parse()
        .map_err(|_| EdsfitError::InvalidRange(input.to_string()))?;
    let label = parts[..n - 3].join(":");

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
    if position_kev < min_kev || position_kev > max_kev {
        return Err(EdsfitError::InvalidRange(format!(
            "{} (position outside [{}, {}] keV)",
            input, min_kev, max_kev
        )));
    }

    Ok(SinglePeakSpec {
        label,
        window_kev: (min_kev, max_kev),
        position_kev,
    })
}

/// peaks 子命令参数
#[derive(Args, Debug)]
pub struct PeaksArgs {
    /// Input spectrum file (.emsa/.msa/.txt EMSA or exported .csv)
    #[arg(long)]
    pub spectrum: PathBuf,

    /// Peak as 'LABEL:MIN:MAX:POSITION' in keV (repeatable)
    #[arg(long = "peak", required = true)]
    pub peaks: Vec<String>,

    /// Initial peak width guess in keV
    #[arg(long, default_value_t = 0.2)]
    pub sigma: f64,

    /// Write results to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_peak_spec() {
        let spec = parse_peak_spec("Zr Ka:15.2:16.3:15.77").unwrap();

        assert_eq!(spec.label, "Zr Ka");
        assert!((spec.window_kev.0 - 15.2).abs() < 1e-12);
        assert!((spec.window_kev.1 - 16.3).abs() < 1e-12);
        assert!((spec.position_kev - 15.77).abs() < 1e-12);
    }

    #[test]
    fn test_parse_peak_spec_rejects_bad_input() {
        assert!(parse_peak_spec("Zr Ka:15.2:16.3").is_err());
        assert!(parse_peak_spec("Zr Ka:16.3:15.2:15.77").is_err());
        assert!(parse_peak_spec("Zr Ka:15.2:16.3:17.0").is_err());
        assert!(parse_peak_spec(":15.2:16.3:15.77").is_err());
    }
}
