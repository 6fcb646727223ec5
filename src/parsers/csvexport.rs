//! # 导出 CSV 谱文件解析器
//!
//! 解析分析软件导出的两列 CSV 谱（能量 keV，计数）。
//!
//! ## 格式说明
//! ```text
//! Primary energy: 20.0
//! Energy (keV),Counts
//! 0.00,12
//! 0.01,15
//! ```
//!
//! `Primary energy` 行与列标题行均可缺省，非数值行一律跳过。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/spectrum.rs`

use std::fs;
use std::path::Path;

use crate::error::{EdsfitError, Result};
use crate::models::Spectrum;

const PRIMARY_ENERGY_PREFIX: &str = "Primary energy";

/// 解析导出 CSV 谱文件
pub fn parse_csv_file(path: &Path) -> Result<Spectrum> {
    let content = fs::read_to_string(path).map_err(|e| EdsfitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_csv_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析导出 CSV 格式
pub fn parse_csv_content(content: &str, default_name: &str) -> Result<Spectrum> {
    let mut energies: Vec<f64> = Vec::new();
    let mut counts: Vec<f64> = Vec::new();
    let mut beam_kv: Option<f64> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(PRIMARY_ENERGY_PREFIX) {
            if let Some(pos) = line.find(':') {
                beam_kv = line[pos + 1..].trim().parse().ok();
            }
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        if fields.len() < 2 {
            continue;
        }

        // 标题行等非数值行跳过
        if let (Ok(e), Ok(c)) = (fields[0].parse::<f64>(), fields[1].parse::<f64>()) {
            energies.push(e);
            counts.push(c);
        }
    }

    if energies.is_empty() {
        return Err(EdsfitError::ParseError {
            format: "CSV".to_string(),
            path: default_name.to_string(),
            reason: "No data points".to_string(),
        });
    }

    let spectrum = Spectrum::new(default_name, energies, counts)?;
    match beam_kv {
        Some(kv) => Ok(spectrum.with_beam_energy(kv)),
        None => Ok(spectrum),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let content = r#"
Energy (keV),Counts
0.00,12
0.01,15
0.02,9
"#;
        let spectrum = parse_csv_content(content, "test").unwrap();

        assert_eq!(spectrum.len(), 3);
        assert!((spectrum.energies_kev[1] - 0.01).abs() < 1e-12);
        assert!((spectrum.counts[2] - 9.0).abs() < 1e-12);
        assert_eq!(spectrum.beam_energy_kev, None);
    }

    #[test]
    fn test_parse_csv_with_primary_energy() {
        let content = r#"
Primary energy: 20.0
Energy (keV),Counts
0.00,12
0.01,15
"#;
        let spectrum = parse_csv_content(content, "test").unwrap();

        assert_eq!(spectrum.beam_energy_kev, Some(20.0));
        assert_eq!(spectrum.len(), 2);
    }

    #[test]
    fn test_parse_csv_no_data() {
        let content = "Energy (keV),Counts\n";
        assert!(parse_csv_content(content, "test").is_err());
    }
}
