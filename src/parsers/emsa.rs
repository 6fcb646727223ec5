//! # EMSA/MAS 谱文件解析器
//!
//! 解析 EMSA/MAS 1.0 标准谱文件（.emsa / .msa / .txt）。
//!
//! ## 格式说明
//! ```text
//! #FORMAT      : EMSA/MAS Spectral Data File
//! #VERSION     : 1.0
//! #NPOINTS     : 1024
//! #XPERCHAN    : 10.0
//! #OFFSET      : 0.0
//! #XUNITS      : eV
//! #DATATYPE    : XY
//! #BEAMKV   -kV: 20.0
//! #SPECTRUM    : Spectral Data Starts Here
//! 0.0, 10
//! 10.0, 12
//! #ENDOFDATA   :
//! ```
//!
//! 关键字可带 `-kV` 之类的单位后缀。`DATATYPE XY` 时数据行为
//! 能量/计数对，`DATATYPE Y` 时仅计数，能量由 OFFSET 与
//! XPERCHAN 重建。XUNITS 为 eV 时统一换算为 keV。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/spectrum.rs`

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{EdsfitError, Result};
use crate::models::Spectrum;

/// 解析 EMSA 谱文件
pub fn parse_emsa_file(path: &Path) -> Result<Spectrum> {
    let content = fs::read_to_string(path).map_err(|e| EdsfitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_emsa_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 EMSA 格式
pub fn parse_emsa_content(content: &str, default_name: &str) -> Result<Spectrum> {
    let header_re = Regex::new(r"^#([A-Za-z0-9]+)\s*(?:-[A-Za-z]+)?\s*:\s*(.*)$").unwrap();

    let mut xperchan: Option<f64> = None;
    let mut offset: f64 = 0.0;
    let mut xunits_ev = false;
    let mut beam_kv: Option<f64> = None;
    let mut datatype_y = false;
    let mut in_data = false;
    let mut saw_spectrum = false;

    let mut xy_pairs: Vec<(f64, f64)> = Vec::new();
    let mut y_values: Vec<f64> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = header_re.captures(line) {
            let keyword = caps[1].to_uppercase();
            let value = caps[2].trim();

            match keyword.as_str() {
                "XPERCHAN" => xperchan = value.parse().ok(),
                "OFFSET" => offset = value.parse().unwrap_or(0.0),
                "XUNITS" => xunits_ev = value.eq_ignore_ascii_case("eV"),
                "BEAMKV" => beam_kv = value.parse().ok(),
                "DATATYPE" => datatype_y = value.eq_ignore_ascii_case("Y"),
                "SPECTRUM" => {
                    in_data = true;
                    saw_spectrum = true;
                }
                "ENDOFDATA" => in_data = false,
                _ => {}
            }
            continue;
        }

        if !in_data {
            continue;
        }

        // 数据行按逗号或空白分列
        let values: Vec<f64> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .filter_map(|t| t.parse().ok())
            .collect();

        if datatype_y {
            y_values.extend(values);
        } else if values.len() >= 2 {
            xy_pairs.push((values[0], values[1]));
        }
    }

    if !saw_spectrum {
        return Err(parse_error(default_name, "Missing #SPECTRUM data section"));
    }

    let (mut energies, counts): (Vec<f64>, Vec<f64>) = if datatype_y {
        let xperchan = match xperchan {
            Some(v) => v,
            None => return Err(parse_error(default_name, "Missing #XPERCHAN for DATATYPE Y")),
        };
        let energies = (0..y_values.len())
            .map(|i| offset + i as f64 * xperchan)
            .collect();
        (energies, y_values)
    } else {
        xy_pairs.into_iter().unzip()
    };

    if energies.is_empty() {
        return Err(parse_error(default_name, "No data points"));
    }

    if xunits_ev {
        for e in energies.iter_mut() {
            *e *= 1.0e-3;
        }
    }

    let spectrum = Spectrum::new(default_name, energies, counts)?;
    match beam_kv {
        Some(kv) => Ok(spectrum.with_beam_energy(kv)),
        None => Ok(spectrum),
    }
}

fn parse_error(name: &str, reason: &str) -> EdsfitError {
    EdsfitError::ParseError {
        format: "EMSA".to_string(),
        path: name.to_string(),
        reason: reason.to_string(),
    }
}
