//! # 分析结果导出
//!
//! 强度汇总表、ROI 曲线与单峰强度的 CSV 输出。
//!
//! ## 依赖关系
//! - 被 `analyzer/mod.rs` 与 `commands/` 使用
//! - 使用 `models/intensity.rs` 与 `fit/engine.rs` 的结果类型

use std::path::Path;

use crate::error::{EdsfitError, Result};
use crate::fit::{RoiFit, SinglePeakResult};
use crate::models::intensity::FIXED_WIDTH_FACTOR;
use crate::models::PeakIntensity;

/// 写出强度汇总表
///
/// 每条线一行，列固定为计数、背景、峰位、FWHM 与 1.2×FWHM 窗口内的
/// 计数与背景。
pub fn write_intensities(path: &Path, intensities: &[PeakIntensity]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "Line",
        "Counts",
        "Background",
        "Position (keV)",
        "FWHM (eV)",
        "Counts (1.2*FWHM)",
        "Background (1.2*FWHM)",
    ])?;

    for peak in intensities {
        writer.write_record(&[
            peak.label.clone(),
            format!("{:.6}", peak.counts()),
            format!("{:.6}", peak.counts_background()),
            format!("{:.6}", peak.position_kev),
            format!("{:.6}", peak.fwhm_ev()),
            format!("{:.6}", peak.counts_from_fixed_width(FIXED_WIDTH_FACTOR)),
            format!(
                "{:.6}",
                peak.counts_background_from_fixed_width(FIXED_WIDTH_FACTOR)
            ),
        ])?;
    }

    flush(writer, path)
}

/// 写出单个 ROI 的拟合曲线
///
/// 列为能量、实测、总拟合、背景，随后每条线一列峰曲线。
pub fn write_roi_curves(path: &Path, fit: &RoiFit) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![
        "Energy (keV)".to_string(),
        "Data".to_string(),
        "Fit".to_string(),
        "Background".to_string(),
    ];
    header.extend(fit.intensities.iter().map(|p| p.label.clone()));
    writer.write_record(&header)?;

    for i in 0..fit.x_kev.len() {
        let mut row = vec![
            format!("{:.6}", fit.x_kev[i]),
            format!("{:.6}", fit.y_data[i]),
            format!("{:.6}", fit.y_fit[i]),
            format!("{:.6}", fit.y_background[i]),
        ];
        row.extend(fit.intensities.iter().map(|p| format!("{:.6}", p.y_peak[i])));
        writer.write_record(&row)?;
    }

    flush(writer, path)
}

/// 写出单峰拟合强度表
pub fn write_single_peaks(path: &Path, results: &[SinglePeakResult]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["Energy (keV)", "Line", "Intensity"])?;

    for result in results {
        writer.write_record(&[
            format!("{:.6}", result.position_kev),
            result.label.clone(),
            format!("{:.6}", result.intensity),
        ])?;
    }

    flush(writer, path)
}

fn flush(mut writer: csv::Writer<std::fs::File>, path: &Path) -> Result<()> {
    writer.flush().map_err(|e| EdsfitError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_intensity(label: &str) -> PeakIntensity {
        PeakIntensity {
            label: label.to_string(),
            x_kev: vec![1.0, 1.01, 1.02],
            y_peak: vec![5.0, 10.0, 5.0],
            y_background: vec![1.0, 1.0, 1.0],
            position_kev: 1.01,
            sigma_kev: 0.02,
            converged: true,
        }
    }

    #[test]
    fn test_write_intensities_header_and_rows() {
        let path = std::env::temp_dir().join(format!("edsfit_export_{}.csv", std::process::id()));
        let intensities = vec![sample_intensity("Si Ka1")];

        write_intensities(&path, &intensities).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Line,Counts,Background,Position (keV),FWHM (eV),Counts (1.2*FWHM),Background (1.2*FWHM)"
        );

        let row = lines.next().unwrap();
        assert!(row.starts_with("Si Ka1,20.000000,3.000000,1.010000,"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_single_peaks() {
        let path =
            std::env::temp_dir().join(format!("edsfit_peaks_{}.csv", std::process::id()));
        let results = vec![SinglePeakResult {
            label: "Zr Ka".to_string(),
            position_kev: 15.775,
            height: 100.0,
            width_kev: 0.08,
            intensity: 1234.5,
            background: (10.0, 0.5),
            converged: true,
        }];

        write_single_peaks(&path, &results).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), "Energy (keV),Line,Intensity");
        assert_eq!(lines.next().unwrap(), "15.775000,Zr Ka,1234.500000");

        fs::remove_file(&path).unwrap();
    }
}
