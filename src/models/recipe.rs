//! # 分析配方模型
//!
//! JSON 配方描述一次完整分析：探测器常数、元素列表、ROI 列表、
//! 强制/排除峰、拟合策略与标记开关。命令行参数可覆盖或追加配方值。
//!
//! ## 数据来源
//! - `serde` + `serde_json` 反序列化
//!
//! ## 依赖关系
//! - 被 `analyzer/` 和 `commands/` 使用

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EdsfitError, Result};
use crate::fit::FitMethod;

/// 探测器能量分辨率常数
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectorSettings {
    /// 电子学噪声 (eV)
    #[serde(default = "default_noise_ev")]
    pub noise_ev: f64,

    /// Fano 因子
    #[serde(default = "default_fano_factor")]
    pub fano_factor: f64,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        DetectorSettings {
            noise_ev: default_noise_ev(),
            fano_factor: default_fano_factor(),
        }
    }
}

// Si 探测器在 Mn Ka 处约 129 eV 分辨率对应的常数
fn default_noise_ev() -> f64 {
    50.0
}

fn default_fano_factor() -> f64 {
    0.114
}

/// 配方中的单个 ROI 描述
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiSpec {
    /// 区间标签
    pub label: String,

    /// 能量范围 (keV)
    pub range_kev: (f64, f64),

    /// 拟合时不包含线性背景
    #[serde(default)]
    pub no_background: bool,
}

/// 谱图标记开关
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarkerSettings {
    /// 显示吸收边标记
    #[serde(default)]
    pub show_edge_markers: bool,

    /// 显示主线标记
    #[serde(default = "default_true")]
    pub show_major_line_markers: bool,

    /// 显示次线标记
    #[serde(default)]
    pub show_minor_line_markers: bool,

    /// 显示伴线标记
    #[serde(default)]
    pub show_satellite_line_markers: bool,

    /// 显示 Si 逃逸峰标记
    #[serde(default)]
    pub show_si_escape_markers: bool,

    /// 显示 ROI 区间底色
    #[serde(default = "default_true")]
    pub show_rois: bool,

    /// 在总览图上叠加拟合峰曲线
    #[serde(default = "default_true")]
    pub show_fitted_peaks: bool,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        MarkerSettings {
            show_edge_markers: false,
            show_major_line_markers: true,
            show_minor_line_markers: false,
            show_satellite_line_markers: false,
            show_si_escape_markers: false,
            show_rois: true,
            show_fitted_peaks: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// 一次分析的完整配方
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisRecipe {
    /// 样品中的元素符号列表
    #[serde(default)]
    pub elements: Vec<String>,

    /// ROI 列表
    #[serde(default)]
    pub rois: Vec<RoiSpec>,

    /// 探测器常数
    #[serde(default)]
    pub detector: DetectorSettings,

    /// 强制加入的 (元素, 跃迁) 峰
    #[serde(default)]
    pub required_peaks: Vec<(String, String)>,

    /// 强制排除的 (元素, 跃迁) 峰
    #[serde(default)]
    pub omitted_peaks: Vec<(String, String)>,

    /// 拟合策略
    #[serde(default)]
    pub fit_method: FitMethod,

    /// 峰位允许偏移 (keV)
    #[serde(default = "default_max_position_error_kev")]
    pub max_position_error_kev: f64,

    /// 能量上限 (keV)，超出上限起点的 ROI 被跳过
    #[serde(default)]
    pub maximum_energy_kev: Option<f64>,

    /// 碳峰双峰模式
    #[serde(default)]
    pub double_carbon_peak: bool,

    /// 导出每个 ROI 的拟合曲线 CSV
    #[serde(default)]
    pub export_rois: bool,

    /// 谱图标记开关
    #[serde(default)]
    pub markers: MarkerSettings,
}

fn default_max_position_error_kev() -> f64 {
    0.010
}

impl AnalysisRecipe {
    /// 从 JSON 文件读取配方
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EdsfitError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| EdsfitError::ParseError {
            format: "recipe".to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// 新建空配方，各项取默认值
    pub fn new() -> Self {
        AnalysisRecipe {
            max_position_error_kev: default_max_position_error_kev(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_defaults() {
        let recipe = AnalysisRecipe::new();

        assert!(recipe.elements.is_empty());
        assert!((recipe.detector.noise_ev - 50.0).abs() < 1e-12);
        assert!((recipe.detector.fano_factor - 0.114).abs() < 1e-12);
        assert!((recipe.max_position_error_kev - 0.010).abs() < 1e-12);
        assert_eq!(recipe.fit_method, FitMethod::Peak);
        assert!(!recipe.double_carbon_peak);
        assert!(recipe.markers.show_major_line_markers);
        assert!(!recipe.markers.show_edge_markers);
        assert!(recipe.markers.show_rois);
    }

    #[test]
    fn test_recipe_from_json() {
        let json = r#"{
            "elements": ["Cu", "Zr"],
            "rois": [
                {"label": "Roi Cu L", "range_kev": [0.8, 1.1]},
                {"label": "Roi DC K", "range_kev": [0.15, 0.45], "no_background": true}
            ],
            "detector": {"noise_ev": 40.0, "fano_factor": 0.12},
            "required_peaks": [["Cu", "La1"]],
            "fit_method": "family",
            "double_carbon_peak": true
        }"#;

        let recipe: AnalysisRecipe = serde_json::from_str(json).unwrap();

        assert_eq!(recipe.elements, vec!["Cu", "Zr"]);
        assert_eq!(recipe.rois.len(), 2);
        assert!(!recipe.rois[0].no_background);
        assert!(recipe.rois[1].no_background);
        assert!((recipe.detector.noise_ev - 40.0).abs() < 1e-12);
        assert_eq!(recipe.required_peaks, vec![("Cu".to_string(), "La1".to_string())]);
        assert_eq!(recipe.fit_method, FitMethod::Family);
        assert!(recipe.double_carbon_peak);
        // 未给出的字段回落到默认值
        assert!((recipe.max_position_error_kev - 0.010).abs() < 1e-12);
        assert!(recipe.markers.show_fitted_peaks);
    }

    #[test]
    fn test_recipe_minimal_json() {
        let recipe: AnalysisRecipe = serde_json::from_str("{}").unwrap();

        assert_eq!(recipe.fit_method, FitMethod::Peak);
        assert!((recipe.detector.noise_ev - 50.0).abs() < 1e-12);
        assert!(recipe.maximum_energy_kev.is_none());
    }
}
