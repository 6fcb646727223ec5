//! # 谱分析编排器
//!
//! 把配方、参考线目录、探测器模型和拟合引擎装配为一个可复用的分析器，
//! 对单张谱完成拟合并写出全部产物。
//!
//! ## 算法概述
//! 1. 构造阶段: 解析配方，登记元素目录，校验探测器常数，
//!    过滤超出配方能量上限的 ROI，并对无法解析的强制/排除峰各告警一次
//! 2. 拟合阶段: `spectrum` 策略把全谱当作一个 ROI，
//!    其余策略逐个拟合 ROI，单个 ROI 失败只告警不中断
//! 3. 输出阶段: 强度表 CSV，按需导出 ROI 曲线 CSV、ROI 诊断图与全谱概览图
//!
//! ## 依赖关系
//! - 使用 `catalog/`、`fit/`、`models/` 与子模块 export、plot
//! - 被 `commands/analyze` 和 `batch/` 使用

pub mod export;
pub mod plot;

use std::path::PathBuf;

use crate::catalog::LineCatalog;
use crate::error::Result;
use crate::fit::{DetectorResolution, FitMethod, RoiFit, RoiFitEngine};
use crate::models::intensity::PeakIntensity;
use crate::models::recipe::AnalysisRecipe;
use crate::models::roi::Roi;
use crate::models::spectrum::Spectrum;
use crate::utils::output;

use plot::OverviewData;

/// 输出产物选项
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// 输出目录
    pub output_dir: PathBuf,

    /// 是否生成 PNG 图像
    pub figures: bool,

    /// 额外生成对数坐标的全谱概览图
    pub log_figure: bool,

    /// 图像宽度 (像素)
    pub width: u32,

    /// 图像高度 (像素)
    pub height: u32,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            output_dir: PathBuf::from("."),
            figures: true,
            log_figure: false,
            width: 1200,
            height: 800,
        }
    }
}

/// 一张谱的完整分析结果
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// 谱名，同时是输出文件名主干
    pub spectrum_name: String,

    /// 各 ROI 的拟合结果
    pub fits: Vec<RoiFit>,
}

impl AnalysisReport {
    /// 按 ROI 顺序合并的全部峰强度
    pub fn intensities(&self) -> Vec<PeakIntensity> {
        self.fits
            .iter()
            .flat_map(|f| f.intensities.iter().cloned())
            .collect()
    }

    /// 全部 ROI 是否都在迭代上限内收敛
    pub fn all_converged(&self) -> bool {
        self.fits.iter().all(|f| f.converged)
    }
}

/// 谱分析器，由配方构造后可在多张谱之间复用
#[derive(Debug)]
pub struct SpectrumAnalyzer {
    recipe: AnalysisRecipe,
    catalog: LineCatalog,
    detector: DetectorResolution,
    rois: Vec<Roi>,
}

impl SpectrumAnalyzer {
    /// 由配方构造分析器
    ///
    /// 未知元素符号或非法探测器常数立即报错；
    /// 无法解析的强制/排除峰只告警，不影响构造。
    pub fn from_recipe(recipe: AnalysisRecipe) -> Result<Self> {
        let catalog = LineCatalog::new(&recipe.elements)?;
        let detector =
            DetectorResolution::new(recipe.detector.noise_ev, recipe.detector.fano_factor)?;

        for (symbol, transition) in catalog.unresolved_pairs(&recipe.required_peaks) {
            output::print_warning(&format!("Unknown required line: {} {}", symbol, transition));
        }
        for (symbol, transition) in catalog.unresolved_pairs(&recipe.omitted_peaks) {
            output::print_warning(&format!("Unknown omitted line: {} {}", symbol, transition));
        }

        let mut rois = Vec::with_capacity(recipe.rois.len());
        for spec in &recipe.rois {
            if let Some(max_kev) = recipe.maximum_energy_kev {
                if spec.range_kev.0 > max_kev {
                    output::print_info(&format!(
                        "Roi not added, energy range greater than the primary energy: {}",
                        spec.label
                    ));
                    continue;
                }
            }

            let mut roi = Roi::new(spec.label.clone(), spec.range_kev)?;
            if spec.no_background {
                roi = roi.without_background();
            }
            rois.push(roi);
        }

        Ok(SpectrumAnalyzer {
            recipe,
            catalog,
            detector,
            rois,
        })
    }

    /// 构造时使用的配方
    pub fn recipe(&self) -> &AnalysisRecipe {
        &self.recipe
    }

    /// 对一张谱执行全部 ROI 拟合
    pub fn analyze(&self, spectrum: &Spectrum) -> Result<AnalysisReport> {
        let engine = RoiFitEngine::new(&self.detector, &self.catalog)
            .with_overrides(&self.recipe.required_peaks, &self.recipe.omitted_peaks)
            .with_max_position_error(self.recipe.max_position_error_kev)
            .with_double_carbon_peak(self.recipe.double_carbon_peak)
            .with_method(self.recipe.fit_method);

        let mut fits = Vec::new();

        if self.recipe.fit_method == FitMethod::Spectrum {
            let roi = self.spectrum_domain_roi(spectrum)?;
            if let Some(fit) = engine.fit_roi(&roi, &spectrum.energies_kev, &spectrum.counts)? {
                fits.push(fit);
            }
        } else {
            for roi in self.effective_rois(spectrum) {
                match engine.fit_roi(roi, &spectrum.energies_kev, &spectrum.counts) {
                    Ok(Some(fit)) => fits.push(fit),
                    Ok(None) => {}
                    Err(e) => {
                        output::print_warning(&format!("ROI '{}' fit failed: {}", roi.label, e));
                    }
                }
            }
        }

        Ok(AnalysisReport {
            spectrum_name: spectrum.name.clone(),
            fits,
        })
    }

    /// 分析一张谱并写出全部产物
    ///
    /// 产物为 `<名>.csv` 强度表，按配方追加各 ROI 曲线 CSV，
    /// 按选项追加各 ROI 诊断图与全谱概览图。
    pub fn process(&self, spectrum: &Spectrum, options: &OutputOptions) -> Result<AnalysisReport> {
        let report = self.analyze(spectrum)?;
        let stem = &report.spectrum_name;

        let intensities = report.intensities();
        let csv_path = options.output_dir.join(format!("{}.csv", stem));
        export::write_intensities(&csv_path, &intensities)?;

        if self.recipe.export_rois {
            for fit in &report.fits {
                let path = options
                    .output_dir
                    .join(format!("{}_{}.csv", stem, fit.file_label()));
                export::write_roi_curves(&path, fit)?;
            }
        }

        if options.figures {
            self.render_figures(spectrum, &report, options)?;
        }

        Ok(report)
    }

    /// `spectrum` 策略使用的全谱 ROI
    fn spectrum_domain_roi(&self, spectrum: &Spectrum) -> Result<Roi> {
        let (e_min, e_max) = spectrum.energy_range_kev();
        let e_max = match self.effective_maximum_energy(spectrum) {
            Some(max_kev) => e_max.min(max_kev),
            None => e_max,
        };
        Roi::new("Spectrum", (e_min, e_max))
    }

    /// 实际参与拟合的 ROI
    ///
    /// 配方给出能量上限时构造阶段已完成过滤；
    /// 否则以谱文件中的加速电压为上限过滤。
    fn effective_rois(&self, spectrum: &Spectrum) -> Vec<&Roi> {
        if self.recipe.maximum_energy_kev.is_some() {
            return self.rois.iter().collect();
        }

        let beam_kev = match spectrum.beam_energy_kev {
            Some(kev) => kev,
            None => return self.rois.iter().collect(),
        };

        self.rois
            .iter()
            .filter(|roi| {
                if roi.energy_range_kev.0 > beam_kev {
                    output::print_info(&format!(
                        "Roi not added, energy range greater than the primary energy: {}",
                        roi.label
                    ));
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    /// 有效能量上限，配方值优先于谱文件中的加速电压
    fn effective_maximum_energy(&self, spectrum: &Spectrum) -> Option<f64> {
        self.recipe.maximum_energy_kev.or(spectrum.beam_energy_kev)
    }

    fn render_figures(
        &self,
        spectrum: &Spectrum,
        report: &AnalysisReport,
        options: &OutputOptions,
    ) -> Result<()> {
        let stem = &report.spectrum_name;

        for fit in &report.fits {
            let path = options
                .output_dir
                .join(format!("{}_{}.png", stem, fit.file_label()));
            plot::render_roi_fit(fit, &path, &fit.roi_label, options.width, options.height)?;
        }

        let markers = &self.recipe.markers;

        let edges = if markers.show_edge_markers {
            self.catalog.absorption_edges()
        } else {
            Vec::new()
        };
        let escapes = if markers.show_si_escape_markers {
            self.catalog.si_escape_peaks()
        } else {
            Vec::new()
        };

        let mut lines = Vec::new();
        if markers.show_major_line_markers {
            lines.extend(self.catalog.major_lines());
        }
        if markers.show_minor_line_markers {
            lines.extend(self.catalog.minor_lines());
        }
        if markers.show_satellite_line_markers {
            lines.extend(self.catalog.satellite_lines());
        }
        // 强制峰的参考线不受开关控制，始终绘制
        lines.extend(self.catalog.lines_for(&self.recipe.required_peaks));

        // 概览图横轴截断到有效能量上限
        let cutoff = match self.effective_maximum_energy(spectrum) {
            Some(max_kev) => spectrum.energies_kev.partition_point(|&e| e <= max_kev),
            None => spectrum.len(),
        };

        let data = OverviewData {
            energies_kev: &spectrum.energies_kev[..cutoff],
            counts: &spectrum.counts[..cutoff],
            edges: &edges,
            escapes: &escapes,
            lines: &lines,
            rois: if markers.show_rois { &self.rois } else { &[] },
            fits: if markers.show_fitted_peaks {
                &report.fits
            } else {
                &[]
            },
        };

        let overview_path = options.output_dir.join(format!("{}.png", stem));
        plot::render_overview(
            &data,
            &overview_path,
            stem,
            options.width,
            options.height,
            false,
        )?;

        if options.log_figure {
            let log_path = options.output_dir.join(format!("{}_Log.png", stem));
            plot::render_overview(&data, &log_path, stem, options.width, options.height, true)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recipe::RoiSpec;

    fn roi_spec(label: &str, range_kev: (f64, f64)) -> RoiSpec {
        RoiSpec {
            label: label.to_string(),
            range_kev,
            no_background: false,
        }
    }

    /// 以探测器预测宽度在 C Ka1 位置合成谱
    fn synthetic_carbon_spectrum() -> Spectrum {
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();
        let sigma = detector.sigma_kev(0.277);
        let energies: Vec<f64> = (0..300).map(|i| 0.02 + i as f64 * 0.002).collect();
        let counts: Vec<f64> = energies
            .iter()
            .map(|&x| {
                let z = (x - 0.277) / sigma;
                let peak = 5000.0 / (sigma * (2.0 * std::f64::consts::PI).sqrt())
                    * (-0.5 * z * z).exp();
                10.0 + 5.0 * x + peak
            })
            .collect();
        Spectrum::new("synthetic", energies, counts).unwrap()
    }

    #[test]
    fn test_from_recipe_drops_roi_beyond_maximum_energy() {
        let mut recipe = AnalysisRecipe::new();
        recipe.elements = vec!["Cu".to_string()];
        recipe.maximum_energy_kev = Some(10.0);
        recipe.rois = vec![
            roi_spec("Roi Cu K", (7.8, 9.2)),
            roi_spec("Roi Zr K", (15.0, 16.5)),
        ];

        let analyzer = SpectrumAnalyzer::from_recipe(recipe).unwrap();

        assert_eq!(analyzer.rois.len(), 1);
        assert_eq!(analyzer.rois[0].label, "Roi Cu K");
    }

    #[test]
    fn test_from_recipe_rejects_unknown_element() {
        let mut recipe = AnalysisRecipe::new();
        recipe.elements = vec!["Xx".to_string()];

        assert!(SpectrumAnalyzer::from_recipe(recipe).is_err());
    }

    #[test]
    fn test_analyze_recovers_carbon_peak() {
        let mut recipe = AnalysisRecipe::new();
        recipe.elements = vec!["C".to_string()];
        recipe.rois = vec![roi_spec("Roi C K", (0.16, 0.4))];

        let analyzer = SpectrumAnalyzer::from_recipe(recipe).unwrap();
        let spectrum = synthetic_carbon_spectrum();
        let report = analyzer.analyze(&spectrum).unwrap();

        assert_eq!(report.spectrum_name, "synthetic");
        assert_eq!(report.fits.len(), 1);
        assert!(report.all_converged());

        let intensities = report.intensities();
        assert_eq!(intensities.len(), 1);
        assert_eq!(intensities[0].label, "C Ka1");
        assert!((intensities[0].position_kev - 0.277).abs() < 0.001);

        // 通道和乘以步长近似面积
        let area = intensities[0].counts() * 0.002;
        assert!((area - 5000.0).abs() / 5000.0 < 0.02, "area = {}", area);
    }

    #[test]
    fn test_analyze_spectrum_method_uses_whole_domain() {
        let mut recipe = AnalysisRecipe::new();
        recipe.elements = vec!["C".to_string()];
        recipe.fit_method = FitMethod::Spectrum;

        let analyzer = SpectrumAnalyzer::from_recipe(recipe).unwrap();
        let spectrum = synthetic_carbon_spectrum();
        let report = analyzer.analyze(&spectrum).unwrap();

        assert_eq!(report.fits.len(), 1);
        assert_eq!(report.fits[0].roi_label, "Spectrum");
        assert!(report.fits[0]
            .intensities
            .iter()
            .any(|p| p.label == "C Ka1"));
    }

    #[test]
    fn test_analyze_gates_roi_on_beam_energy() {
        let mut recipe = AnalysisRecipe::new();
        recipe.elements = vec!["Cu".to_string()];
        recipe.rois = vec![roi_spec("Roi Cu K", (7.8, 9.2))];

        let analyzer = SpectrumAnalyzer::from_recipe(recipe).unwrap();
        let energies: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
        let counts = vec![1.0; 100];
        let spectrum = Spectrum::new("lowkv", energies, counts)
            .unwrap()
            .with_beam_energy(5.0);

        let report = analyzer.analyze(&spectrum).unwrap();
        assert!(report.fits.is_empty());
    }
}
