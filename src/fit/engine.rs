//! # ROI 拟合引擎
//!
//! 在单个 ROI 上组装候选参考线并按所选策略拟合高斯峰与线性背景。
//!
//! ## 算法概述
//! 1. 提取 ROI 内数据点，无数据则告警跳过
//! 2. 组装候选线：主线并入强制线、按精确三元组移除排除线
//! 3. 区间内筛选，相对强度按保留线归一（和为零则告警跳过）
//! 4. 附加合成线：区间含 0 keV 时的噪声峰 "n"，双碳模式下 0.15 keV 的 "CD"
//! 5. 按策略求解并重建逐线峰曲线、背景曲线与总拟合曲线
//!
//! ## 依赖关系
//! - 使用 `catalog/`、`models/`、`fit/detector`、`fit/params`、
//!   `fit/functions`、`fit/solver`
//! - 被 `analyzer/` 调用

use std::f64::consts::PI;

use crate::catalog::{LineCatalog, XrayLine};
use crate::error::{EdsfitError, Result};
use crate::fit::detector::{self, DetectorResolution};
use crate::fit::functions::{CompositeModel, GaussianPeak, ModelFunction, PolynomialBackground};
use crate::fit::params::{Param, ParamSet};
use crate::fit::solver;
use crate::fit::FitMethod;
use crate::models::{PeakIntensity, Roi};
use crate::utils::output;

/// 合成噪声峰标签与位置
const NOISE_LABEL: &str = "n";
const NOISE_POSITION_KEV: f64 = 0.0;

/// 双碳模式合成峰标签与位置
const DOUBLE_CARBON_LABEL: &str = "CD";
const DOUBLE_CARBON_POSITION_KEV: f64 = 0.15;

/// 双碳模式下背景固定的 ROI 标签
const DOUBLE_CARBON_ROI_LABEL: &str = "Roi DC K";

/// σ 相对探测器预测的上下界比例
const SIGMA_LOWER_FACTOR: f64 = 0.8;
const SIGMA_UPPER_FACTOR: f64 = 1.2;

/// 双碳模式下碳峰 σ 的下界比例
const CARBON_SIGMA_LOWER_FACTOR: f64 = 0.9;

/// 锚定策略的电子学噪声初值与固定 Fano 因子
const ANCHOR_NOISE_INIT_EV: f64 = 40.0;
const ANCHOR_FANO_FACTOR: f64 = 0.12;

/// 单个 ROI 的完整拟合结果
#[derive(Debug, Clone)]
pub struct RoiFit {
    /// ROI 标签
    pub roi_label: String,

    /// 区间内能量点 (keV)
    pub x_kev: Vec<f64>,

    /// 区间内实测计数
    pub y_data: Vec<f64>,

    /// 总拟合曲线（背景 + 全部峰）
    pub y_fit: Vec<f64>,

    /// 背景曲线
    pub y_background: Vec<f64>,

    /// 逐线强度结果
    pub intensities: Vec<PeakIntensity>,

    /// 是否在迭代上限内收敛
    pub converged: bool,
}

impl RoiFit {
    /// 输出文件名中使用的 ROI 标签形式（空格替换为下划线）
    pub fn file_label(&self) -> String {
        self.roi_label.replace(' ', "_")
    }
}

/// 一条拟合完成的线
struct FittedLine {
    label: String,
    area: f64,
    mu: f64,
    sigma: f64,
}

/// ROI 拟合引擎
pub struct RoiFitEngine<'a> {
    detector: &'a DetectorResolution,
    catalog: &'a LineCatalog,
    required_peaks: &'a [(String, String)],
    omitted_peaks: &'a [(String, String)],
    max_position_error_kev: f64,
    double_carbon_peak: bool,
    method: FitMethod,
}

impl<'a> RoiFitEngine<'a> {
    pub fn new(detector: &'a DetectorResolution, catalog: &'a LineCatalog) -> Self {
        static EMPTY: [(String, String); 0] = [];

        RoiFitEngine {
            detector,
            catalog,
            required_peaks: &EMPTY,
            omitted_peaks: &EMPTY,
            max_position_error_kev: 0.010,
            double_carbon_peak: false,
            method: FitMethod::Peak,
        }
    }

    pub fn with_overrides(
        mut self,
        required_peaks: &'a [(String, String)],
        omitted_peaks: &'a [(String, String)],
    ) -> Self {
        self.required_peaks = required_peaks;
        self.omitted_peaks = omitted_peaks;
        self
    }

    pub fn with_max_position_error(mut self, kev: f64) -> Self {
        self.max_position_error_kev = kev;
        self
    }

    pub fn with_double_carbon_peak(mut self, enabled: bool) -> Self {
        self.double_carbon_peak = enabled;
        self
    }

    pub fn with_method(mut self, method: FitMethod) -> Self {
        self.method = method;
        self
    }

    /// 拟合单个 ROI
    ///
    /// 数据缺失或候选线组装失败返回 `Ok(None)`（已打印告警），
    /// 拟合本身的退化情形返回错误，由调用方决定是否继续。
    pub fn fit_roi(
        &self,
        roi: &Roi,
        energies_kev: &[f64],
        counts: &[f64],
    ) -> Result<Option<RoiFit>> {
        let (x, y) = roi.extract(energies_kev, counts);

        if x.is_empty() {
            output::print_warning(&format!(
                "ROI '{}' contains no data points, skipped",
                roi.label
            ));
            return Ok(None);
        }

        let candidates = match self.candidate_lines(roi) {
            Some(c) => c,
            None => return Ok(None),
        };

        if candidates.is_empty() {
            output::print_warning(&format!(
                "ROI '{}' has no candidate lines, skipped",
                roi.label
            ));
            return Ok(None);
        }

        let fit = match self.method {
            FitMethod::Peak | FitMethod::Spectrum => self.fit_peaks(roi, &x, &y, &candidates)?,
            FitMethod::Family => self.fit_peak_families(roi, &x, &y, &candidates)?,
            FitMethod::Anchored => self.fit_anchored(roi, &x, &y, &candidates)?,
        };

        Ok(Some(fit))
    }

    // ─────────────────────────────────────────────────────────────
    // 候选线组装
    // ─────────────────────────────────────────────────────────────

    fn candidate_lines(&self, roi: &Roi) -> Option<Vec<XrayLine>> {
        let mut lines = self.catalog.major_lines();

        for line in self.catalog.lines_for(self.required_peaks) {
            lines.push(line);
        }

        // 排除线按 (位置, 强度, 标签) 精确匹配移除
        for line in self.catalog.lines_for(self.omitted_peaks) {
            match lines.iter().position(|l| *l == line) {
                Some(idx) => {
                    lines.remove(idx);
                }
                None => output::print_warning(&format!("Omitted peak not found: {}", line.label)),
            }
        }

        let mut candidates = match select_in_range(&lines, roi) {
            SelectionOutcome::Lines(selected) => selected,
            SelectionOutcome::ZeroFractionSum => {
                output::print_warning(&format!(
                    "ROI '{}' candidate fractions sum to zero, skipped",
                    roi.label
                ));
                return None;
            }
        };

        if roi.contains(NOISE_POSITION_KEV) {
            candidates.push(XrayLine {
                position_kev: NOISE_POSITION_KEV,
                fraction: 1.0,
                label: NOISE_LABEL.to_string(),
            });
        }

        if self.double_carbon_peak && roi.contains(DOUBLE_CARBON_POSITION_KEV) {
            candidates.push(XrayLine {
                position_kev: DOUBLE_CARBON_POSITION_KEV,
                fraction: 1.0,
                label: DOUBLE_CARBON_LABEL.to_string(),
            });
        }

        Some(candidates)
    }

    // ─────────────────────────────────────────────────────────────
    // 主策略：逐线独立参数
    // ─────────────────────────────────────────────────────────────

    fn fit_peaks(
        &self,
        roi: &Roi,
        x: &[f64],
        y: &[f64],
        candidates: &[XrayLine],
    ) -> Result<RoiFit> {
        let roi_max = max_value(y);
        let (bg_a, bg_b) = background_guess(x, y);
        let fix_background = self.fix_background(roi);

        let mut params = ParamSet::new();
        let mut model = CompositeModel::new();

        if !roi.no_background {
            if fix_background {
                params.add("lb_a", Param::fixed(bg_a));
                params.add("lb_b", Param::fixed(bg_b));
                model.push(Box::new(PolynomialBackground::linear(Some(bg_a), Some(bg_b))));
            } else {
                params.add("lb_a", Param::free(bg_a));
                params.add("lb_b", Param::free(bg_b));
                model.push(Box::new(PolynomialBackground::linear(None, None)));
            }
        }

        let mut keys = Vec::with_capacity(candidates.len());

        for line in candidates {
            let key = line.label.replace(' ', "_");
            let sigma_guess = self.detector.sigma_kev(line.position_kev);
            let area_guess = roi_max * line.fraction * sigma_guess * (2.0 * PI).sqrt();

            params.add(format!("{}_area", key), Param::free(area_guess).with_min(0.0));
            params.add(
                format!("{}_position", key),
                self.position_param(line.position_kev, &line.label),
            );
            params.add(
                format!("{}_sigma", key),
                self.sigma_param(sigma_guess, &line.label),
            );

            model.push(Box::new(GaussianPeak::new(None, None, None)));
            keys.push(key);
        }

        self.check_enough_points(roi, x.len(), params.free_count())?;

        let x0 = params.pack();
        let (lower, upper) = params.free_bounds();
        let residual = |p: &[f64]| -> Vec<f64> {
            y.iter()
                .zip(model.evaluate(x, p))
                .map(|(&yi, mi)| yi - mi)
                .collect()
        };

        let report = solver::least_squares(residual, &x0, &lower, &upper)?;
        params.unpack(&report.best);

        let mut fitted = Vec::with_capacity(candidates.len());
        for (line, key) in candidates.iter().zip(&keys) {
            fitted.push(FittedLine {
                label: line.label.clone(),
                area: params.value(&format!("{}_area", key)).unwrap_or(0.0),
                mu: params
                    .value(&format!("{}_position", key))
                    .unwrap_or(line.position_kev),
                sigma: params
                    .value(&format!("{}_sigma", key))
                    .unwrap_or_else(|| self.detector.sigma_kev(line.position_kev)),
            });
        }

        let background = self.fitted_background(roi, &params, bg_a, bg_b);
        Ok(assemble_roi_fit(roi, x, y, background, &fitted, report.converged))
    }

    // ─────────────────────────────────────────────────────────────
    // 族策略：同族共享高度与刚性峰位偏移
    // ─────────────────────────────────────────────────────────────

    fn fit_peak_families(
        &self,
        roi: &Roi,
        x: &[f64],
        y: &[f64],
        candidates: &[XrayLine],
    ) -> Result<RoiFit> {
        let roi_max = max_value(y);
        let (bg_a, bg_b) = background_guess(x, y);
        let fix_background = self.fix_background(roi);
        let families = group_families(candidates);

        // 各成员 σ 固定为探测器在参考位置的预测
        let member_sigmas: Vec<Vec<f64>> = families
            .iter()
            .map(|f| {
                f.members
                    .iter()
                    .map(|m| self.detector.sigma_kev(m.position_kev))
                    .collect()
            })
            .collect();

        let mut params = ParamSet::new();

        if !roi.no_background {
            if fix_background {
                params.add("lb_a", Param::fixed(bg_a));
                params.add("lb_b", Param::fixed(bg_b));
            } else {
                params.add("lb_a", Param::free(bg_a));
                params.add("lb_b", Param::free(bg_b));
            }
        }

        for family in &families {
            params.add(
                format!("{}_height", family.key),
                Param::free(roi_max).with_min(0.0),
            );
            params.add(
                format!("{}_position", family.key),
                self.position_param(family.reference.position_kev, &family.reference.label),
            );
        }

        self.check_enough_points(roi, x.len(), params.free_count())?;

        let include_background = !roi.no_background;
        let x0 = params.pack();
        let (lower, upper) = params.free_bounds();
        let residual = |p: &[f64]| -> Vec<f64> {
            let mut trial = params.clone();
            trial.unpack(p);
            let modeled =
                evaluate_family_model(x, &trial, &families, &member_sigmas, include_background);
            y.iter().zip(modeled).map(|(&yi, mi)| yi - mi).collect()
        };

        let report = solver::least_squares(residual, &x0, &lower, &upper)?;
        let mut best = params.clone();
        best.unpack(&report.best);

        let mut fitted = Vec::with_capacity(candidates.len());
        for (family, sigmas) in families.iter().zip(&member_sigmas) {
            let height = best.value(&format!("{}_height", family.key)).unwrap_or(0.0);
            let position = best
                .value(&format!("{}_position", family.key))
                .unwrap_or(family.reference.position_kev);
            let shift = position - family.reference.position_kev;

            for (member, &sigma) in family.members.iter().zip(sigmas) {
                fitted.push(FittedLine {
                    label: member.label.clone(),
                    area: height * member.fraction * sigma * (2.0 * PI).sqrt(),
                    mu: member.position_kev + shift,
                    sigma,
                });
            }
        }

        let background = self.fitted_background(roi, &best, bg_a, bg_b);
        Ok(assemble_roi_fit(roi, x, y, background, &fitted, report.converged))
    }

    // ─────────────────────────────────────────────────────────────
    // 锚定策略：单一峰位，峰宽由探测器参数导出
    // ─────────────────────────────────────────────────────────────

    fn fit_anchored(
        &self,
        roi: &Roi,
        x: &[f64],
        y: &[f64],
        candidates: &[XrayLine],
    ) -> Result<RoiFit> {
        let roi_max = max_value(y);
        let (bg_a, bg_b) = background_guess(x, y);
        let fix_background = self.fix_background(roi);
        let anchor_ref = candidates[0].position_kev;

        let mut params = ParamSet::new();

        if !roi.no_background {
            if fix_background {
                params.add("lb_a", Param::fixed(bg_a));
                params.add("lb_b", Param::fixed(bg_b));
            } else {
                params.add("lb_a", Param::free(bg_a));
                params.add("lb_b", Param::free(bg_b));
            }
        }

        params.add(
            "detector_dn",
            Param::free(ANCHOR_NOISE_INIT_EV).with_min(0.0),
        );
        params.add("detector_fano", Param::fixed(ANCHOR_FANO_FACTOR));
        params.add("position", Param::free(anchor_ref));

        let mut keys = Vec::with_capacity(candidates.len());
        for line in candidates {
            let key = line.label.replace(' ', "_");
            let sigma_guess = detector::sigma_kev_unchecked(
                ANCHOR_NOISE_INIT_EV,
                ANCHOR_FANO_FACTOR,
                line.position_kev,
            );
            let area_guess = roi_max * line.fraction * sigma_guess * (2.0 * PI).sqrt();
            params.add(format!("{}_area", key), Param::free(area_guess).with_min(0.0));
            keys.push(key);
        }

        self.check_enough_points(roi, x.len(), params.free_count())?;

        let include_background = !roi.no_background;
        let x0 = params.pack();
        let (lower, upper) = params.free_bounds();
        let residual = |p: &[f64]| -> Vec<f64> {
            let mut trial = params.clone();
            trial.unpack(p);
            let modeled = evaluate_anchored_model(
                x,
                &trial,
                candidates,
                &keys,
                anchor_ref,
                include_background,
            );
            y.iter().zip(modeled).map(|(&yi, mi)| yi - mi).collect()
        };

        let report = solver::least_squares(residual, &x0, &lower, &upper)?;
        let mut best = params.clone();
        best.unpack(&report.best);

        let dn = best.value("detector_dn").unwrap_or(ANCHOR_NOISE_INIT_EV);
        let fano = best.value("detector_fano").unwrap_or(ANCHOR_FANO_FACTOR);
        let anchor = best.value("position").unwrap_or(anchor_ref);

        let mut fitted = Vec::with_capacity(candidates.len());
        for (line, key) in candidates.iter().zip(&keys) {
            let mu = anchor + (line.position_kev - anchor_ref);
            let sigma = detector::sigma_kev_unchecked(dn, fano, mu);
            fitted.push(FittedLine {
                label: line.label.clone(),
                area: best.value(&format!("{}_area", key)).unwrap_or(0.0),
                mu,
                sigma,
            });
        }

        let background = self.fitted_background(roi, &best, bg_a, bg_b);
        Ok(assemble_roi_fit(roi, x, y, background, &fitted, report.converged))
    }

    // ─────────────────────────────────────────────────────────────
    // 公用小件
    // ─────────────────────────────────────────────────────────────

    fn fix_background(&self, roi: &Roi) -> bool {
        self.double_carbon_peak && roi.label == DOUBLE_CARBON_ROI_LABEL
    }

    fn position_param(&self, reference_kev: f64, label: &str) -> Param {
        if label == NOISE_LABEL {
            Param::free(reference_kev)
        } else {
            Param::free(reference_kev).with_bounds(
                reference_kev - self.max_position_error_kev,
                reference_kev + self.max_position_error_kev,
            )
        }
    }

    fn sigma_param(&self, sigma_guess: f64, label: &str) -> Param {
        if label == NOISE_LABEL {
            Param::free(sigma_guess).with_min(0.0)
        } else if self.double_carbon_peak && is_carbon_label(label) {
            Param::free(sigma_guess).with_min(CARBON_SIGMA_LOWER_FACTOR * sigma_guess)
        } else {
            Param::free(sigma_guess).with_bounds(
                SIGMA_LOWER_FACTOR * sigma_guess,
                SIGMA_UPPER_FACTOR * sigma_guess,
            )
        }
    }

    fn fitted_background(
        &self,
        roi: &Roi,
        params: &ParamSet,
        bg_a: f64,
        bg_b: f64,
    ) -> Option<(f64, f64)> {
        if roi.no_background {
            None
        } else {
            Some((
                params.value("lb_a").unwrap_or(bg_a),
                params.value("lb_b").unwrap_or(bg_b),
            ))
        }
    }

    fn check_enough_points(&self, roi: &Roi, points: usize, free_count: usize) -> Result<()> {
        if points < free_count {
            return Err(EdsfitError::DegenerateFit {
                label: roi.label.clone(),
                reason: format!("{} data points for {} free parameters", points, free_count),
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
// 自由函数
// ─────────────────────────────────────────────────────────────

/// 区间筛选结果
enum SelectionOutcome {
    Lines(Vec<XrayLine>),
    ZeroFractionSum,
}

/// 筛出区间内的线并将相对强度按保留线归一
fn select_in_range(lines: &[XrayLine], roi: &Roi) -> SelectionOutcome {
    let in_range: Vec<&XrayLine> = lines
        .iter()
        .filter(|l| roi.contains(l.position_kev))
        .collect();

    if in_range.is_empty() {
        return SelectionOutcome::Lines(Vec::new());
    }

    let fraction_total: f64 = in_range.iter().map(|l| l.fraction).sum();
    if fraction_total <= 0.0 {
        return SelectionOutcome::ZeroFractionSum;
    }

    SelectionOutcome::Lines(
        in_range
            .into_iter()
            .map(|l| XrayLine {
                position_kev: l.position_kev,
                fraction: l.fraction / fraction_total,
                label: l.label.clone(),
            })
            .collect(),
    )
}

/// 线族：以标签前四个字符归组
struct Family<'b> {
    key: String,
    members: Vec<&'b XrayLine>,
    reference: XrayLine,
}

fn group_families(candidates: &[XrayLine]) -> Vec<Family<'_>> {
    let mut families: Vec<(String, Vec<&XrayLine>)> = Vec::new();

    for line in candidates {
        let prefix: String = line.label.chars().take(4).collect();
        match families.iter_mut().find(|(p, _)| *p == prefix) {
            Some((_, members)) => members.push(line),
            None => families.push((prefix, vec![line])),
        }
    }

    families
        .into_iter()
        .map(|(prefix, members)| {
            let reference = family_reference(&members).clone();
            Family {
                key: prefix.replace(' ', "_"),
                members,
                reference,
            }
        })
        .collect()
}

/// 族参考线：a1 成员优先，噪声族取自身，否则取强度最高者
fn family_reference<'b>(members: &[&'b XrayLine]) -> &'b XrayLine {
    if let Some(a1) = members.iter().find(|m| m.label.ends_with("a1")) {
        return a1;
    }

    if let Some(noise) = members.iter().find(|m| m.label == NOISE_LABEL) {
        return noise;
    }

    members
        .iter()
        .fold(members[0], |best, m| {
            if m.fraction > best.fraction {
                m
            } else {
                best
            }
        })
}

fn evaluate_family_model(
    x: &[f64],
    trial: &ParamSet,
    families: &[Family<'_>],
    member_sigmas: &[Vec<f64>],
    include_background: bool,
) -> Vec<f64> {
    let mut total = background_curve(x, trial, include_background);

    for (family, sigmas) in families.iter().zip(member_sigmas) {
        let height = trial
            .value(&format!("{}_height", family.key))
            .unwrap_or(0.0);
        let position = trial
            .value(&format!("{}_position", family.key))
            .unwrap_or(family.reference.position_kev);
        let shift = position - family.reference.position_kev;

        for (member, &sigma) in family.members.iter().zip(sigmas) {
            let area = height * member.fraction * sigma * (2.0 * PI).sqrt();
            let mu = member.position_kev + shift;
            accumulate_gaussian(&mut total, x, area, mu, sigma);
        }
    }

    total
}

fn evaluate_anchored_model(
    x: &[f64],
    trial: &ParamSet,
    candidates: &[XrayLine],
    keys: &[String],
    anchor_ref: f64,
    include_background: bool,
) -> Vec<f64> {
    let mut total = background_curve(x, trial, include_background);

    let dn = trial.value("detector_dn").unwrap_or(ANCHOR_NOISE_INIT_EV);
    let fano = trial.value("detector_fano").unwrap_or(ANCHOR_FANO_FACTOR);
    let anchor = trial.value("position").unwrap_or(anchor_ref);

    for (line, key) in candidates.iter().zip(keys) {
        let area = trial.value(&format!("{}_area", key)).unwrap_or(0.0);
        let mu = anchor + (line.position_kev - anchor_ref);
        let sigma = detector::sigma_kev_unchecked(dn, fano, mu);
        accumulate_gaussian(&mut total, x, area, mu, sigma);
    }

    total
}

fn background_curve(x: &[f64], trial: &ParamSet, include_background: bool) -> Vec<f64> {
    if include_background {
        let a = trial.value("lb_a").unwrap_or(0.0);
        let b = trial.value("lb_b").unwrap_or(0.0);
        x.iter().map(|&xi| a + b * xi).collect()
    } else {
        vec![0.0; x.len()]
    }
}

fn accumulate_gaussian(total: &mut [f64], x: &[f64], area: f64, mu: f64, sigma: f64) {
    let curve = gaussian_curve(x, area, mu, sigma);
    for (t, v) in total.iter_mut().zip(curve) {
        *t += v;
    }
}

fn gaussian_curve(x: &[f64], area: f64, mu: f64, sigma: f64) -> Vec<f64> {
    GaussianPeak::new(None, None, None).evaluate(x, &[area, mu, sigma])
}

/// 端点法背景初值：斜率取两端连线，截距过首点
pub(crate) fn background_guess(x: &[f64], y: &[f64]) -> (f64, f64) {
    if x.len() < 2 {
        return (y.first().copied().unwrap_or(0.0), 0.0);
    }

    let dx = x[x.len() - 1] - x[0];
    if dx == 0.0 {
        return (y[0], 0.0);
    }

    let b = (y[y.len() - 1] - y[0]) / dx;
    let a = y[0] - b * x[0];
    (a, b)
}

fn max_value(values: &[f64]) -> f64 {
    values.iter().fold(0.0f64, |acc, &v| acc.max(v))
}

fn is_carbon_label(label: &str) -> bool {
    label.starts_with("C K") || label == DOUBLE_CARBON_LABEL
}

fn assemble_roi_fit(
    roi: &Roi,
    x: &[f64],
    y: &[f64],
    background: Option<(f64, f64)>,
    lines: &[FittedLine],
    converged: bool,
) -> RoiFit {
    let y_background: Vec<f64> = match background {
        Some((a, b)) => x.iter().map(|&xi| a + b * xi).collect(),
        None => vec![0.0; x.len()],
    };

    let mut y_fit = y_background.clone();
    let mut intensities = Vec::with_capacity(lines.len());

    for line in lines {
        let y_peak = gaussian_curve(x, line.area, line.mu, line.sigma);
        for (t, &v) in y_fit.iter_mut().zip(y_peak.iter()) {
            *t += v;
        }

        intensities.push(PeakIntensity {
            label: line.label.clone(),
            x_kev: x.to_vec(),
            y_peak,
            y_background: y_background.clone(),
            position_kev: line.mu,
            sigma_kev: line.sigma,
            converged,
        });
    }

    RoiFit {
        roi_label: roi.label.clone(),
        x_kev: x.to_vec(),
        y_data: y.to_vec(),
        y_fit,
        y_background,
        intensities,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LineCatalog;

    fn line(position_kev: f64, fraction: f64, label: &str) -> XrayLine {
        XrayLine {
            position_kev,
            fraction,
            label: label.to_string(),
        }
    }

    fn catalog_of(symbols: &[&str]) -> LineCatalog {
        let symbols: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
        LineCatalog::new(&symbols).unwrap()
    }

    /// 以探测器预测宽度在给定位置合成一个峰
    fn synthesize(
        detector: &DetectorResolution,
        x: &[f64],
        area: f64,
        position_kev: f64,
        bg_a: f64,
        bg_b: f64,
    ) -> Vec<f64> {
        let sigma = detector.sigma_kev(position_kev);
        x.iter()
            .map(|&xi| {
                let z = (xi - position_kev) / sigma;
                area / (sigma * (2.0 * PI).sqrt()) * (-0.5 * z * z).exp() + bg_a + bg_b * xi
            })
            .collect()
    }

    #[test]
    fn test_select_in_range_renormalizes() {
        let roi = Roi::new("test", (1.0, 2.0)).unwrap();
        let lines = vec![
            line(1.2, 0.3, "A Ka1"),
            line(1.8, 0.1, "A Kb1"),
            line(5.0, 0.6, "B Ka1"),
        ];

        match select_in_range(&lines, &roi) {
            SelectionOutcome::Lines(selected) => {
                assert_eq!(selected.len(), 2);
                assert!((selected[0].fraction - 0.75).abs() < 1e-12);
                assert!((selected[1].fraction - 0.25).abs() < 1e-12);
            }
            SelectionOutcome::ZeroFractionSum => panic!("unexpected degenerate selection"),
        }
    }

    #[test]
    fn test_select_in_range_zero_fraction_sum() {
        let roi = Roi::new("test", (1.0, 2.0)).unwrap();
        let lines = vec![line(1.2, 0.0, "A Ka1")];

        assert!(matches!(
            select_in_range(&lines, &roi),
            SelectionOutcome::ZeroFractionSum
        ));
    }

    #[test]
    fn test_candidate_lines_synthetic_noise_and_carbon() {
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();
        let catalog = catalog_of(&["C"]);
        let engine = RoiFitEngine::new(&detector, &catalog).with_double_carbon_peak(true);

        let roi = Roi::new("Roi DC K", (0.0, 0.36)).unwrap();
        let candidates = engine.candidate_lines(&roi).unwrap();

        assert!(candidates.iter().any(|l| l.label == "C Ka1"));
        assert!(candidates.iter().any(|l| l.label == "n"));
        assert!(candidates.iter().any(|l| l.label == "CD"));
    }

    #[test]
    fn test_fit_roi_no_data_returns_none() {
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();
        let catalog = catalog_of(&["C"]);
        let engine = RoiFitEngine::new(&detector, &catalog);

        // ROI 超出数据范围
        let roi = Roi::new("Roi C K", (5.0, 6.0)).unwrap();
        let energies: Vec<f64> = (0..100).map(|i| i as f64 * 0.01).collect();
        let counts = vec![1.0; 100];

        let outcome = engine.fit_roi(&roi, &energies, &counts).unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn test_fit_roi_recovers_carbon_peak() {
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();
        let catalog = catalog_of(&["C"]);
        let engine = RoiFitEngine::new(&detector, &catalog);

        let step = 0.002;
        let energies: Vec<f64> = (0..300).map(|i| 0.02 + i as f64 * step).collect();
        let counts = synthesize(&detector, &energies, 5000.0, 0.277, 10.0, 5.0);

        let roi = Roi::new("Roi C K", (0.16, 0.4)).unwrap();
        let fit = engine.fit_roi(&roi, &energies, &counts).unwrap().unwrap();

        assert!(fit.converged);
        assert_eq!(fit.intensities.len(), 1);

        let peak = &fit.intensities[0];
        assert_eq!(peak.label, "C Ka1");
        assert!(
            (peak.position_kev - 0.277).abs() < 0.001,
            "position = {}",
            peak.position_kev
        );

        // 通道和乘以步长近似面积
        let recovered_area = peak.counts() * step;
        assert!(
            (recovered_area - 5000.0).abs() / 5000.0 < 0.02,
            "area = {}",
            recovered_area
        );
    }

    #[test]
    fn test_fit_roi_family_strategy() {
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();
        let catalog = catalog_of(&["C"]);
        let engine = RoiFitEngine::new(&detector, &catalog).with_method(FitMethod::Family);

        let step = 0.002;
        let energies: Vec<f64> = (0..300).map(|i| 0.02 + i as f64 * step).collect();
        let counts = synthesize(&detector, &energies, 5000.0, 0.277, 10.0, 5.0);

        let roi = Roi::new("Roi C K", (0.16, 0.4)).unwrap();
        let fit = engine.fit_roi(&roi, &energies, &counts).unwrap().unwrap();

        assert!(fit.converged);
        let peak = &fit.intensities[0];
        let recovered_area = peak.counts() * step;
        assert!(
            (recovered_area - 5000.0).abs() / 5000.0 < 0.02,
            "area = {}",
            recovered_area
        );
    }

    #[test]
    fn test_fit_roi_anchored_strategy() {
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();
        let catalog = catalog_of(&["C"]);
        let engine = RoiFitEngine::new(&detector, &catalog).with_method(FitMethod::Anchored);

        let step = 0.002;
        let energies: Vec<f64> = (0..300).map(|i| 0.02 + i as f64 * step).collect();
        let counts = synthesize(&detector, &energies, 5000.0, 0.277, 10.0, 5.0);

        let roi = Roi::new("Roi C K", (0.16, 0.4)).unwrap();
        let fit = engine.fit_roi(&roi, &energies, &counts).unwrap().unwrap();

        let peak = &fit.intensities[0];
        let recovered_area = peak.counts() * step;
        assert!(
            (recovered_area - 5000.0).abs() / 5000.0 < 0.05,
            "area = {}",
            recovered_area
        );
        assert!(
            (peak.position_kev - 0.277).abs() < 0.005,
            "position = {}",
            peak.position_kev
        );
    }

    #[test]
    fn test_group_families() {
        let candidates = vec![
            line(8.048, 0.6, "Cu Ka1"),
            line(8.028, 0.3, "Cu Ka2"),
            line(8.905, 0.1, "Cu Kb1"),
            line(0.0, 1.0, "n"),
        ];

        let families = group_families(&candidates);

        // "Cu K" 一族三条线，噪声单独一族
        assert_eq!(families.len(), 2);
        assert_eq!(families[0].members.len(), 3);
        assert_eq!(families[0].reference.label, "Cu Ka1");
        assert_eq!(families[1].members.len(), 1);
        assert_eq!(families[1].reference.label, "n");
    }

    #[test]
    fn test_family_reference_fallback_highest_fraction() {
        let members_owned = vec![line(1.0, 0.2, "X Kb1"), line(1.1, 0.5, "X Kb3")];
        let members: Vec<&XrayLine> = members_owned.iter().collect();

        assert_eq!(family_reference(&members).label, "X Kb3");
    }

    #[test]
    fn test_background_guess_endpoints() {
        let x = vec![1.0, 1.5, 2.0];
        let y = vec![10.0, 13.0, 20.0];

        let (a, b) = background_guess(&x, &y);

        // 斜率 (20-10)/(2-1) = 10，截距 10 - 10*1 = 0
        assert!((b - 10.0).abs() < 1e-12);
        assert!(a.abs() < 1e-12);
    }
}
