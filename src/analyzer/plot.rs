//! # 分析图表生成
//!
//! 使用 `plotters` 库生成 ROI 拟合诊断图与全谱概览图。
//!
//! ## 功能
//! - ROI 图：实测点、总拟合、背景与逐峰曲线，下方残差子图
//! - 概览图：全谱曲线、参考线标记、ROI 区带与拟合叠加
//! - 概览图支持线性与对数计数轴
//!
//! ## 依赖关系
//! - 被 `analyzer/mod.rs` 调用
//! - 使用 `fit/engine.rs` 的 RoiFit 与 `catalog/` 的标记类型
//! - 使用 `plotters` 渲染图表

use crate::catalog::{EnergyMarker, XrayLine};
use crate::error::{EdsfitError, Result};
use crate::fit::RoiFit;
use crate::models::Roi;

use plotters::prelude::*;
use std::path::Path;

/// 逐峰曲线的循环配色
const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(214, 39, 40),
    RGBColor(44, 160, 44),
    RGBColor(148, 103, 189),
    RGBColor(255, 127, 14),
    RGBColor(140, 86, 75),
    RGBColor(23, 190, 207),
];

/// 主曲线颜色
const CURVE_COLOR: RGBColor = RGBColor(0, 102, 204);

/// 背景曲线颜色
const BACKGROUND_COLOR: RGBColor = RGBColor(120, 120, 120);

/// 边缘与逃逸峰标记的轴比例高度
const MARKER_FRACTION: f64 = 0.2;

/// 对数轴的计数下限
const LOG_FLOOR: f64 = 0.5;

/// 概览图的输入数据与标记集
pub struct OverviewData<'a> {
    /// 能量轴 (keV)
    pub energies_kev: &'a [f64],

    /// 各通道计数
    pub counts: &'a [f64],

    /// 吸收边标记（红）
    pub edges: &'a [EnergyMarker],

    /// Si 逃逸峰标记（绿）
    pub escapes: &'a [EnergyMarker],

    /// 参考线标记（黑，标高按相对强度）
    pub lines: &'a [XrayLine],

    /// ROI 区带
    pub rois: &'a [Roi],

    /// 拟合曲线叠加
    pub fits: &'a [RoiFit],
}

/// 生成单个 ROI 的拟合诊断图 (PNG)
pub fn render_roi_fit(
    fit: &RoiFit,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
    draw_roi_chart(&root, fit, title)?;
    root.present()
        .map_err(|e| EdsfitError::Other(e.to_string()))?;
    Ok(())
}

/// 生成全谱概览图 (PNG)
pub fn render_overview(
    data: &OverviewData<'_>,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    log_scale: bool,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
    if log_scale {
        draw_overview_log(&root, data, title)?;
    } else {
        draw_overview_linear(&root, data, title)?;
    }
    root.present()
        .map_err(|e| EdsfitError::Other(e.to_string()))?;
    Ok(())
}

/// 绘制 ROI 拟合图：上为曲线，下为残差
fn draw_roi_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    fit: &RoiFit,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    if fit.x_kev.len() < 2 {
        return Ok(());
    }

    root.fill(&WHITE)
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    let (_, h) = root.dim_in_pixel();
    let (upper, lower) = root.split_vertically((h as f32 * 0.72) as u32);

    let x_min = fit.x_kev[0];
    let x_max = fit.x_kev[fit.x_kev.len() - 1];

    let y_max = fit
        .y_data
        .iter()
        .chain(fit.y_fit.iter())
        .fold(1.0f64, |acc, &v| acc.max(v))
        * 1.05;

    let mut chart = ChartBuilder::on(&upper)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .y_desc("Counts")
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    // 实测数据点
    chart
        .draw_series(
            fit.x_kev
                .iter()
                .zip(fit.y_data.iter())
                .map(|(&x, &y)| Circle::new((x, y), 2, BLACK.filled())),
        )
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    // 总拟合曲线
    chart
        .draw_series(LineSeries::new(
            fit.x_kev.iter().zip(fit.y_fit.iter()).map(|(&x, &y)| (x, y)),
            CURVE_COLOR.stroke_width(2),
        ))
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    // 背景曲线
    chart
        .draw_series(LineSeries::new(
            fit.x_kev
                .iter()
                .zip(fit.y_background.iter())
                .map(|(&x, &y)| (x, y)),
            BACKGROUND_COLOR.stroke_width(1),
        ))
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    // 逐峰曲线与标签
    for (idx, peak) in fit.intensities.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];

        chart
            .draw_series(LineSeries::new(
                fit.x_kev
                    .iter()
                    .zip(peak.y_peak.iter())
                    .zip(peak.y_background.iter())
                    .map(|((&x, &yp), &yb)| (x, yp + yb)),
                color.stroke_width(1),
            ))
            .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

        // 峰顶标签
        let apex = peak
            .y_peak
            .iter()
            .zip(peak.y_background.iter())
            .fold(0.0f64, |acc, (&yp, &yb)| acc.max(yp + yb));

        if peak.position_kev >= x_min && peak.position_kev <= x_max {
            let text_style = ("sans-serif", 12).into_font().color(&color);
            chart
                .draw_series(std::iter::once(Text::new(
                    peak.label.clone(),
                    (peak.position_kev, (apex + 0.02 * y_max).min(y_max)),
                    text_style,
                )))
                .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;
        }
    }

    // 残差子图
    let residuals: Vec<(f64, f64)> = fit
        .x_kev
        .iter()
        .zip(fit.y_data.iter().zip(fit.y_fit.iter()))
        .map(|(&x, (&yd, &yf))| (x, yd - yf))
        .collect();

    let res_max = residuals
        .iter()
        .fold(1.0f64, |acc, &(_, r)| acc.max(r.abs()));

    let mut residual_chart = ChartBuilder::on(&lower)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, -res_max..res_max)
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    residual_chart
        .configure_mesh()
        .x_desc("Energy (keV)")
        .y_desc("Residual")
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    residual_chart
        .draw_series(LineSeries::new(
            vec![(x_min, 0.0), (x_max, 0.0)],
            BACKGROUND_COLOR.stroke_width(1),
        ))
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    residual_chart
        .draw_series(LineSeries::new(residuals, BLACK.stroke_width(1)))
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    Ok(())
}

/// 标记在数据坐标下的标高：线性轴按最大值比例，对数轴按十倍程比例
fn marker_height(fraction: f64, y_min: f64, y_max: f64, log_scale: bool) -> f64 {
    if log_scale {
        y_min * (y_max / y_min).powf(fraction)
    } else {
        y_max * fraction
    }
}

/// 绘制线性计数轴概览图
fn draw_overview_linear<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &OverviewData<'_>,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    if data.energies_kev.len() < 2 {
        return Ok(());
    }

    root.fill(&WHITE)
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    let x_min = data.energies_kev[0];
    let x_max = data.energies_kev[data.energies_kev.len() - 1];
    let y_max = data.counts.iter().fold(1.0f64, |acc, &v| acc.max(v)) * 1.05;
    let y_min = 0.0;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Energy (keV)")
        .y_desc("Counts")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    draw_roi_bands(&mut chart, data, y_min, y_max)?;
    draw_spectrum_series(&mut chart, data, None)?;
    draw_markers(&mut chart, data, x_min, x_max, y_min, y_max, false)?;

    Ok(())
}

/// 绘制对数计数轴概览图
fn draw_overview_log<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &OverviewData<'_>,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    if data.energies_kev.len() < 2 {
        return Ok(());
    }

    root.fill(&WHITE)
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    let x_min = data.energies_kev[0];
    let x_max = data.energies_kev[data.energies_kev.len() - 1];
    let y_max = data.counts.iter().fold(1.0f64, |acc, &v| acc.max(v)) * 1.5;
    let y_min = LOG_FLOOR;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, (y_min..y_max).log_scale())
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Energy (keV)")
        .y_desc("Counts")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    draw_roi_bands(&mut chart, data, y_min, y_max)?;
    draw_spectrum_series(&mut chart, data, Some(LOG_FLOOR))?;
    draw_markers(&mut chart, data, x_min, x_max, y_min, y_max, true)?;

    Ok(())
}

/// ROI 区带
fn draw_roi_bands<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    data: &OverviewData<'_>,
    y_min: f64,
    y_max: f64,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let band_color = RGBColor(44, 160, 44).mix(0.2);

    for roi in data.rois {
        let (r_min, r_max) = roi.energy_range_kev;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(r_min, y_min), (r_max, y_max)],
                band_color.filled(),
            )))
            .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;
    }

    Ok(())
}

/// 谱曲线与拟合叠加
fn draw_spectrum_series<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    data: &OverviewData<'_>,
    floor: Option<f64>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let clamp = |y: f64| match floor {
        Some(f) => y.max(f),
        None => y,
    };

    chart
        .draw_series(LineSeries::new(
            data.energies_kev
                .iter()
                .zip(data.counts.iter())
                .map(|(&x, &y)| (x, clamp(y))),
            CURVE_COLOR.stroke_width(1),
        ))
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    for (idx, fit) in data.fits.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        chart
            .draw_series(LineSeries::new(
                fit.x_kev
                    .iter()
                    .zip(fit.y_fit.iter())
                    .map(|(&x, &y)| (x, clamp(y))),
                color.stroke_width(2),
            ))
            .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;
    }

    Ok(())
}

/// 参考线标记：竖线加顶端文字
fn draw_markers<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    data: &OverviewData<'_>,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    log_scale: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let y_bottom = if log_scale { LOG_FLOOR } else { 0.0 };

    for marker in data.edges {
        if marker.position_kev < x_min || marker.position_kev > x_max {
            continue;
        }
        let top = marker_height(MARKER_FRACTION, y_min, y_max, log_scale);
        draw_stick(chart, marker.position_kev, y_bottom, top, &marker.label, RED)?;
    }

    for marker in data.escapes {
        if marker.position_kev < x_min || marker.position_kev > x_max {
            continue;
        }
        let top = marker_height(MARKER_FRACTION, y_min, y_max, log_scale);
        draw_stick(
            chart,
            marker.position_kev,
            y_bottom,
            top,
            &marker.label,
            RGBColor(44, 160, 44),
        )?;
    }

    for line in data.lines {
        if line.position_kev < x_min || line.position_kev > x_max {
            continue;
        }
        let top = marker_height(line.fraction, y_min, y_max, log_scale);
        draw_stick(chart, line.position_kev, y_bottom, top, &line.label, BLACK)?;
    }

    Ok(())
}

fn draw_stick<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    x: f64,
    y_bottom: f64,
    y_top: f64,
    label: &str,
    color: RGBColor,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x, y_bottom), (x, y_top)],
            color.stroke_width(1),
        )))
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    let text_style = ("sans-serif", 11).into_font().color(&color);
    chart
        .draw_series(std::iter::once(Text::new(
            label.to_string(),
            (x, y_top),
            text_style,
        )))
        .map_err(|e| EdsfitError::Other(format!("{:?}", e)))?;

    Ok(())
}
