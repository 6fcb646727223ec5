//! # 单峰快速拟合
//!
//! 不依赖参考线目录的简化模式：在指定能量窗内拟合一个
//! 半高全宽参数化的高斯峰加线性背景。
//!
//! ## 公式
//! ```text
//! y(x) = h * exp(-ln2 * ((x - p) / s)^2) + b1 + b2 * x
//! 强度 = h * |s| * sqrt(pi / ln2)
//! ```

use std::f64::consts::{LN_2, PI};

use crate::error::{EdsfitError, Result};
use crate::fit::engine::background_guess;
use crate::fit::solver;
use crate::models::Roi;

/// 自由参数个数：h, p, s, b1, b2
const FREE_PARAMETERS: usize = 5;

/// 单峰拟合请求
#[derive(Debug, Clone)]
pub struct SinglePeakSpec {
    /// 峰标签
    pub label: String,

    /// 拟合窗口 (keV)
    pub window_kev: (f64, f64),

    /// 峰位初值 (keV)
    pub position_kev: f64,
}

/// 单峰拟合结果
#[derive(Debug, Clone)]
pub struct SinglePeakResult {
    /// 峰标签
    pub label: String,

    /// 拟合峰位 (keV)
    pub position_kev: f64,

    /// 峰高
    pub height: f64,

    /// 宽度参数 s (keV)
    pub width_kev: f64,

    /// 积分强度 h * |s| * sqrt(pi / ln2)
    pub intensity: f64,

    /// 线性背景 (b1, b2)
    pub background: (f64, f64),

    /// 是否收敛
    pub converged: bool,
}

/// 在窗口内拟合单峰
///
/// 强度不为正时视为退化拟合并返回错误，由调用方决定是否继续。
pub fn fit_single_peak(
    spec: &SinglePeakSpec,
    energies_kev: &[f64],
    counts: &[f64],
    sigma_guess_kev: f64,
) -> Result<SinglePeakResult> {
    let window = Roi::new(&spec.label, spec.window_kev)?;
    let (x, y) = window.extract(energies_kev, counts);

    if x.len() < FREE_PARAMETERS {
        return Err(EdsfitError::DegenerateFit {
            label: spec.label.clone(),
            reason: format!(
                "{} data points for {} free parameters",
                x.len(),
                FREE_PARAMETERS
            ),
        });
    }

    let height_guess = y[y.len() / 2];
    let (bg_a, bg_b) = background_guess(&x, &y);

    let x0 = [
        height_guess,
        spec.position_kev,
        sigma_guess_kev,
        bg_a,
        bg_b,
    ];
    let lower = [f64::NEG_INFINITY; FREE_PARAMETERS];
    let upper = [f64::INFINITY; FREE_PARAMETERS];

    let residual = |p: &[f64]| -> Vec<f64> {
        x.iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| yi - evaluate(xi, p))
            .collect()
    };

    let report = solver::least_squares(residual, &x0, &lower, &upper)?;
    let best = &report.best;

    let height = best[0];
    let width = best[2];
    let intensity = height * width.abs() * (PI / LN_2).sqrt();

    if !intensity.is_finite() || intensity <= 0.0 {
        return Err(EdsfitError::DegenerateFit {
            label: spec.label.clone(),
            reason: format!("non-positive intensity {:.6}", intensity),
        });
    }

    Ok(SinglePeakResult {
        label: spec.label.clone(),
        position_kev: best[1],
        height,
        width_kev: width,
        intensity,
        background: (best[3], best[4]),
        converged: report.converged,
    })
}

fn evaluate(x: f64, params: &[f64]) -> f64 {
    let (h, p, s, b1, b2) = (params[0], params[1], params[2], params[3], params[4]);

    let peak = if s == 0.0 {
        0.0
    } else {
        let z = (x - p) / s;
        h * (-LN_2 * z * z).exp()
    };

    peak + b1 + b2 * x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(x: &[f64], h: f64, p: f64, s: f64, b1: f64, b2: f64) -> Vec<f64> {
        x.iter().map(|&xi| evaluate(xi, &[h, p, s, b1, b2])).collect()
    }

    #[test]
    fn test_recovers_peak_parameters() {
        let x: Vec<f64> = (0..201).map(|i| 4.5 + i as f64 * 0.005).collect();
        let y = synthetic(&x, 100.0, 5.0, 0.05, 20.0, 1.0);

        let spec = SinglePeakSpec {
            label: "Cu Ka".to_string(),
            window_kev: (4.7, 5.3),
            position_kev: 4.98,
        };

        let result = fit_single_peak(&spec, &x, &y, 0.06).unwrap();

        assert!(result.converged);
        assert!((result.position_kev - 5.0).abs() < 1e-3);

        let expected = 100.0 * 0.05 * (PI / LN_2).sqrt();
        assert!(
            (result.intensity - expected).abs() / expected < 0.01,
            "intensity = {}",
            result.intensity
        );
    }

    #[test]
    fn test_intensity_matches_analytic_integral() {
        // 数值积分验证强度公式
        let h = 40.0;
        let s = 0.08;
        let step = 1e-4;
        let numeric: f64 = (0..40000)
            .map(|i| {
                let xi = -2.0 + i as f64 * step;
                h * (-LN_2 * (xi / s) * (xi / s)).exp() * step
            })
            .sum();

        let analytic = h * s * (PI / LN_2).sqrt();
        assert!((numeric - analytic).abs() / analytic < 1e-3);
    }

    #[test]
    fn test_flat_data_is_degenerate() {
        let x: Vec<f64> = (0..100).map(|i| 1.0 + i as f64 * 0.01).collect();
        let y = vec![0.0; 100];

        let spec = SinglePeakSpec {
            label: "flat".to_string(),
            window_kev: (1.0, 2.0),
            position_kev: 1.5,
        };

        assert!(fit_single_peak(&spec, &x, &y, 0.2).is_err());
    }

    #[test]
    fn test_empty_window_is_degenerate() {
        let x = vec![1.0, 2.0, 3.0];
        let y = vec![5.0, 6.0, 7.0];

        let spec = SinglePeakSpec {
            label: "out".to_string(),
            window_kev: (10.0, 11.0),
            position_kev: 10.5,
        };

        assert!(fit_single_peak(&spec, &x, &y, 0.2).is_err());
    }
}
