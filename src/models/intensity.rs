//! # 峰强度结果模型
//!
//! 保存单条 X 射线峰的拟合结果曲线，并由此导出各种强度量。
//!
//! ## 公式
//! - FWHM = 2·√(2·ln2) · σ
//! - 总计数 = Σ y_peak
//! - 定宽计数 = 以拟合峰位为中心、宽度 1.2×FWHM 窗口内的 Σ y_peak
//!
//! ## 依赖关系
//! - 由 `fit/engine` 构造
//! - 被 `analyzer/export` 和 `commands/` 使用

/// 定宽积分窗口相对 FWHM 的比例
pub const FIXED_WIDTH_FACTOR: f64 = 1.2;

/// 高斯 FWHM 与标准差的换算系数 2·√(2·ln2)
pub fn fwhm_factor() -> f64 {
    2.0 * (2.0 * std::f64::consts::LN_2).sqrt()
}

/// 单条 X 射线峰的拟合结果
#[derive(Debug, Clone)]
pub struct PeakIntensity {
    /// 峰标签，例如 "Si Ka1"
    pub label: String,

    /// 区间内的能量点 (keV)
    pub x_kev: Vec<f64>,

    /// 各能量点处的拟合峰计数
    pub y_peak: Vec<f64>,

    /// 各能量点处的拟合背景计数
    pub y_background: Vec<f64>,

    /// 拟合峰位 (keV)
    pub position_kev: f64,

    /// 拟合峰宽标准差 (keV)
    pub sigma_kev: f64,

    /// 拟合是否在迭代上限内收敛
    pub converged: bool,
}

impl PeakIntensity {
    /// 拟合峰的总计数
    pub fn counts(&self) -> f64 {
        self.y_peak.iter().sum()
    }

    /// 拟合背景的总计数
    pub fn counts_background(&self) -> f64 {
        self.y_background.iter().sum()
    }

    /// 峰的半高全宽 (keV)
    pub fn fwhm_kev(&self) -> f64 {
        self.sigma_kev * fwhm_factor()
    }

    /// 峰的半高全宽 (eV)
    pub fn fwhm_ev(&self) -> f64 {
        self.fwhm_kev() * 1.0e3
    }

    /// 以峰位为中心的定宽窗口内的峰计数，窗口端点包含
    pub fn counts_from_fixed_width(&self, width_factor: f64) -> f64 {
        self.sum_in_window(&self.y_peak, width_factor)
    }

    /// 以峰位为中心的定宽窗口内的背景计数
    pub fn counts_background_from_fixed_width(&self, width_factor: f64) -> f64 {
        self.sum_in_window(&self.y_background, width_factor)
    }

    fn sum_in_window(&self, values: &[f64], width_factor: f64) -> f64 {
        let width = width_factor * self.fwhm_kev();
        let v1 = self.position_kev - width / 2.0;
        let v2 = self.position_kev + width / 2.0;

        self.x_kev
            .iter()
            .zip(values.iter())
            .filter(|(&x, _)| v1 <= x && x <= v2)
            .map(|(_, &y)| y)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_intensity() -> PeakIntensity {
        // 峰位 1.0 keV，σ = 0.05 keV，步长 0.01 keV
        let sigma = 0.05;
        let position = 1.0;
        let x_kev: Vec<f64> = (0..101).map(|i| 0.5 + i as f64 * 0.01).collect();
        let y_peak: Vec<f64> = x_kev
            .iter()
            .map(|&x| {
                let z = (x - position) / sigma;
                100.0 * (-0.5 * z * z).exp()
            })
            .collect();
        let y_background = vec![2.0; x_kev.len()];

        PeakIntensity {
            label: "Test Ka1".to_string(),
            x_kev,
            y_peak,
            y_background,
            position_kev: position,
            sigma_kev: sigma,
            converged: true,
        }
    }

    #[test]
    fn test_fwhm_relation() {
        let intensity = sample_intensity();

        let expected_kev = 0.05 * 2.0 * (2.0 * std::f64::consts::LN_2).sqrt();
        assert!((intensity.fwhm_kev() - expected_kev).abs() < 1e-12);
        assert!((intensity.fwhm_ev() - expected_kev * 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_counts_totals() {
        let intensity = sample_intensity();

        let total: f64 = intensity.y_peak.iter().sum();
        assert!((intensity.counts() - total).abs() < 1e-9);
        assert!((intensity.counts_background() - 2.0 * 101.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_width_window_is_subset() {
        let intensity = sample_intensity();

        let fixed = intensity.counts_from_fixed_width(FIXED_WIDTH_FACTOR);
        assert!(fixed > 0.0);
        assert!(fixed < intensity.counts());

        // 1.2×FWHM ≈ ±1.41σ，窗口应覆盖峰计数的大部分
        assert!(fixed > 0.8 * intensity.counts());
    }

    #[test]
    fn test_fixed_width_window_inclusive_endpoints() {
        // 构造窗口端点恰好落在采样点上的情形
        let intensity = PeakIntensity {
            label: "n".to_string(),
            x_kev: vec![0.8, 0.9, 1.0, 1.1, 1.2],
            y_peak: vec![1.0, 1.0, 1.0, 1.0, 1.0],
            y_background: vec![0.0; 5],
            position_kev: 1.0,
            // fwhm_kev = σ·2√(2ln2)；选 σ 使 1.0×FWHM = 0.4
            sigma_kev: 0.4 / (2.0 * (2.0 * std::f64::consts::LN_2).sqrt()),
            converged: true,
        };

        // 窗口 [0.8, 1.2]，端点应包含，共 5 个点
        let counts = intensity.counts_from_fixed_width(1.0);
        assert!((counts - 5.0).abs() < 1e-12);
    }
}
