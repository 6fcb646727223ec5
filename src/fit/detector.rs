//! # 探测器能量分辨率模型
//!
//! 由电子学噪声与 Fano 因子给出任意能量处的峰宽预测。
//!
//! ## 公式
//! FWHM(E) = √(DN² + K²·ε·F·E)
//!
//! 其中 DN 为电子学噪声 (eV)，K = 2√(2·ln2)，ε = 3.8 eV 为 Si 的
//! 电子-空穴对平均生成能，F 为 Fano 因子，E 为 X 射线能量 (eV)。
//!
//! ## 依赖关系
//! - 被 `fit/engine` 调用给出峰宽初值与预测
//! - 使用 `models/intensity` 的 FWHM 换算系数

use crate::error::{EdsfitError, Result};
use crate::models::intensity::fwhm_factor;

/// Si 的电子-空穴对平均生成能 (eV)
const ELECTRON_HOLE_PAIR_EV: f64 = 3.8;

/// 探测器能量分辨率
#[derive(Debug, Clone, Copy)]
pub struct DetectorResolution {
    electronic_noise_ev: f64,
    fano_factor: f64,
}

impl DetectorResolution {
    /// 创建分辨率模型，负常数为致命配置错误
    pub fn new(electronic_noise_ev: f64, fano_factor: f64) -> Result<Self> {
        if electronic_noise_ev < 0.0 || !electronic_noise_ev.is_finite() {
            return Err(EdsfitError::ConfigError(format!(
                "Electronic noise must be non-negative, got {} eV",
                electronic_noise_ev
            )));
        }

        if fano_factor < 0.0 || !fano_factor.is_finite() {
            return Err(EdsfitError::ConfigError(format!(
                "Fano factor must be non-negative, got {}",
                fano_factor
            )));
        }

        Ok(DetectorResolution {
            electronic_noise_ev,
            fano_factor,
        })
    }

    pub fn electronic_noise_ev(&self) -> f64 {
        self.electronic_noise_ev
    }

    pub fn fano_factor(&self) -> f64 {
        self.fano_factor
    }

    /// 能量 E (eV) 处的半高全宽 (eV)
    pub fn fwhm_ev(&self, energy_ev: f64) -> f64 {
        fwhm_unchecked(self.electronic_noise_ev, self.fano_factor, energy_ev)
    }

    /// 能量 E (keV) 处的高斯标准差 (keV)
    pub fn sigma_kev(&self, energy_kev: f64) -> f64 {
        sigma_kev_unchecked(self.electronic_noise_ev, self.fano_factor, energy_kev)
    }
}

/// 不经参数校验的 FWHM 计算，供拟合闭包在迭代中使用
pub(crate) fn fwhm_unchecked(noise_ev: f64, fano_factor: f64, energy_ev: f64) -> f64 {
    let k = fwhm_factor();
    // 迭代中能量可为负，方差截断到零
    (noise_ev * noise_ev + k * k * ELECTRON_HOLE_PAIR_EV * fano_factor * energy_ev)
        .max(0.0)
        .sqrt()
}

/// 不经参数校验的 σ (keV) 计算
pub(crate) fn sigma_kev_unchecked(noise_ev: f64, fano_factor: f64, energy_kev: f64) -> f64 {
    fwhm_unchecked(noise_ev, fano_factor, energy_kev * 1.0e3) / fwhm_factor() / 1.0e3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fwhm_monotonic_in_energy() {
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();

        let mut previous = 0.0;
        for e_ev in [100.0, 500.0, 1000.0, 5000.0, 10000.0, 20000.0] {
            let fwhm = detector.fwhm_ev(e_ev);
            assert!(fwhm > previous, "FWHM must increase with energy");
            previous = fwhm;
        }
    }

    #[test]
    fn test_fwhm_at_mn_ka() {
        // 50 eV 噪声 + Fano 0.114 在 Mn Ka 处约 129 eV
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();
        let fwhm = detector.fwhm_ev(5898.75);

        assert!(fwhm > 127.0 && fwhm < 131.0, "got {}", fwhm);
    }

    #[test]
    fn test_sigma_kev_consistent_with_fwhm() {
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();

        let sigma = detector.sigma_kev(5.89875);
        let fwhm_ev = detector.fwhm_ev(5898.75);
        let factor = 2.0 * (2.0 * std::f64::consts::LN_2).sqrt();

        assert!((sigma * factor * 1.0e3 - fwhm_ev).abs() < 1e-9);
    }

    #[test]
    fn test_zero_energy_gives_noise_floor() {
        let detector = DetectorResolution::new(50.0, 0.114).unwrap();
        assert!((detector.fwhm_ev(0.0) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_constants_rejected() {
        assert!(DetectorResolution::new(-1.0, 0.114).is_err());
        assert!(DetectorResolution::new(50.0, -0.1).is_err());
    }
}
