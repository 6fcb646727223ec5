//! # 能谱数据模型
//!
//! 表示一条已校准的 EDS/EDX 能谱：能量轴 (keV) 与对应的计数。
//!
//! ## 依赖关系
//! - 由 `parsers/` 构造
//! - 被 `fit/`、`analyzer/` 和 `commands/` 使用
//! - 无外部模块依赖

use crate::error::{EdsfitError, Result};

/// 一条能谱：能量轴与计数一一对应
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// 谱名（通常为文件主名，用于输出文件命名）
    pub name: String,

    /// 能量轴 (keV)，严格递增
    pub energies_kev: Vec<f64>,

    /// 各通道计数
    pub counts: Vec<f64>,

    /// 入射束能量 (keV)，来自文件头，可能缺失
    pub beam_energy_kev: Option<f64>,
}

impl Spectrum {
    /// 创建能谱并校验数据一致性
    pub fn new(name: impl Into<String>, energies_kev: Vec<f64>, counts: Vec<f64>) -> Result<Self> {
        if energies_kev.is_empty() {
            return Err(EdsfitError::Other("Spectrum contains no data points".to_string()));
        }

        if energies_kev.len() != counts.len() {
            return Err(EdsfitError::Other(format!(
                "Spectrum axis length mismatch: {} energies vs {} counts",
                energies_kev.len(),
                counts.len()
            )));
        }

        // 能量轴必须严格递增，后续的区间提取依赖这一点
        for window in energies_kev.windows(2) {
            if window[1] <= window[0] {
                return Err(EdsfitError::Other(format!(
                    "Spectrum energy axis is not strictly increasing near {} keV",
                    window[0]
                )));
            }
        }

        Ok(Spectrum {
            name: name.into(),
            energies_kev,
            counts,
            beam_energy_kev: None,
        })
    }

    pub fn with_beam_energy(mut self, beam_energy_kev: f64) -> Self {
        self.beam_energy_kev = Some(beam_energy_kev);
        self
    }

    /// 通道数
    pub fn len(&self) -> usize {
        self.energies_kev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies_kev.is_empty()
    }

    /// 能量轴范围 (keV)
    pub fn energy_range_kev(&self) -> (f64, f64) {
        (
            self.energies_kev[0],
            self.energies_kev[self.energies_kev.len() - 1],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_new_valid() {
        let spectrum = Spectrum::new("test", vec![0.0, 0.01, 0.02], vec![5.0, 8.0, 3.0]).unwrap();

        assert_eq!(spectrum.len(), 3);
        assert_eq!(spectrum.energy_range_kev(), (0.0, 0.02));
        assert!(spectrum.beam_energy_kev.is_none());
    }

    #[test]
    fn test_spectrum_length_mismatch() {
        let result = Spectrum::new("test", vec![0.0, 0.01], vec![5.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_spectrum_empty() {
        let result = Spectrum::new("test", vec![], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_spectrum_non_increasing_axis() {
        let result = Spectrum::new("test", vec![0.0, 0.02, 0.01], vec![1.0, 2.0, 3.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_spectrum_with_beam_energy() {
        let spectrum = Spectrum::new("test", vec![0.0, 0.01], vec![1.0, 2.0])
            .unwrap()
            .with_beam_energy(20.0);

        assert_eq!(spectrum.beam_energy_kev, Some(20.0));
    }
}
