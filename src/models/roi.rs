//! # 感兴趣区 (ROI) 数据模型
//!
//! 表示能谱上的一段拟合区间：标签 + 能量范围。
//!
//! ## 依赖关系
//! - 被 `fit/` 和 `analyzer/` 使用
//! - 无外部模块依赖

use crate::error::{EdsfitError, Result};

/// 能谱感兴趣区
#[derive(Debug, Clone)]
pub struct Roi {
    /// 区间标签，例如 "Roi C K"
    pub label: String,

    /// 能量范围 (keV)，闭区间 [min, max]
    pub energy_range_kev: (f64, f64),

    /// 拟合时不包含线性背景项
    pub no_background: bool,
}

impl Roi {
    /// 创建 ROI 并校验能量范围
    pub fn new(label: impl Into<String>, energy_range_kev: (f64, f64)) -> Result<Self> {
        let label = label.into();
        let (e_min, e_max) = energy_range_kev;

        if !e_min.is_finite() || !e_max.is_finite() || e_min >= e_max {
            return Err(EdsfitError::ConfigError(format!(
                "Invalid ROI '{}': energy range [{}, {}] keV",
                label, e_min, e_max
            )));
        }

        Ok(Roi {
            label,
            energy_range_kev,
            no_background: false,
        })
    }

    pub fn without_background(mut self) -> Self {
        self.no_background = true;
        self
    }

    /// 判断能量点是否落在区间内（闭区间）
    pub fn contains(&self, energy_kev: f64) -> bool {
        let (e_min, e_max) = self.energy_range_kev;
        e_min <= energy_kev && energy_kev <= e_max
    }

    /// 提取区间内的数据点，端点包含
    pub fn extract(&self, energies_kev: &[f64], counts: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();

        for (&e, &c) in energies_kev.iter().zip(counts.iter()) {
            if self.contains(e) {
                x.push(e);
                y.push(c);
            }
        }

        (x, y)
    }
}
