//! # 峰拟合模块
//!
//! ROI 内的高斯峰 + 线性背景拟合，输出各 X 射线峰的强度。
//!
//! ## 子模块
//! - `detector`: 探测器能量分辨率模型
//! - `params`: 命名拟合参数集
//! - `functions`: 峰形与背景模型函数
//! - `solver`: 带约束的最小二乘求解器
//! - `engine`: ROI 候选线组装与三种拟合策略
//! - `single`: 独立单峰拟合
//!
//! ## 依赖关系
//! - 使用 `models/` 与 `catalog/`
//! - 被 `analyzer/` 和 `commands/` 使用

pub mod detector;
pub mod engine;
pub mod functions;
pub mod params;
pub mod single;
pub mod solver;

use serde::{Deserialize, Serialize};

pub use detector::DetectorResolution;
pub use engine::{RoiFit, RoiFitEngine};
pub use single::{fit_single_peak, SinglePeakResult, SinglePeakSpec};

/// 拟合策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMethod {
    /// 每条线独立的面积/峰位/峰宽
    #[default]
    Peak,

    /// 同族线共享高度与刚性峰位偏移
    Family,

    /// 单一锚定峰位，峰宽由探测器模型导出
    Anchored,

    /// 整谱单区间拟合
    Spectrum,
}
