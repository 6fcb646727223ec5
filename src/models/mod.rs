//! # 数据模型模块
//!
//! 定义能谱、感兴趣区与峰强度结果的统一数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`fit/`、`analyzer/` 和 `commands/` 使用
//! - 子模块: spectrum, roi, intensity, recipe

pub mod intensity;
pub mod recipe;
pub mod roi;
pub mod spectrum;

pub use intensity::PeakIntensity;
pub use recipe::{AnalysisRecipe, DetectorSettings, MarkerSettings, RoiSpec};
pub use roi::Roi;
pub use spectrum::Spectrum;
