//! # 命名拟合参数集
//!
//! 参数描述符（值、固定标志、可选上下界）与保持声明顺序的参数集合。
//! 参数集负责在命名参数与求解器的扁平自由参数向量之间打包/解包。
//!
//! ## 依赖关系
//! - 被 `fit/engine` 和 `fit/single` 使用
//! - 无外部模块依赖

/// 单个拟合参数描述
#[derive(Debug, Clone, Copy)]
pub struct Param {
    /// 当前值（拟合前为初值，拟合后为结果）
    pub value: f64,

    /// 固定参数不参与拟合
    pub fixed: bool,

    /// 下界
    pub min: Option<f64>,

    /// 上界
    pub max: Option<f64>,
}

impl Param {
    /// 自由参数
    pub fn free(value: f64) -> Self {
        Param {
            value,
            fixed: false,
            min: None,
            max: None,
        }
    }

    /// 固定参数
    pub fn fixed(value: f64) -> Self {
        Param {
            value,
            fixed: true,
            min: None,
            max: None,
        }
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

/// 按声明顺序保存的命名参数集
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    entries: Vec<(String, Param)>,
}

impl ParamSet {
    pub fn new() -> Self {
        ParamSet {
            entries: Vec::new(),
        }
    }

    /// 追加参数，声明顺序即打包顺序
    pub fn add(&mut self, name: impl Into<String>, param: Param) {
        self.entries.push((name.into(), param));
    }

    /// 按名取值
    pub fn value(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 自由参数个数
    pub fn free_count(&self) -> usize {
        self.entries.iter().filter(|(_, p)| !p.fixed).count()
    }

    /// 打包自由参数初值向量
    pub fn pack(&self) -> Vec<f64> {
        self.entries
            .iter()
            .filter(|(_, p)| !p.fixed)
            .map(|(_, p)| p.value)
            .collect()
    }

    /// 自由参数的上下界向量，缺省为无穷
    pub fn free_bounds(&self) -> (Vec<f64>, Vec<f64>) {
        let mut lower = Vec::new();
        let mut upper = Vec::new();

        for (_, p) in self.entries.iter().filter(|(_, p)| !p.fixed) {
            lower.push(p.min.unwrap_or(f64::NEG_INFINITY));
            upper.push(p.max.unwrap_or(f64::INFINITY));
        }

        (lower, upper)
    }

    /// 将求解结果写回自由参数，固定参数不变
    pub fn unpack(&mut self, free_values: &[f64]) {
        let mut it = free_values.iter();

        for (_, p) in self.entries.iter_mut() {
            if !p.fixed {
                if let Some(&v) = it.next() {
                    p.value = v;
                }
            }
        }
    }
}
