//! # 峰形与背景模型函数
//!
//! 每个模型函数的参数在构造时给定为固定常数或留空参与拟合。
//! 组合器把扁平自由参数向量按声明顺序切分给各成员。
//!
//! ## 公式
//! - 高斯峰: y = A / (σ·√(2π)) · exp(−(x−μ)² / 2σ²)
//! - 多项式背景: y = a₀ + a₁·x + a₂·x² + a₃·x³ (次数 1 至 3)
//!
//! ## 依赖关系
//! - 被 `fit/engine` 调用构造复合模型
//! - 无外部模块依赖

use crate::error::{EdsfitError, Result};

/// 可拟合的模型函数
pub trait ModelFunction {
    /// 自由参数个数
    fn free_parameter_count(&self) -> usize;

    /// 在各 x 处求值，`params` 为该函数的自由参数切片（声明顺序）
    fn evaluate(&self, x: &[f64], params: &[f64]) -> Vec<f64>;
}

/// 面积/峰位/峰宽参数化的高斯峰
///
/// 构造时传 `Some(v)` 的参数固定为 v，传 `None` 的参数参与拟合，
/// 自由参数在向量中的顺序为 (面积, 峰位, 峰宽)。
#[derive(Debug, Clone, Copy)]
pub struct GaussianPeak {
    area: Option<f64>,
    mu: Option<f64>,
    sigma: Option<f64>,
}

impl GaussianPeak {
    pub fn new(area: Option<f64>, mu: Option<f64>, sigma: Option<f64>) -> Self {
        GaussianPeak { area, mu, sigma }
    }

    /// 解析出给定自由参数下的 (面积, 峰位, 峰宽)
    pub fn resolve(&self, params: &[f64]) -> (f64, f64, f64) {
        let mut idx = 0;
        let mut take = |fixed: Option<f64>| match fixed {
            Some(v) => v,
            None => {
                let v = params[idx];
                idx += 1;
                v
            }
        };

        let area = take(self.area);
        let mu = take(self.mu);
        let sigma = take(self.sigma);
        (area, mu, sigma)
    }
}

impl ModelFunction for GaussianPeak {
    fn free_parameter_count(&self) -> usize {
        [self.area, self.mu, self.sigma]
            .iter()
            .filter(|p| p.is_none())
            .count()
    }

    fn evaluate(&self, x: &[f64], params: &[f64]) -> Vec<f64> {
        let (area, mu, sigma) = self.resolve(params);

        // σ = 0 时贡献为零，避免除零
        if sigma.abs() < f64::EPSILON {
            return vec![0.0; x.len()];
        }

        let norm = area / (sigma * (2.0 * std::f64::consts::PI).sqrt());
        x.iter()
            .map(|&xi| {
                let z = (xi - mu) / sigma;
                norm * (-0.5 * z * z).exp()
            })
            .collect()
    }
}

/// 多项式背景，系数从常数项开始
#[derive(Debug, Clone)]
pub struct PolynomialBackground {
    coefficients: Vec<Option<f64>>,
}

impl PolynomialBackground {
    /// 创建背景函数，系数个数 2 至 4（次数 1 至 3）
    pub fn new(coefficients: Vec<Option<f64>>) -> Result<Self> {
        if coefficients.len() < 2 || coefficients.len() > 4 {
            return Err(EdsfitError::ConfigError(format!(
                "Background polynomial degree must be 1 to 3, got {} coefficients",
                coefficients.len()
            )));
        }

        Ok(PolynomialBackground { coefficients })
    }

    /// 一次背景 y = a + b·x
    pub fn linear(a: Option<f64>, b: Option<f64>) -> Self {
        PolynomialBackground {
            coefficients: vec![a, b],
        }
    }

    /// 解析出给定自由参数下的全部系数
    pub fn resolve(&self, params: &[f64]) -> Vec<f64> {
        let mut idx = 0;
        self.coefficients
            .iter()
            .map(|c| match c {
                Some(v) => *v,
                None => {
                    let v = params[idx];
                    idx += 1;
                    v
                }
            })
            .collect()
    }
}

impl ModelFunction for PolynomialBackground {
    fn free_parameter_count(&self) -> usize {
        self.coefficients.iter().filter(|c| c.is_none()).count()
    }

    fn evaluate(&self, x: &[f64], params: &[f64]) -> Vec<f64> {
        let coefficients = self.resolve(params);

        x.iter()
            .map(|&xi| {
                coefficients
                    .iter()
                    .rev()
                    .fold(0.0, |acc, &c| acc * xi + c)
            })
            .collect()
    }
}

/// 函数和组合器：成员按加入顺序瓜分扁平自由参数向量
#[derive(Default)]
pub struct CompositeModel {
    components: Vec<Box<dyn ModelFunction>>,
}

impl CompositeModel {
    pub fn new() -> Self {
        CompositeModel {
            components: Vec::new(),
        }
    }

    pub fn push(&mut self, component: Box<dyn ModelFunction>) {
        self.components.push(component);
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

impl ModelFunction for CompositeModel {
    fn free_parameter_count(&self) -> usize {
        self.components
            .iter()
            .map(|c| c.free_parameter_count())
            .sum()
    }

    fn evaluate(&self, x: &[f64], params: &[f64]) -> Vec<f64> {
        let mut total = vec![0.0; x.len()];
        let mut offset = 0;

        for component in &self.components {
            let count = component.free_parameter_count();
            let slice = &params[offset..offset + count];
            offset += count;

            for (t, v) in total.iter_mut().zip(component.evaluate(x, slice)) {
                *t += v;
            }
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_free_parameter_count() {
        assert_eq!(GaussianPeak::new(None, None, None).free_parameter_count(), 3);
        assert_eq!(GaussianPeak::new(Some(1.0), None, None).free_parameter_count(), 2);
        assert_eq!(
            GaussianPeak::new(Some(1.0), Some(2.0), Some(0.1)).free_parameter_count(),
            0
        );
    }

    #[test]
    fn test_gaussian_peak_value() {
        // 峰顶处 y = A / (σ·√(2π))
        let peak = GaussianPeak::new(None, None, None);
        let y = peak.evaluate(&[1.0], &[100.0, 1.0, 0.05]);

        let expected = 100.0 / (0.05 * (2.0 * std::f64::consts::PI).sqrt());
        assert!((y[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_gaussian_area_by_integration() {
        let peak = GaussianPeak::new(None, None, None);

        let dx = 0.001;
        let x: Vec<f64> = (0..2000).map(|i| i as f64 * dx).collect();
        let y = peak.evaluate(&x, &[50.0, 1.0, 0.05]);

        let integral: f64 = y.iter().sum::<f64>() * dx;
        assert!((integral - 50.0).abs() < 0.05, "integral {}", integral);
    }

    #[test]
    fn test_gaussian_zero_sigma_is_zero() {
        let peak = GaussianPeak::new(None, None, None);
        let y = peak.evaluate(&[1.0, 2.0], &[100.0, 1.0, 0.0]);
        assert_eq!(y, vec![0.0, 0.0]);
    }

    #[test]
    fn test_polynomial_fixed_and_free() {
        // a 固定为 2，b 自由
        let background = PolynomialBackground::linear(Some(2.0), None);
        assert_eq!(background.free_parameter_count(), 1);

        let y = background.evaluate(&[0.0, 1.0, 2.0], &[3.0]);
        assert_eq!(y, vec![2.0, 5.0, 8.0]);
    }

    #[test]
    fn test_polynomial_degree_validation() {
        assert!(PolynomialBackground::new(vec![None]).is_err());
        assert!(PolynomialBackground::new(vec![None; 5]).is_err());
        assert!(PolynomialBackground::new(vec![None; 4]).is_ok());
    }

    #[test]
    fn test_composite_splits_flat_vector() {
        let mut model = CompositeModel::new();
        model.push(Box::new(GaussianPeak::new(None, None, None)));
        model.push(Box::new(PolynomialBackground::linear(None, None)));

        assert_eq!(model.free_parameter_count(), 5);

        let x = vec![0.5, 1.0, 1.5];
        let params = [100.0, 1.0, 0.05, 2.0, 3.0];
        let y = model.evaluate(&x, &params);

        let peak = GaussianPeak::new(None, None, None).evaluate(&x, &params[0..3]);
        let background = PolynomialBackground::linear(None, None).evaluate(&x, &params[3..5]);

        for i in 0..x.len() {
            assert!((y[i] - (peak[i] + background[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_composite_with_fixed_members() {
        // 固定参数不占用扁平向量位置
        let mut model = CompositeModel::new();
        model.push(Box::new(GaussianPeak::new(Some(10.0), None, Some(0.1))));
        model.push(Box::new(GaussianPeak::new(None, Some(2.0), None)));

        assert_eq!(model.free_parameter_count(), 3);

        let x = vec![1.0, 2.0];
        let y = model.evaluate(&x, &[1.0, 20.0, 0.2]);

        let first = GaussianPeak::new(Some(10.0), None, Some(0.1)).evaluate(&x, &[1.0]);
        let second = GaussianPeak::new(None, Some(2.0), None).evaluate(&x, &[20.0, 0.2]);

        for i in 0..x.len() {
            assert!((y[i] - (first[i] + second[i])).abs() < 1e-12);
        }
    }
}
