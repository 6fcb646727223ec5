//! # 带箱式约束的最小二乘求解器
//!
//! 阻尼最小二乘（Levenberg-Marquardt），数值前向差分雅可比，
//! Cholesky 分解求解正规方程，Nielsen 增益比控制阻尼因子，
//! 约束通过步长投影实现。
//!
//! ## 算法概述
//! 1. 前向差分估计残差雅可比 J
//! 2. 求解 (JᵀJ + λ·diag(JᵀJ))·δ = −Jᵀr
//! 3. 候选点投影回 [lower, upper] 后计算增益比 ρ
//! 4. ρ > 0 接受并缩小 λ，否则放大 λ 重试
//! 5. 相对步长范数低于阈值即收敛
//!
//! ## 依赖关系
//! - 被 `fit/engine` 和 `fit/single` 调用
//! - 无外部模块依赖

use crate::error::{EdsfitError, Result};

const MAX_ITER: usize = 100;
const CONV_TOL: f64 = 1e-9;

/// 前向差分步长因子（约为机器精度的平方根）
const JACOBIAN_STEP: f64 = 1.49e-8;

/// 一次求解的结果
#[derive(Debug, Clone)]
pub struct FitReport {
    /// 最优自由参数
    pub best: Vec<f64>,

    /// 最终残差平方和
    pub cost: f64,

    /// 实际迭代次数
    pub iterations: usize,

    /// 是否在迭代上限内收敛
    pub converged: bool,
}

/// 最小化 ‖residual(x)‖²，x 限制在 [lower, upper] 内
///
/// 残差闭包接收自由参数向量，返回各数据点的残差。上下界用
/// ±∞ 表示无约束。不收敛不是错误，由返回的标志表达。
pub fn least_squares<F>(residual: F, x0: &[f64], lower: &[f64], upper: &[f64]) -> Result<FitReport>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let np = x0.len();

    if lower.len() != np || upper.len() != np {
        return Err(EdsfitError::InvalidArgument(format!(
            "Bounds length mismatch: {} parameters, {} lower, {} upper",
            np,
            lower.len(),
            upper.len()
        )));
    }

    // 初值投影进箱内
    let mut params: Vec<f64> = x0
        .iter()
        .zip(lower.iter().zip(upper.iter()))
        .map(|(&v, (&lo, &hi))| v.max(lo).min(hi))
        .collect();

    let r0 = residual(&params);
    let m = r0.len();

    if m == 0 {
        return Err(EdsfitError::InvalidArgument(
            "Least squares called with no residual points".to_string(),
        ));
    }

    if np == 0 {
        return Ok(FitReport {
            best: params,
            cost: sum_of_squares(&r0),
            iterations: 0,
            converged: true,
        });
    }

    if m < np {
        return Err(EdsfitError::InvalidArgument(format!(
            "Least squares needs at least as many residual points as free parameters ({} < {})",
            m, np
        )));
    }

    let mut best_cost = sum_of_squares(&r0);
    let mut current_residual = r0;
    let mut lambda = 1e-3_f64;
    let mut nu = 2.0_f64;
    let mut converged = false;
    let mut iterations = 0;

    let mut jtj = vec![0.0_f64; np * np];
    let mut g = vec![0.0_f64; np];
    let mut mat = vec![0.0_f64; np * np];

    for iter in 0..MAX_ITER {
        iterations = iter + 1;

        let jacobian = numeric_jacobian(&residual, &params, &current_residual, lower, upper);

        jtj.fill(0.0);
        g.fill(0.0);

        for i in 0..m {
            let row = &jacobian[i * np..(i + 1) * np];
            for p in 0..np {
                g[p] -= row[p] * current_residual[i];
                for q in p..np {
                    jtj[p * np + q] += row[p] * row[q];
                }
            }
        }

        // 补齐对称下三角
        for p in 0..np {
            for q in 0..p {
                jtj[p * np + q] = jtj[q * np + p];
            }
        }

        // 梯度消失即已处于极小点
        let g_norm = g.iter().map(|v| v * v).sum::<f64>().sqrt();
        if g_norm < 1e-12 * (1.0 + best_cost) {
            converged = true;
            break;
        }

        // 阻尼正规方程
        mat.copy_from_slice(&jtj);
        for p in 0..np {
            mat[p * np + p] += lambda * jtj[p * np + p].max(1e-12);
        }

        let delta = match cholesky_solve(&mat, &g, np) {
            Some(d) => d,
            None => break,
        };

        // 候选点投影回箱内，实际步长以投影后为准
        let mut new_params = params.clone();
        let mut step = vec![0.0_f64; np];
        for p in 0..np {
            let proposed = (params[p] + delta[p]).max(lower[p]).min(upper[p]);
            step[p] = proposed - params[p];
            new_params[p] = proposed;
        }

        let new_residual = residual(&new_params);
        let new_cost = if new_residual.iter().all(|r| r.is_finite()) {
            sum_of_squares(&new_residual)
        } else {
            f64::INFINITY
        };

        // Nielsen 增益比
        let predicted: f64 = step
            .iter()
            .enumerate()
            .map(|(i, d)| d * (lambda * jtj[i * np + i].max(1e-12) * d + g[i]))
            .sum();

        let mut accepted = false;
        if predicted > 0.0 {
            let rho = (best_cost - new_cost) / predicted;
            if rho > 0.0 {
                accepted = true;
                params.copy_from_slice(&new_params);
                best_cost = new_cost;
                current_residual = new_residual;
                lambda *= (1.0_f64 / 3.0).max(1.0 - (2.0 * rho - 1.0).powi(3));
                nu = 2.0;
            }
        }

        if accepted {
            let param_norm = params.iter().map(|p| p * p).sum::<f64>().sqrt();
            let step_norm = step.iter().map(|d| d * d).sum::<f64>().sqrt();
            if step_norm / param_norm.max(1e-12) < CONV_TOL {
                converged = true;
                break;
            }
        } else {
            lambda *= nu;
            nu *= 2.0;
        }
    }

    Ok(FitReport {
        best: params,
        cost: best_cost,
        iterations,
        converged,
    })
}

fn sum_of_squares(residual: &[f64]) -> f64 {
    residual.iter().map(|r| r * r).sum()
}

/// 残差对各参数的前向差分雅可比，行优先 m×np
fn numeric_jacobian<F>(
    residual: &F,
    params: &[f64],
    current_residual: &[f64],
    lower: &[f64],
    upper: &[f64],
) -> Vec<f64>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let np = params.len();
    let m = current_residual.len();
    let mut jacobian = vec![0.0_f64; m * np];
    let mut perturbed = params.to_vec();

    for p in 0..np {
        let mut h = JACOBIAN_STEP * params[p].abs().max(1.0);

        // 步长越界时反向
        if params[p] + h > upper[p] {
            h = -h;
        }
        if params[p] + h < lower[p] {
            continue;
        }

        perturbed[p] = params[p] + h;
        let shifted = residual(&perturbed);
        perturbed[p] = params[p];

        if shifted.len() != m || shifted.iter().any(|r| !r.is_finite()) {
            continue;
        }

        for i in 0..m {
            jacobian[i * np + p] = (shifted[i] - current_residual[i]) / h;
        }
    }

    jacobian
}

/// 对称正定系统的 Cholesky 分解求解，矩阵为行优先扁平存储
fn cholesky_solve(mat: &[f64], rhs: &[f64], np: usize) -> Option<Vec<f64>> {
    let mut l = vec![0.0_f64; np * np];

    for i in 0..np {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[i * np + k] * l[j * np + k];
            }
            if i == j {
                let diag = mat[i * np + i] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[i * np + j] = diag.sqrt();
            } else {
                l[i * np + j] = (mat[i * np + j] - sum) / l[j * np + j];
            }
        }
    }

    let mut y = vec![0.0_f64; np];
    for i in 0..np {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[i * np + j] * y[j];
        }
        y[i] = (rhs[i] - sum) / l[i * np + i];
    }

    let mut x = vec![0.0_f64; np];
    for i in (0..np).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..np {
            sum += l[j * np + i] * x[j];
        }
        x[i] = (y[i] - sum) / l[i * np + i];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_fit() {
        // y = 2x + 1
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.5).collect();
        let y: Vec<f64> = x.iter().map(|&xi| 2.0 * xi + 1.0).collect();

        let residual = |p: &[f64]| -> Vec<f64> {
            x.iter()
                .zip(y.iter())
                .map(|(&xi, &yi)| yi - (p[0] + p[1] * xi))
                .collect()
        };

        let report = least_squares(
            residual,
            &[0.0, 0.0],
            &[f64::NEG_INFINITY; 2],
            &[f64::INFINITY; 2],
        )
        .unwrap();

        assert!(report.converged);
        assert!((report.best[0] - 1.0).abs() < 1e-6, "a = {}", report.best[0]);
        assert!((report.best[1] - 2.0).abs() < 1e-6, "b = {}", report.best[1]);
    }

    #[test]
    fn test_gaussian_round_trip() {
        // 无噪声高斯 + 线性背景，参数应精确还原
        let x: Vec<f64> = (0..150).map(|i| 0.5 + i as f64 * 0.01).collect();
        let truth = [1000.0, 1.25, 0.05, 10.0, 2.0];
        let model = |p: &[f64], xi: f64| -> f64 {
            let z = (xi - p[1]) / p[2];
            p[0] / (p[2] * (2.0 * std::f64::consts::PI).sqrt()) * (-0.5 * z * z).exp()
                + p[3]
                + p[4] * xi
        };
        let y: Vec<f64> = x.iter().map(|&xi| model(&truth, xi)).collect();

        let residual = |p: &[f64]| -> Vec<f64> {
            x.iter()
                .zip(y.iter())
                .map(|(&xi, &yi)| yi - model(p, xi))
                .collect()
        };

        let report = least_squares(
            residual,
            &[800.0, 1.2, 0.06, 5.0, 0.0],
            &[0.0, 1.0, 0.01, f64::NEG_INFINITY, f64::NEG_INFINITY],
            &[f64::INFINITY, 1.5, 0.5, f64::INFINITY, f64::INFINITY],
        )
        .unwrap();

        assert!(report.converged);
        assert!((report.best[0] - 1000.0).abs() / 1000.0 < 1e-4, "area = {}", report.best[0]);
        assert!((report.best[1] - 1.25).abs() < 1e-5, "mu = {}", report.best[1]);
        assert!((report.best[2] - 0.05).abs() / 0.05 < 1e-4, "sigma = {}", report.best[2]);
    }

    #[test]
    fn test_bound_is_respected() {
        // 数据均值 5，参数上界 3，最优解应落在界上
        let y = [5.0; 10];
        let residual = |p: &[f64]| -> Vec<f64> { y.iter().map(|&yi| yi - p[0]).collect() };

        let report = least_squares(residual, &[1.0], &[0.0], &[3.0]).unwrap();

        assert!((report.best[0] - 3.0).abs() < 1e-6, "p = {}", report.best[0]);
    }

    #[test]
    fn test_too_few_points() {
        let residual = |p: &[f64]| -> Vec<f64> { vec![1.0 - p[0]] };
        let result = least_squares(
            residual,
            &[0.0, 0.0],
            &[f64::NEG_INFINITY; 2],
            &[f64::INFINITY; 2],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_start_at_minimum() {
        // 初值即为精确解时应立即收敛
        let y = [3.0; 5];
        let residual = |p: &[f64]| -> Vec<f64> { y.iter().map(|&yi| yi - p[0]).collect() };

        let report =
            least_squares(residual, &[3.0], &[f64::NEG_INFINITY], &[f64::INFINITY]).unwrap();

        assert!(report.converged);
        assert!(report.cost < 1e-20);
    }

    #[test]
    fn test_no_free_parameters() {
        let residual = |_p: &[f64]| -> Vec<f64> { vec![1.0, 2.0] };
        let report = least_squares(residual, &[], &[], &[]).unwrap();

        assert!(report.converged);
        assert!((report.cost - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_cholesky_identity() {
        let mat = vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        let rhs = vec![1.0, 2.0, 3.0];
        let x = cholesky_solve(&mat, &rhs, 3).unwrap();

        assert!((x[0] - 1.0).abs() < 1e-10);
        assert!((x[1] - 2.0).abs() < 1e-10);
        assert!((x[2] - 3.0).abs() < 1e-10);
    }
}
