//! # 批量执行器
//!
//! 在 rayon 线程池中并行分析收集到的谱文件。
//!
//! ## 功能
//! - 可配置并行作业数
//! - 进度条显示当前文件
//! - 错误收集与汇总统计
//!
//! ## 依赖关系
//! - 被 `commands/analyze` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use std::path::PathBuf;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::utils::progress;

/// 单个谱文件的处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 跳过（输出已存在）
    Skipped(String),
    /// 处理失败 (文件路径, 错误信息)
    Failed(String, String),
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
    /// 总耗时
    pub elapsed: Duration,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器，作业数为 0 时使用全部 CPU 核心
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行处理文件列表
    pub fn run<F>(&self, files: Vec<PathBuf>, processor: F) -> BatchResult
    where
        F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
    {
        let start = Instant::now();
        let total = files.len();
        let pb = progress::create_progress_bar(total as u64, "Analyzing");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .unwrap();

        let results: Vec<ProcessResult> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    if let Some(stem) = file.file_stem().and_then(|s| s.to_str()) {
                        pb.set_message(stem.to_string());
                    }

                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }
        batch_result.elapsed = start.elapsed();

        batch_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_collects_statistics() {
        let files: Vec<PathBuf> = (0..6)
            .map(|i| PathBuf::from(format!("s{}.emsa", i)))
            .collect();
        let runner = BatchRunner::new(2);

        let result = runner.run(files, |file| {
            let name = file.display().to_string();
            if name.contains('0') {
                ProcessResult::Skipped(name)
            } else if name.contains('5') {
                ProcessResult::Failed(name, "bad spectrum".to_string())
            } else {
                ProcessResult::Success(name)
            }
        });

        assert_eq!(result.total(), 6);
        assert_eq!(result.success, 4);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].1, "bad spectrum");
    }

    #[test]
    fn test_merge_counts() {
        let mut result = BatchResult::default();
        result.merge(ProcessResult::Success("a".to_string()));
        result.merge(ProcessResult::Failed("b".to_string(), "err".to_string()));

        assert_eq!(result.total(), 2);
        assert_eq!(result.failed, 1);
    }
}
