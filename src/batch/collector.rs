//! # 谱文件收集器
//!
//! 根据输入路径和文件名模式收集待分析的谱文件列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - 逗号分隔的多 glob 模式
//! - 递归目录搜索
//!
//! ## 依赖关系
//! - 被 `commands/analyze` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 做模式匹配

use std::path::PathBuf;

use glob::Pattern;
use walkdir::WalkDir;

use crate::utils::output;

/// 默认匹配的谱文件模式
pub const DEFAULT_PATTERN: &str = "*.emsa,*.msa,*.csv";

/// 谱文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 已编译的匹配模式
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建收集器，默认匹配常见谱文件后缀
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: compile_patterns(DEFAULT_PATTERN),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.patterns = compile_patterns(pattern);
        self
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 检查输入是否为单文件
    pub fn is_single_file(&self) -> bool {
        self.input.is_file()
    }

    /// 检查输入是否为目录
    pub fn is_directory(&self) -> bool {
        self.input.is_dir()
    }

    /// 收集所有匹配的文件，结果按路径排序
    pub fn collect(&self) -> Vec<PathBuf> {
        if self.input.is_file() {
            return vec![self.input.clone()];
        }

        if !self.input.is_dir() {
            return Vec::new();
        }

        let walker = if self.recursive {
            WalkDir::new(&self.input)
        } else {
            WalkDir::new(&self.input).max_depth(1)
        };

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|name| self.matches_name(name))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// 检查文件名是否匹配任一模式
    fn matches_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }
}

/// 编译逗号分隔的模式列表，非法模式告警后跳过
fn compile_patterns(spec: &str) -> Vec<Pattern> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match Pattern::new(s) {
            Ok(p) => Some(p),
            Err(e) => {
                output::print_warning(&format!("Invalid pattern '{}': {}", s, e));
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_match_spectra() {
        let collector = FileCollector::new(PathBuf::from("."));

        assert!(collector.matches_name("sample.emsa"));
        assert!(collector.matches_name("sample.msa"));
        assert!(collector.matches_name("export.csv"));
        assert!(!collector.matches_name("notes.txt"));
    }

    #[test]
    fn test_with_pattern_overrides_default() {
        let collector = FileCollector::new(PathBuf::from(".")).with_pattern("*.txt, run_?.emsa");

        assert!(collector.matches_name("notes.txt"));
        assert!(collector.matches_name("run_1.emsa"));
        assert!(!collector.matches_name("run_12.emsa"));
        assert!(!collector.matches_name("export.csv"));
    }

    #[test]
    fn test_invalid_pattern_skipped() {
        let collector = FileCollector::new(PathBuf::from(".")).with_pattern("[*.emsa,*.csv");

        assert!(!collector.matches_name("sample.emsa"));
        assert!(collector.matches_name("export.csv"));
    }

    #[test]
    fn test_collect_filters_and_sorts() {
        let dir = std::env::temp_dir().join(format!("edsfit_collect_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("b.emsa"), "x").unwrap();
        std::fs::write(dir.join("a.emsa"), "x").unwrap();
        std::fs::write(dir.join("notes.txt"), "x").unwrap();
        std::fs::write(dir.join("sub").join("c.emsa"), "x").unwrap();

        let flat = FileCollector::new(dir.clone()).collect();
        let names: Vec<String> = flat
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .map(String::from)
            .collect();
        assert_eq!(names, vec!["a.emsa", "b.emsa"]);

        let recursive = FileCollector::new(dir.clone()).recursive(true).collect();
        assert_eq!(recursive.len(), 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
