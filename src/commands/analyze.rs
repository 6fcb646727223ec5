//! # analyze 子命令实现
//!
//! 从配方和命令行参数装配分析器，对单谱或整个目录执行 ROI 峰拟合。
//!
//! ## 功能
//! - 配方 JSON 与命令行参数合并（命令行优先）
//! - 单文件模式打印强度表格
//! - 批量模式并行处理与统计汇总
//!
//! ## 依赖关系
//! - 使用 `cli/analyze.rs` 定义的 AnalyzeArgs
//! - 使用 `analyzer/` 执行拟合与产物输出
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `parsers/` 读取谱文件

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analyzer::{AnalysisReport, OutputOptions, SpectrumAnalyzer};
use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::analyze::{parse_roi_spec, AnalyzeArgs};
use crate::error::{EdsfitError, Result};
use crate::fit::FitMethod;
use crate::models::recipe::AnalysisRecipe;
use crate::parsers;
use crate::utils::output;

/// 执行 analyze 命令
pub fn execute(args: AnalyzeArgs) -> Result<()> {
    output::print_header("EDS/EDX Spectrum Peak Fitting");

    let recipe = build_recipe(&args)?;
    let options = OutputOptions {
        output_dir: args.output_dir.clone(),
        figures: !args.no_figures,
        log_figure: args.log_scale,
        width: args.width,
        height: args.height,
    };

    fs::create_dir_all(&options.output_dir).map_err(|e| EdsfitError::FileWriteError {
        path: options.output_dir.display().to_string(),
        source: e,
    })?;

    let analyzer = SpectrumAnalyzer::from_recipe(recipe)?;

    match (&args.spectrum, &args.batch) {
        (Some(file), _) => execute_single_file(file, &analyzer, &options),
        (None, Some(dir)) => execute_batch(dir, &args, analyzer, options),
        (None, None) => Err(EdsfitError::InvalidArgument(
            "Either --spectrum or --batch is required".to_string(),
        )),
    }
}

/// 配方与命令行参数合并，命令行优先
fn build_recipe(args: &AnalyzeArgs) -> Result<AnalysisRecipe> {
    let mut recipe = match &args.recipe {
        Some(path) => AnalysisRecipe::from_file(path)?,
        None => AnalysisRecipe::new(),
    };

    for symbol in &args.elements {
        if !recipe.elements.iter().any(|s| s == symbol) {
            recipe.elements.push(symbol.clone());
        }
    }

    for spec in &args.rois {
        recipe.rois.push(parse_roi_spec(spec)?);
    }

    if let Some(noise_ev) = args.noise_ev {
        recipe.detector.noise_ev = noise_ev;
    }
    if let Some(fano) = args.fano {
        recipe.detector.fano_factor = fano;
    }
    if let Some(max_err) = args.max_position_error {
        recipe.max_position_error_kev = max_err;
    }
    if let Some(method) = args.fit_method {
        recipe.fit_method = method.into();
    }
    if let Some(max_kev) = args.max_energy {
        recipe.maximum_energy_kev = Some(max_kev);
    }
    if args.double_carbon {
        recipe.double_carbon_peak = true;
    }
    if args.export_rois {
        recipe.export_rois = true;
    }

    if recipe.elements.is_empty() {
        return Err(EdsfitError::ConfigError(
            "No elements specified. Use --element or provide a recipe".to_string(),
        ));
    }
    if recipe.rois.is_empty() && recipe.fit_method != FitMethod::Spectrum {
        return Err(EdsfitError::ConfigError(
            "No ROIs specified. Use --roi or provide a recipe".to_string(),
        ));
    }

    Ok(recipe)
}

/// 单文件模式
fn execute_single_file(
    file: &Path,
    analyzer: &SpectrumAnalyzer,
    options: &OutputOptions,
) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", file.display()));

    if !file.is_file() {
        return Err(EdsfitError::FileNotFound {
            path: file.display().to_string(),
        });
    }

    let spectrum = parsers::parse_spectrum_file(file)?;
    output::print_success(&format!(
        "Loaded spectrum: {} ({} channels)",
        spectrum.name,
        spectrum.len()
    ));
    if let Some(beam_kev) = spectrum.beam_energy_kev {
        output::print_info(&format!("Beam energy: {:.1} keV", beam_kev));
    }

    let report = analyzer.process(&spectrum, options)?;

    if report.fits.is_empty() {
        output::print_warning("No ROI produced a fit");
        return Ok(());
    }

    print_intensity_table(&report);

    if !report.all_converged() {
        output::print_warning("Some fits did not converge within the iteration limit");
    }

    let table_path = options
        .output_dir
        .join(format!("{}.csv", report.spectrum_name));
    output::print_success(&format!("Results saved to '{}'", table_path.display()));

    Ok(())
}

/// 批量处理模式
fn execute_batch(
    dir: &Path,
    args: &AnalyzeArgs,
    analyzer: SpectrumAnalyzer,
    options: OutputOptions,
) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", dir.display()));

    if !dir.is_dir() {
        return Err(EdsfitError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let collector = FileCollector::new(dir.to_path_buf())
        .with_pattern(&args.pattern)
        .recursive(args.recursive);

    let files = collector.collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} spectrum files", files.len()));

    let analyzer = Arc::new(analyzer);
    let options = Arc::new(options);
    let overwrite = args.overwrite;

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |file| {
        process_batch_file(file, &analyzer, &options, overwrite)
    });

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed in {:.1}s",
        result.success,
        result.skipped,
        result.failed,
        result.elapsed.as_secs_f64()
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 处理批量模式中的单个谱文件
fn process_batch_file(
    input: &PathBuf,
    analyzer: &SpectrumAnalyzer,
    options: &OutputOptions,
    overwrite: bool,
) -> ProcessResult {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spectrum");

    let output_file = options.output_dir.join(format!("{}.csv", stem));
    if output_file.exists() && !overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    let spectrum = match parsers::parse_spectrum_file(input) {
        Ok(s) => s,
        Err(e) => return ProcessResult::Failed(input.display().to_string(), e.to_string()),
    };

    match analyzer.process(&spectrum, options) {
        Ok(report) if report.fits.is_empty() => ProcessResult::Failed(
            input.display().to_string(),
            "no ROI produced a fit".to_string(),
        ),
        Ok(_) => ProcessResult::Success(format!(
            "{} -> {}",
            input.display(),
            output_file.display()
        )),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 打印强度表格
fn print_intensity_table(report: &AnalysisReport) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct IntensityRow {
        #[tabled(rename = "Line")]
        line: String,
        #[tabled(rename = "Counts")]
        counts: String,
        #[tabled(rename = "Background")]
        background: String,
        #[tabled(rename = "Position (keV)")]
        position: String,
        #[tabled(rename = "FWHM (eV)")]
        fwhm: String,
    }

    let rows: Vec<IntensityRow> = report
        .intensities()
        .iter()
        .map(|p| IntensityRow {
            line: p.label.clone(),
            counts: format!("{:.1}", p.counts()),
            background: format!("{:.1}", p.counts_background()),
            position: format!("{:.4}", p.position_kev),
            fwhm: format!("{:.1}", p.fwhm_ev()),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("Fitted Peak Intensities ({})", rows.len()));
        let table = Table::new(&rows);
        println!("{}", table);
    }
}
