//! # peaks 子命令实现
//!
//! 对谱文件中用户指定的各窗口做独立单峰拟合并打印结果。
//!
//! ## 依赖关系
//! - 使用 `cli/peaks.rs` 定义的 PeaksArgs
//! - 使用 `fit/single.rs` 执行拟合
//! - 使用 `analyzer/export.rs` 写结果 CSV

use crate::analyzer::export;
use crate::cli::peaks::{parse_peak_spec, PeaksArgs};
use crate::error::{EdsfitError, Result};
use crate::fit::{fit_single_peak, SinglePeakResult};
use crate::parsers;
use crate::utils::output;

/// 执行 peaks 命令
pub fn execute(args: PeaksArgs) -> Result<()> {
    output::print_header("Standalone Peak Fitting");

    if !args.spectrum.is_file() {
        return Err(EdsfitError::FileNotFound {
            path: args.spectrum.display().to_string(),
        });
    }

    let spectrum = parsers::parse_spectrum_file(&args.spectrum)?;
    output::print_success(&format!(
        "Loaded spectrum: {} ({} channels)",
        spectrum.name,
        spectrum.len()
    ));

    let mut results: Vec<SinglePeakResult> = Vec::new();

    for input in &args.peaks {
        let spec = parse_peak_spec(input)?;

        match fit_single_peak(&spec, &spectrum.energies_kev, &spectrum.counts, args.sigma) {
            Ok(result) => {
                if !result.converged {
                    output::print_warning(&format!(
                        "Peak '{}' did not converge within the iteration limit",
                        result.label
                    ));
                }
                results.push(result);
            }
            Err(e) => {
                output::print_warning(&format!("Peak '{}' fit failed: {}", spec.label, e));
            }
        }
    }

    if results.is_empty() {
        return Err(EdsfitError::Other("No peak could be fitted".to_string()));
    }

    print_peak_table(&results);

    if let Some(path) = &args.output {
        export::write_single_peaks(path, &results)?;
        output::print_success(&format!("Results saved to '{}'", path.display()));
    }

    Ok(())
}

/// 打印单峰拟合表格
fn print_peak_table(results: &[SinglePeakResult]) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct PeakRow {
        #[tabled(rename = "Line")]
        line: String,
        #[tabled(rename = "Position (keV)")]
        position: String,
        #[tabled(rename = "Height")]
        height: String,
        #[tabled(rename = "Intensity")]
        intensity: String,
    }

    let rows: Vec<PeakRow> = results
        .iter()
        .map(|r| PeakRow {
            line: r.label.clone(),
            position: format!("{:.4}", r.position_kev),
            height: format!("{:.1}", r.height),
            intensity: format!("{:.1}", r.intensity),
        })
        .collect();

    output::print_header(&format!("Fitted Peaks ({})", rows.len()));
    let table = Table::new(&rows);
    println!("{}", table);
}
