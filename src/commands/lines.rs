//! # lines 子命令实现
//!
//! 查询元素的参考线并按能量排序打印，可按类别和能量范围过滤。
//!
//! ## 依赖关系
//! - 使用 `cli/lines.rs` 定义的 LinesArgs
//! - 使用 `catalog/` 查询参考线

use crate::catalog::LineCatalog;
use crate::cli::lines::{LineCategory, LinesArgs};
use crate::error::Result;
use crate::utils::output;

/// 表格中的一条参考线
struct LineEntry {
    position_kev: f64,
    label: String,
    category: &'static str,
    fraction: Option<f64>,
}

/// 执行 lines 命令
pub fn execute(args: LinesArgs) -> Result<()> {
    output::print_header("X-Ray Reference Lines");

    let catalog = LineCatalog::new(&args.elements)?;
    let mut entries = collect_entries(&catalog, args.category);

    entries.retain(|e| {
        args.min_energy.map(|min| e.position_kev >= min).unwrap_or(true)
            && args.max_energy.map(|max| e.position_kev <= max).unwrap_or(true)
    });

    if entries.is_empty() {
        output::print_warning("No reference lines match the given filters");
        return Ok(());
    }

    entries.sort_by(|a, b| a.position_kev.partial_cmp(&b.position_kev).unwrap());

    print_line_table(&entries);
    output::print_success(&format!("{} reference lines listed", entries.len()));

    Ok(())
}

fn collect_entries(catalog: &LineCatalog, category: LineCategory) -> Vec<LineEntry> {
    let mut entries = Vec::new();

    if matches!(category, LineCategory::Major | LineCategory::All) {
        entries.extend(catalog.major_lines().into_iter().map(|l| LineEntry {
            position_kev: l.position_kev,
            label: l.label,
            category: "major",
            fraction: Some(l.fraction),
        }));
    }
    if matches!(category, LineCategory::Minor | LineCategory::All) {
        entries.extend(catalog.minor_lines().into_iter().map(|l| LineEntry {
            position_kev: l.position_kev,
            label: l.label,
            category: "minor",
            fraction: Some(l.fraction),
        }));
    }
    if matches!(category, LineCategory::Satellite | LineCategory::All) {
        entries.extend(catalog.satellite_lines().into_iter().map(|l| LineEntry {
            position_kev: l.position_kev,
            label: l.label,
            category: "satellite",
            fraction: Some(l.fraction),
        }));
    }
    if matches!(category, LineCategory::Edge | LineCategory::All) {
        entries.extend(catalog.absorption_edges().into_iter().map(|m| LineEntry {
            position_kev: m.position_kev,
            label: m.label,
            category: "edge",
            fraction: None,
        }));
    }
    if matches!(category, LineCategory::Escape | LineCategory::All) {
        entries.extend(catalog.si_escape_peaks().into_iter().map(|m| LineEntry {
            position_kev: m.position_kev,
            label: m.label,
            category: "escape",
            fraction: None,
        }));
    }

    entries
}

/// 打印参考线表格
fn print_line_table(entries: &[LineEntry]) {
    use tabled::{Table, Tabled};

    #[derive(Tabled)]
    struct LineRow {
        #[tabled(rename = "Energy (keV)")]
        energy: String,
        #[tabled(rename = "Line")]
        line: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Fraction")]
        fraction: String,
    }

    let rows: Vec<LineRow> = entries
        .iter()
        .map(|e| LineRow {
            energy: format!("{:.4}", e.position_kev),
            line: e.label.clone(),
            category: e.category.to_string(),
            fraction: match e.fraction {
                Some(f) => format!("{:.3}", f),
                None => "-".to_string(),
            },
        })
        .collect();

    let table = Table::new(&rows);
    println!("{}", table);
}
