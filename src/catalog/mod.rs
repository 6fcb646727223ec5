//! # X 射线参考线目录
//!
//! 由登记的元素集合给出主线、次线、伴线、吸收边和 Si 逃逸峰的参考位置。
//!
//! ## 算法概述
//! 1. 主线: 族内相对强度 > 0.05，且与同元素已保留线位置相差 ≥ 0.01 keV
//! 2. 次线: 族内相对强度 ≤ 0.05
//! 3. 伴线: 跃迁标记以 `S` 开头或含 `satellite`
//! 4. Si 逃逸峰: 跃迁能量减去 Si Ka1 能量，仅保留高于 Si Ka1 且强度 > 0.05 者
//!
//! ## 依赖关系
//! - 被 `fit/engine`、`analyzer/` 和 `commands/` 使用
//! - 子模块: elements, transitions

pub mod elements;
pub mod transitions;

use crate::error::{EdsfitError, Result};

/// 主线/次线分界的族内相对强度
pub const FRACTION_MINOR_MAJOR: f64 = 0.05;

/// 同元素线位置去重容差 (keV)
pub const POSITION_TOLERANCE_KEV: f64 = 0.01;

/// 一条参考 X 射线线
#[derive(Debug, Clone, PartialEq)]
pub struct XrayLine {
    /// 参考位置 (keV)
    pub position_kev: f64,

    /// 族内相对强度
    pub fraction: f64,

    /// 线标签，例如 "Cu Ka1"
    pub label: String,
}

/// 无强度信息的参考位置（吸收边、逃逸峰）
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyMarker {
    /// 参考位置 (keV)
    pub position_kev: f64,

    /// 标签，例如 "Si K"
    pub label: String,
}

/// 已登记元素集合的参考线目录，构造后只读
#[derive(Debug, Clone)]
pub struct LineCatalog {
    entries: Vec<(String, u32)>,
}

impl LineCatalog {
    /// 由元素符号列表构造目录，未知符号报错
    pub fn new(symbols: &[String]) -> Result<Self> {
        let mut entries = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let z = elements::atomic_number(symbol)
                .ok_or_else(|| EdsfitError::UnknownElement(symbol.clone()))?;
            entries.push((symbol.clone(), z));
        }

        Ok(LineCatalog { entries })
    }

    /// 已登记的元素符号
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|(s, _)| s.as_str()).collect()
    }

    /// 主线：强度超过分界值，同元素近重合位置只保留首条
    pub fn major_lines(&self) -> Vec<XrayLine> {
        let mut major = Vec::new();

        for (symbol, z) in &self.entries {
            let mut kept_positions: Vec<f64> = Vec::new();

            for line in transitions::transitions(*z).unwrap_or(&[]) {
                let position_kev = line.energy_ev / 1.0e3;
                if line.fraction > FRACTION_MINOR_MAJOR
                    && not_same_position(position_kev, &kept_positions)
                {
                    major.push(XrayLine {
                        position_kev,
                        fraction: line.fraction,
                        label: format!("{} {}", symbol, line.transition),
                    });
                    kept_positions.push(position_kev);
                }
            }
        }

        major
    }

    /// 次线：强度不超过分界值
    pub fn minor_lines(&self) -> Vec<XrayLine> {
        let mut minor = Vec::new();

        for (symbol, z) in &self.entries {
            for line in transitions::transitions(*z).unwrap_or(&[]) {
                if line.fraction <= FRACTION_MINOR_MAJOR {
                    minor.push(XrayLine {
                        position_kev: line.energy_ev / 1.0e3,
                        fraction: line.fraction,
                        label: format!("{} {}", symbol, line.transition),
                    });
                }
            }
        }

        minor
    }

    /// 伴线
    pub fn satellite_lines(&self) -> Vec<XrayLine> {
        let mut satellites = Vec::new();

        for (symbol, z) in &self.entries {
            for line in transitions::transitions(*z).unwrap_or(&[]) {
                if line.transition.starts_with('S') || line.transition.contains("satellite") {
                    satellites.push(XrayLine {
                        position_kev: line.energy_ev / 1.0e3,
                        fraction: line.fraction,
                        label: format!("{} {}", symbol, line.transition),
                    });
                }
            }
        }

        satellites
    }

    /// 电离吸收边
    pub fn absorption_edges(&self) -> Vec<EnergyMarker> {
        let mut edges = Vec::new();

        for (symbol, z) in &self.entries {
            for edge in transitions::edges(*z).unwrap_or(&[]) {
                edges.push(EnergyMarker {
                    position_kev: edge.energy_ev / 1.0e3,
                    label: format!("{} {}", symbol, edge.subshell),
                });
            }
        }

        edges
    }

    /// Si 逃逸峰：线能量减 Si Ka1，仅保留高于 Si Ka1 且强度达标者
    pub fn si_escape_peaks(&self) -> Vec<EnergyMarker> {
        let si_ka_kev = match transitions::transitions(14)
            .unwrap_or(&[])
            .iter()
            .find(|t| t.transition == "Ka1")
        {
            Some(t) => t.energy_ev / 1.0e3,
            None => return Vec::new(),
        };

        let mut escapes = Vec::new();

        for (symbol, z) in &self.entries {
            for line in transitions::transitions(*z).unwrap_or(&[]) {
                let position_kev = line.energy_ev / 1.0e3 - si_ka_kev;
                if position_kev > si_ka_kev && line.fraction > FRACTION_MINOR_MAJOR {
                    escapes.push(EnergyMarker {
                        position_kev,
                        label: format!("E {} {} - Si Ka", symbol, line.transition),
                    });
                }
            }
        }

        escapes
    }

    /// 按 (元素, 跃迁) 对查询参考线，无法解析的对被跳过
    pub fn lines_for(&self, peaks: &[(String, String)]) -> Vec<XrayLine> {
        let mut lines = Vec::new();

        for (symbol, transition) in peaks {
            let z = match elements::atomic_number(symbol) {
                Some(z) => z,
                None => continue,
            };

            if let Some(line) = transitions::transitions(z)
                .unwrap_or(&[])
                .iter()
                .find(|t| t.transition == transition.as_str())
            {
                lines.push(XrayLine {
                    position_kev: line.energy_ev / 1.0e3,
                    fraction: line.fraction,
                    label: format!("{} {}", symbol, line.transition),
                });
            }
        }

        lines
    }

    /// 找出无法解析为参考线的 (元素, 跃迁) 对
    pub fn unresolved_pairs<'a>(
        &self,
        peaks: &'a [(String, String)],
    ) -> Vec<&'a (String, String)> {
        peaks
            .iter()
            .filter(|(symbol, transition)| {
                match elements::atomic_number(symbol) {
                    Some(z) => !transitions::transitions(z)
                        .unwrap_or(&[])
                        .iter()
                        .any(|t| t.transition == transition.as_str()),
                    None => true,
                }
            })
            .collect()
    }
}

fn not_same_position(position_kev: f64, kept_positions: &[f64]) -> bool {
    kept_positions
        .iter()
        .all(|&p| (position_kev - p).abs() >= POSITION_TOLERANCE_KEV)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_of(symbols: &[&str]) -> LineCatalog {
        let symbols: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
        LineCatalog::new(&symbols).unwrap()
    }

    #[test]
    fn test_new_rejects_unknown_symbol() {
        let result = LineCatalog::new(&["Cu".to_string(), "Xx".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn test_major_lines_dedup_close_positions() {
        // Si Ka1 与 Ka2 相距 0.6 eV，小于 0.01 keV 容差，只保留 Ka1
        let catalog = catalog_of(&["Si"]);
        let major = catalog.major_lines();

        assert_eq!(major.len(), 1);
        assert_eq!(major[0].label, "Si Ka1");
        assert!((major[0].position_kev - 1.73998).abs() < 1e-9);
    }

    #[test]
    fn test_major_lines_keep_resolved_doublet() {
        // Mn Ka1 与 Ka2 相距 11.1 eV，超过容差，两条都保留
        let catalog = catalog_of(&["Mn"]);
        let major = catalog.major_lines();

        assert!(major.iter().any(|l| l.label == "Mn Ka1"));
        assert!(major.iter().any(|l| l.label == "Mn Ka2"));
        assert!(major.iter().any(|l| l.label == "Mn Kb1"));
        assert!(major.iter().any(|l| l.label == "Mn La1"));
    }

    #[test]
    fn test_minor_lines() {
        // Si Kb1 (0.026) 与伴线 SKa1 (0.040) 都在次线集合
        let catalog = catalog_of(&["Si"]);
        let minor = catalog.minor_lines();

        assert_eq!(minor.len(), 2);
        assert!(minor.iter().any(|l| l.label == "Si Kb1"));
        assert!(minor.iter().any(|l| l.label == "Si SKa1"));
    }

    #[test]
    fn test_satellite_lines() {
        let catalog = catalog_of(&["Si", "Cu"]);
        let satellites = catalog.satellite_lines();

        assert_eq!(satellites.len(), 1);
        assert_eq!(satellites[0].label, "Si SKa1");
    }

    #[test]
    fn test_absorption_edges() {
        let catalog = catalog_of(&["Si", "Cu"]);
        let edges = catalog.absorption_edges();

        assert!(edges.iter().any(|e| e.label == "Si K"));
        assert!(edges.iter().any(|e| e.label == "Cu L3"));

        let si_k = edges.iter().find(|e| e.label == "Si K").unwrap();
        assert!((si_k.position_kev - 1.839).abs() < 1e-9);
    }

    #[test]
    fn test_si_escape_peaks() {
        // C Ka1 低于 Si Ka1，没有逃逸峰；Cu 的三条 K 线都有
        let catalog = catalog_of(&["C"]);
        assert!(catalog.si_escape_peaks().is_empty());

        let catalog = catalog_of(&["Cu"]);
        let escapes = catalog.si_escape_peaks();

        assert_eq!(escapes.len(), 3);
        let ka1 = escapes.iter().find(|e| e.label == "E Cu Ka1 - Si Ka").unwrap();
        assert!((ka1.position_kev - (8.04778 - 1.73998)).abs() < 1e-9);
    }

    #[test]
    fn test_lines_for_skips_unresolved() {
        let catalog = catalog_of(&["Cu"]);
        let peaks = vec![
            ("Cu".to_string(), "Ka1".to_string()),
            ("Cu".to_string(), "Qx9".to_string()),
            ("Xx".to_string(), "Ka1".to_string()),
        ];

        let lines = catalog.lines_for(&peaks);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label, "Cu Ka1");

        let unresolved = catalog.unresolved_pairs(&peaks);
        assert_eq!(unresolved.len(), 2);
    }
}
