//! # 元素符号登记表
//!
//! 元素符号与原子序数的双向查询。
//!
//! ## 依赖关系
//! - 被 `catalog/mod.rs` 和 `catalog/transitions.rs` 使用
//! - 纯静态数据，无外部依赖

use std::collections::HashMap;
use std::sync::LazyLock;

/// 元素符号表，下标 = 原子序数 - 1
pub const SYMBOLS: [&str; 92] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U",
];

/// 符号到原子序数的反查表
static ATOMIC_NUMBERS: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    SYMBOLS
        .iter()
        .enumerate()
        .map(|(i, &sym)| (sym, i as u32 + 1))
        .collect()
});

/// 由元素符号查询原子序数
pub fn atomic_number(symbol: &str) -> Option<u32> {
    ATOMIC_NUMBERS.get(symbol).copied()
}

/// 由原子序数查询元素符号
pub fn symbol(atomic_number: u32) -> Option<&'static str> {
    if atomic_number == 0 {
        return None;
    }
    SYMBOLS.get(atomic_number as usize - 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_number_lookup() {
        assert_eq!(atomic_number("C"), Some(6));
        assert_eq!(atomic_number("Si"), Some(14));
        assert_eq!(atomic_number("Cu"), Some(29));
        assert_eq!(atomic_number("U"), Some(92));
        assert_eq!(atomic_number("Xx"), None);
    }

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(symbol(1), Some("H"));
        assert_eq!(symbol(26), Some("Fe"));
        assert_eq!(symbol(92), Some("U"));
        assert_eq!(symbol(0), None);
        assert_eq!(symbol(93), None);
    }

    #[test]
    fn test_round_trip() {
        for (i, &sym) in SYMBOLS.iter().enumerate() {
            assert_eq!(atomic_number(sym), Some(i as u32 + 1));
        }
    }
}
